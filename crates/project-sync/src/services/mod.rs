//! Services Layer
//!
//! View-level operations over the document store and mirror cache.
//! Every operation takes the caller's `Session` explicitly.

mod project_list;
mod project_detail;

pub use project_list::{owned_projects, ProjectList, PROJECTS_COLLECTION};
pub use project_detail::{cache_key, DetailState, LoadSource, ProjectDetail};
