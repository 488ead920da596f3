//! Domain Layer
//!
//! Contains all domain entities and core abstractions.
//! This layer has no storage or UI dependencies; storage errors only
//! convert into `DomainError` here.

mod error;
mod identity;
mod project;

pub use error::{DomainError, DomainResult};
pub use identity::{Identity, Session};
pub use project::{Project, ProjectDraft, StoredProject, TodoItem};
