//! Checklist export
//!
//! Markdown rendering of a project and publishing it as a private gist.

mod markdown;
mod gist;

pub use markdown::{gist_description, gist_filename, render_checklist};
pub use gist::{ExportError, GistClient, GistCreated, GistFile, GistRequest};
