//! Export Commands

use super::{call_with, DocIdArgs};

/// Markdown that would be published for the project
pub async fn preview_project_export(doc_id: &str) -> Result<String, String> {
    call_with("preview_project_export", &DocIdArgs { doc_id }).await
}

/// Publish as a gist; returns its URL (the backend opens it)
pub async fn export_project_gist(doc_id: &str) -> Result<String, String> {
    call_with("export_project_gist", &DocIdArgs { doc_id }).await
}
