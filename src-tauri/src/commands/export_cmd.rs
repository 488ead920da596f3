//! Tauri Commands for checklist export

use tauri::State;
use crate::AppState;

async fn open_project_snapshot(
    state: &AppState,
    doc_id: &str,
) -> Result<project_sync::domain::Project, String> {
    state.session()?;
    let open = state.open_projects.lock().await;
    open.get(doc_id)
        .and_then(|detail| detail.project().cloned())
        .ok_or_else(|| format!("Project {} is not open", doc_id))
}

/// Markdown that `export_project_gist` would publish
#[tauri::command]
pub async fn preview_project_export(state: State<'_, AppState>, doc_id: String) -> Result<String, String> {
    let project = open_project_snapshot(&state, &doc_id).await?;
    Ok(project_sync::export::render_checklist(&project))
}

/// Publish the open project as a private gist and open it in the browser.
///
/// Returns the gist URL; errors carry the message to show the user.
#[tauri::command]
pub async fn export_project_gist(state: State<'_, AppState>, doc_id: String) -> Result<String, String> {
    let project = open_project_snapshot(&state, &doc_id).await?;

    let created = state.gist.publish(&project).await.map_err(|e| {
        log::warn!("gist export of {} failed: {}", doc_id, e);
        e.to_string()
    })?;

    if let Err(e) = open::that(&created.html_url) {
        log::warn!("could not open {}: {}", created.html_url, e);
    }
    Ok(created.html_url)
}
