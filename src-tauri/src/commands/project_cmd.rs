//! Tauri Commands for the project list and project detail views
//!
//! The list view is pushed to the frontend through numbered
//! `projects-changed` snapshots; detail views are kept here per document
//! id between calls.

use tauri::{AppHandle, Emitter, State};
use project_sync::domain::{ProjectDraft, TodoItem};
use project_sync::services::{DetailState, ProjectDetail};
use crate::events::{ProjectsSnapshot, PROJECTS_CHANGED};
use crate::AppState;

/// Start pushing the session's projects to the frontend.
///
/// Also returns the initial snapshot, which may be emitted before the
/// frontend listens.
#[tauri::command]
pub async fn watch_projects(app: AppHandle, state: State<'_, AppState>) -> Result<ProjectsSnapshot, String> {
    state
        .watch_projects(move |snapshot| {
            if let Err(e) = app.emit(PROJECTS_CHANGED, snapshot) {
                log::warn!("failed to emit {}: {}", PROJECTS_CHANGED, e);
            }
        })
        .await
}

/// Stop pushing project updates (dashboard unmounted)
#[tauri::command]
pub fn unwatch_projects(state: State<'_, AppState>) {
    state.set_project_watch(None);
}

/// Create a project, or update `editing` when given. Returns the document id.
#[tauri::command]
pub async fn save_project(
    state: State<'_, AppState>,
    editing: Option<String>,
    title: String,
    todos: Vec<TodoItem>,
) -> Result<String, String> {
    let session = state.session()?;
    let draft = ProjectDraft::new(title, todos);
    state
        .projects
        .create_or_update(&session, editing.as_deref(), &draft)
        .await
        .map_err(|e| e.to_string())
}

/// Delete a project
#[tauri::command]
pub async fn delete_project(state: State<'_, AppState>, doc_id: String) -> Result<(), String> {
    let session = state.session()?;
    state
        .projects
        .delete(&session, &doc_id)
        .await
        .map_err(|e| e.to_string())?;
    state.open_projects.lock().await.remove(&doc_id);
    Ok(())
}

/// Load a project for the detail view (cache first, store fallback)
#[tauri::command]
pub async fn open_project(state: State<'_, AppState>, doc_id: String) -> Result<DetailState, String> {
    let session = state.session()?;
    let mut detail = ProjectDetail::new(state.store.clone(), state.cache.clone(), session, doc_id.clone());
    let loaded = detail.load().await.map_err(|e| e.to_string())?.clone();

    state.open_projects.lock().await.insert(doc_id, detail);
    Ok(loaded)
}

/// Forget a detail view
#[tauri::command]
pub async fn close_project(state: State<'_, AppState>, doc_id: String) -> Result<(), String> {
    state.open_projects.lock().await.remove(&doc_id);
    Ok(())
}

/// Append a to-do item to an open project
#[tauri::command]
pub async fn add_project_todo(
    state: State<'_, AppState>,
    doc_id: String,
    text: String,
) -> Result<DetailState, String> {
    state.session()?;
    let mut open = state.open_projects.lock().await;
    let detail = open
        .get_mut(&doc_id)
        .ok_or_else(|| format!("Project {} is not open", doc_id))?;

    detail.add_todo(&text).await.map_err(|e| e.to_string())?;
    Ok(detail.state().clone())
}

/// Toggle completion of the item at `index` (mirror cache only)
#[tauri::command]
pub async fn toggle_project_todo(
    state: State<'_, AppState>,
    doc_id: String,
    index: usize,
) -> Result<DetailState, String> {
    state.session()?;
    let mut open = state.open_projects.lock().await;
    let detail = open
        .get_mut(&doc_id)
        .ok_or_else(|| format!("Project {} is not open", doc_id))?;

    detail.toggle_completion(index).await.map_err(|e| e.to_string())?;
    Ok(detail.state().clone())
}
