//! Tauri Commands for sign-in and sign-out

use tauri::State;
use project_sync::domain::Session;
use project_sync::session::IdentityProvider;
use crate::AppState;

/// Sign in with the configured account
#[tauri::command]
pub async fn sign_in(state: State<'_, AppState>) -> Result<Session, String> {
    state.identity.sign_in().await.map_err(|e| e.to_string())
}

/// Sign out and tear down every view bound to the old session
#[tauri::command]
pub async fn sign_out(state: State<'_, AppState>) -> Result<(), String> {
    state.release_views().await;
    state.identity.sign_out().await.map_err(|e| e.to_string())
}

#[tauri::command]
pub fn current_session(state: State<'_, AppState>) -> Option<Session> {
    state.identity.current_session()
}
