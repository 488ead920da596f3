//! Project Cards Backend
//!
//! Layered architecture:
//! - project-sync crate: domain, store/cache, identity, services, export
//! - state: application state shared across commands
//! - commands: Tauri command handlers
//! - events: notifications pushed to the frontend

use tauri::{Emitter, Manager};

mod commands;
mod events;
mod state;

pub use state::AppState;

use project_sync::AppConfig;

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    tauri::Builder::default()
        .setup(|app| {
            // Single instance check - must be first!
            #[cfg(desktop)]
            app.handle().plugin(tauri_plugin_single_instance::init(|_app, _args, _cwd| {
                // Focus the existing window when a new instance tries to start
                if let Some(window) = _app.get_webview_window("main") {
                    let _ = window.set_focus();
                }
            }))?;

            let app_handle = app.handle().clone();

            // Initialize logging
            if let Err(e) = rolling_logger::init_logger(app_handle.path().app_log_dir()?, "ProjectCards") {
                eprintln!("[{}] logger init failed: {}", chrono::Local::now().format("%H:%M:%S%.3f"), e);
            }

            let config = AppConfig::load(&app_handle.path().app_config_dir()?)?;
            let data_dir = app_handle.path().app_data_dir()?;
            log::info!("data directory: {}", data_dir.display());

            let state = tauri::async_runtime::block_on(AppState::init(&data_dir, &config))?;

            let emitter = app_handle.clone();
            state.bridge_session(move |session| {
                if let Err(e) = emitter.emit(events::SESSION_CHANGED, session) {
                    log::warn!("failed to emit {}: {}", events::SESSION_CHANGED, e);
                }
            });

            app.manage(state);
            let _ = rolling_logger::info("App setup complete");
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            // Session
            commands::sign_in,
            commands::sign_out,
            commands::current_session,
            // Project list
            commands::watch_projects,
            commands::unwatch_projects,
            commands::save_project,
            commands::delete_project,
            // Project detail
            commands::open_project,
            commands::close_project,
            commands::add_project_todo,
            commands::toggle_project_todo,
            // Export
            commands::preview_project_export,
            commands::export_project_gist,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
