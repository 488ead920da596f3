//! Commands Layer
//!
//! Tauri command handlers that bridge frontend to backend services.

mod session_cmd;
mod project_cmd;
mod export_cmd;

pub use session_cmd::*;
pub use project_cmd::*;
pub use export_cmd::*;
