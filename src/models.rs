//! Frontend Models
//!
//! Data structures matching backend entities.

use serde::{Deserialize, Serialize};

/// Signed-in user (matches backend `Session`)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Session {
    pub identity: String,
    pub display_name: Option<String>,
    pub signed_in_at: i64,
}

impl Session {
    /// Name shown in the header
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.identity)
    }
}

/// One checklist entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TodoItem {
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

/// Project as delivered by the backend: document id plus the flattened body
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProjectCard {
    pub doc_id: String,
    #[serde(default)]
    pub id: String,
    pub title: String,
    pub user: String,
    #[serde(default)]
    pub todos: Vec<TodoItem>,
}

impl ProjectCard {
    pub fn completed_count(&self) -> usize {
        self.todos.iter().filter(|t| t.completed).count()
    }
}

/// Numbered `projects-changed` payload (matches backend `ProjectsSnapshot`)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProjectsSnapshot {
    pub seq: u64,
    pub projects: Vec<ProjectCard>,
}

/// Detail view state (matches backend `DetailState`)
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "status", content = "project", rename_all = "snake_case")]
pub enum DetailState {
    Unloaded,
    Fetching,
    Rendered(ProjectCard),
    NotFound,
}

