//! Events pushed to the frontend

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use project_sync::domain::StoredProject;

/// Payload: `Option<Session>`
pub const SESSION_CHANGED: &str = "session-changed";

/// Payload: `ProjectsSnapshot`
pub const PROJECTS_CHANGED: &str = "projects-changed";

/// The session's projects, numbered in delivery order.
///
/// The frontend drops any snapshot whose `seq` is not above the last one it
/// applied, so a late command response cannot overwrite a newer event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectsSnapshot {
    pub seq: u64,
    pub projects: Vec<StoredProject>,
}

/// Source of `ProjectsSnapshot::seq`, shared by every watch of the app
#[derive(Debug, Clone, Default)]
pub struct SnapshotCounter(Arc<AtomicU64>);

impl SnapshotCounter {
    /// Number `projects`; the first snapshot is 1
    pub fn stamp(&self, projects: Vec<StoredProject>) -> ProjectsSnapshot {
        let seq = self.0.fetch_add(1, Ordering::SeqCst) + 1;
        ProjectsSnapshot { seq, projects }
    }
}
