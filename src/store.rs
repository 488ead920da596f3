//! Global Application State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity.

use leptos::prelude::*;
use reactive_stores::Store;
use crate::models::{ProjectCard, ProjectsSnapshot, Session};

/// Dashboard list as last pushed by the backend
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProjectFeed {
    /// `seq` of the applied snapshot, 0 before the first one
    pub seq: u64,
    pub projects: Vec<ProjectCard>,
}

impl ProjectFeed {
    /// Take `snapshot` unless one at least as new was already applied.
    ///
    /// The same snapshot can arrive twice (event and command response) and
    /// in either order.
    pub fn apply(&mut self, snapshot: ProjectsSnapshot) -> bool {
        if snapshot.seq <= self.seq {
            return false;
        }
        self.seq = snapshot.seq;
        self.projects = snapshot.projects;
        true
    }

    /// Forget the projects; numbering keeps going so old snapshots stay stale
    pub fn clear(&mut self) {
        self.projects.clear();
    }
}

/// Global application state with field-level reactivity
#[derive(Clone, Debug, Default, Store)]
pub struct AppState {
    /// Current session, `None` when signed out
    pub session: Option<Session>,
    /// Latest project snapshot for the dashboard
    pub feed: ProjectFeed,
}

/// Type alias for the store
pub type AppStore = Store<AppState>;

/// Get the app store from context
pub fn use_app_store() -> AppStore {
    expect_context::<AppStore>()
}

// ========================
// Store Helper Functions
// ========================

/// Replace the session; signing out also drops the project snapshot
pub fn store_set_session(store: &AppStore, session: Option<Session>) {
    if session.is_none() {
        store.feed().write().clear();
    }
    store.session().set(session);
}

/// Apply a numbered snapshot from an event or `watch_projects`
pub fn store_apply_projects(store: &AppStore, snapshot: ProjectsSnapshot) {
    let seq = snapshot.seq;
    if !store.feed().write().apply(snapshot) {
        web_sys::console::log_1(&format!("[STORE] ignored stale project snapshot {}", seq).into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(doc_id: &str) -> ProjectCard {
        ProjectCard {
            doc_id: doc_id.to_string(),
            id: String::new(),
            title: doc_id.to_uppercase(),
            user: "alice".to_string(),
            todos: Vec::new(),
        }
    }

    fn snapshot(seq: u64, ids: &[&str]) -> ProjectsSnapshot {
        ProjectsSnapshot {
            seq,
            projects: ids.iter().map(|id| card(id)).collect(),
        }
    }

    #[test]
    fn test_first_snapshot_is_applied() {
        let mut feed = ProjectFeed::default();
        assert!(feed.apply(snapshot(1, &["a"])));
        assert_eq!(feed.seq, 1);
        assert_eq!(feed.projects, vec![card("a")]);
    }

    #[test]
    fn test_stale_or_repeated_snapshot_is_ignored() {
        let mut feed = ProjectFeed::default();
        assert!(feed.apply(snapshot(3, &["a", "b"])));
        // Command response for the initial snapshot arriving after an event
        assert!(!feed.apply(snapshot(2, &["a"])));
        assert!(!feed.apply(snapshot(3, &["a", "b"])));
        assert_eq!(feed.projects.len(), 2);
    }

    #[test]
    fn test_clear_keeps_numbering() {
        let mut feed = ProjectFeed::default();
        feed.apply(snapshot(5, &["a"]));
        feed.clear();
        assert!(feed.projects.is_empty());
        assert!(!feed.apply(snapshot(4, &["old"])));
        assert!(feed.apply(snapshot(6, &[])));
    }
}
