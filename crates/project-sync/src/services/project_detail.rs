//! Project Detail
//!
//! Loads a single project (mirror cache first, store fallback) and applies
//! item edits. Adding an item writes through to the store and then the
//! cache; toggling completion only rewrites the cache.

use serde::Serialize;
use serde_json::Map;
use std::sync::Arc;

use crate::domain::{DomainError, DomainResult, Project, Session, StoredProject, TodoItem};
use crate::export;
use crate::repository::{DocumentStore, MirrorCache};
use super::project_list::PROJECTS_COLLECTION;

/// Cache key for a project document
pub fn cache_key(doc_id: &str) -> String {
    format!("project-{}", doc_id)
}

/// Load state of the detail view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "project", rename_all = "snake_case")]
pub enum DetailState {
    Unloaded,
    Fetching,
    Rendered(StoredProject),
    /// Terminal: missing, or owned by someone else
    NotFound,
}

/// Where the rendered project came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadSource {
    Cache,
    Store,
}

pub struct ProjectDetail {
    store: Arc<dyn DocumentStore>,
    cache: Arc<dyn MirrorCache>,
    session: Session,
    doc_id: String,
    state: DetailState,
    source: Option<LoadSource>,
}

impl ProjectDetail {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        cache: Arc<dyn MirrorCache>,
        session: Session,
        doc_id: impl Into<String>,
    ) -> Self {
        Self {
            store,
            cache,
            session,
            doc_id: doc_id.into(),
            state: DetailState::Unloaded,
            source: None,
        }
    }

    pub fn doc_id(&self) -> &str {
        &self.doc_id
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    pub fn source(&self) -> Option<LoadSource> {
        self.source
    }

    pub fn project(&self) -> Option<&Project> {
        match &self.state {
            DetailState::Rendered(stored) => Some(&stored.project),
            _ => None,
        }
    }

    fn project_mut(&mut self) -> DomainResult<&mut Project> {
        match &mut self.state {
            DetailState::Rendered(stored) => Ok(&mut stored.project),
            _ => Err(DomainError::InvalidInput(format!("Project {} is not loaded", self.doc_id))),
        }
    }

    fn render(&mut self, project: Project, source: LoadSource) {
        self.state = DetailState::Rendered(StoredProject {
            doc_id: self.doc_id.clone(),
            project,
        });
        self.source = Some(source);
    }

    /// Cached snapshot, only if it decodes and belongs to the session
    async fn read_cache(&self) -> Option<Project> {
        let key = cache_key(&self.doc_id);
        let raw = match self.cache.get(&key).await {
            Ok(raw) => raw?,
            Err(e) => {
                log::warn!("mirror cache read failed for {}: {}", key, e);
                return None;
            }
        };
        match serde_json::from_str::<Project>(&raw) {
            Ok(project) if project.is_owned_by(&self.session.identity) => Some(project),
            Ok(_) => {
                log::debug!("ignoring cache entry {} owned by another identity", key);
                None
            }
            Err(e) => {
                log::warn!("ignoring undecodable cache entry {}: {}", key, e);
                None
            }
        }
    }

    async fn write_cache(&self, project: &Project) {
        let key = cache_key(&self.doc_id);
        let result = match serde_json::to_string(project) {
            Ok(json) => self.cache.set(&key, &json).await,
            Err(e) => Err(e.into()),
        };
        if let Err(e) = result {
            log::warn!("mirror cache write failed for {}: {}", key, e);
        }
    }

    /// Resolve the project: cache hit renders immediately, otherwise the
    /// store copy is rendered only when the session owns it.
    pub async fn load(&mut self) -> DomainResult<&DetailState> {
        if let Some(project) = self.read_cache().await {
            log::debug!("project {} rendered from cache", self.doc_id);
            self.render(project, LoadSource::Cache);
            return Ok(&self.state);
        }

        self.state = DetailState::Fetching;
        self.source = None;
        let doc = match self.store.get(PROJECTS_COLLECTION, &self.doc_id).await {
            Ok(doc) => doc,
            Err(e) => {
                self.state = DetailState::NotFound;
                return Err(e);
            }
        };

        let project = doc.and_then(|doc| match doc.decode::<Project>() {
            Ok(project) => Some(project),
            Err(e) => {
                log::warn!("project {} is malformed: {}", self.doc_id, e);
                None
            }
        });

        match project {
            Some(project) if project.is_owned_by(&self.session.identity) => {
                self.write_cache(&project).await;
                self.render(project, LoadSource::Store);
            }
            Some(_) => {
                log::info!("project {} is not owned by {}", self.doc_id, self.session.identity);
                self.state = DetailState::NotFound;
            }
            None => self.state = DetailState::NotFound,
        }
        Ok(&self.state)
    }

    /// Append an incomplete item. Blank text is ignored.
    pub async fn add_todo(&mut self, text: &str) -> DomainResult<()> {
        if text.trim().is_empty() {
            return Ok(());
        }

        let todos = {
            let project = self.project_mut()?;
            project.todos.push(TodoItem::new(text));
            project.todos.clone()
        };

        let mut partial = Map::new();
        partial.insert("todos".to_string(), serde_json::to_value(&todos)?);
        self.store.update(PROJECTS_COLLECTION, &self.doc_id, partial).await?;

        if let Some(project) = self.project() {
            self.write_cache(project).await;
        }
        Ok(())
    }

    /// Flip the completion flag at `index` in memory and in the cache.
    ///
    /// The document store is not written. Returns the new flag.
    pub async fn toggle_completion(&mut self, index: usize) -> DomainResult<bool> {
        let completed = {
            let project = self.project_mut()?;
            let len = project.todos.len();
            let todo = project
                .todos
                .get_mut(index)
                .ok_or_else(|| DomainError::InvalidInput(format!("No item at {} (have {})", index, len)))?;
            todo.completed = !todo.completed;
            todo.completed
        };

        if let Some(project) = self.project() {
            self.write_cache(project).await;
        }
        Ok(completed)
    }

    /// Markdown export of the loaded project
    pub fn export_markdown(&self) -> Option<String> {
        self.project().map(export::render_checklist)
    }
}

impl std::fmt::Debug for ProjectDetail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectDetail")
            .field("doc_id", &self.doc_id)
            .field("state", &self.state)
            .field("source", &self.source)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Identity;
    use crate::repository::{init_db, SqliteDocumentStore, SqliteMirrorCache};
    use crate::services::ProjectList;
    use crate::domain::ProjectDraft;
    use std::path::PathBuf;

    struct Fixture {
        store: Arc<SqliteDocumentStore>,
        cache: Arc<SqliteMirrorCache>,
    }

    impl Fixture {
        async fn new() -> Self {
            let store_db = init_db(&PathBuf::from(":memory:")).await.expect("store db");
            let cache_db = init_db(&PathBuf::from(":memory:")).await.expect("cache db");
            Self {
                store: Arc::new(SqliteDocumentStore::new(store_db.connection())),
                cache: Arc::new(SqliteMirrorCache::new(cache_db.connection())),
            }
        }

        async fn seed(&self, owner: &str, title: &str, items: &[(&str, bool)]) -> String {
            let list = ProjectList::new(self.store.clone());
            let todos = items
                .iter()
                .map(|(text, completed)| TodoItem { text: text.to_string(), completed: *completed })
                .collect();
            list.create_or_update(&session(owner), None, &ProjectDraft::new(title, todos))
                .await
                .expect("seed")
        }

        fn detail(&self, owner: &str, doc_id: &str) -> ProjectDetail {
            ProjectDetail::new(self.store.clone(), self.cache.clone(), session(owner), doc_id)
        }

        async fn stored(&self, doc_id: &str) -> Project {
            self.store
                .get(PROJECTS_COLLECTION, doc_id)
                .await
                .unwrap()
                .unwrap()
                .decode()
                .unwrap()
        }

        async fn cached(&self, doc_id: &str) -> Option<Project> {
            self.cache
                .get(&cache_key(doc_id))
                .await
                .unwrap()
                .map(|raw| serde_json::from_str(&raw).unwrap())
        }
    }

    fn session(uid: &str) -> Session {
        Session::new(Identity::new(uid), None)
    }

    #[tokio::test]
    async fn test_cache_miss_fetches_and_populates_cache() {
        let fx = Fixture::new().await;
        let doc_id = fx.seed("alice", "Trip", &[("pack", false)]).await;

        let mut detail = fx.detail("alice", &doc_id);
        assert_eq!(detail.state(), &DetailState::Unloaded);
        detail.load().await.unwrap();

        assert_eq!(detail.source(), Some(LoadSource::Store));
        assert_eq!(detail.project().unwrap().title, "Trip");
        assert_eq!(fx.cached(&doc_id).await, Some(fx.stored(&doc_id).await));
    }

    #[tokio::test]
    async fn test_cache_hit_renders_without_store() {
        let fx = Fixture::new().await;
        let doc_id = fx.seed("alice", "Trip", &[]).await;

        let cached = Project {
            id: "p".into(),
            title: "From cache".into(),
            user: "alice".into(),
            todos: vec![],
        };
        fx.cache.set(&cache_key(&doc_id), &serde_json::to_string(&cached).unwrap()).await.unwrap();

        let mut detail = fx.detail("alice", &doc_id);
        detail.load().await.unwrap();
        assert_eq!(detail.source(), Some(LoadSource::Cache));
        assert_eq!(detail.project().unwrap().title, "From cache");
    }

    #[tokio::test]
    async fn test_foreign_cache_entry_is_not_rendered() {
        let fx = Fixture::new().await;
        let doc_id = fx.seed("bob", "Bob's", &[("secret", false)]).await;

        // Bob's snapshot left behind in the shared cache
        let mut bobs_view = fx.detail("bob", &doc_id);
        bobs_view.load().await.unwrap();
        assert!(fx.cached(&doc_id).await.is_some());

        let mut detail = fx.detail("alice", &doc_id);
        let state = detail.load().await.unwrap().clone();
        assert_eq!(state, DetailState::NotFound);
        assert!(detail.project().is_none());
    }

    #[tokio::test]
    async fn test_undecodable_cache_entry_falls_back_to_store() {
        let fx = Fixture::new().await;
        let doc_id = fx.seed("alice", "Trip", &[]).await;
        fx.cache.set(&cache_key(&doc_id), "not json").await.unwrap();

        let mut detail = fx.detail("alice", &doc_id);
        detail.load().await.unwrap();
        assert_eq!(detail.source(), Some(LoadSource::Store));
        assert!(fx.cached(&doc_id).await.is_some());
    }

    #[tokio::test]
    async fn test_missing_and_foreign_projects_are_not_found() {
        let fx = Fixture::new().await;
        let doc_id = fx.seed("bob", "Bob's", &[]).await;

        let mut missing = fx.detail("alice", "does-not-exist");
        assert_eq!(missing.load().await.unwrap(), &DetailState::NotFound);

        let mut foreign = fx.detail("alice", &doc_id);
        assert_eq!(foreign.load().await.unwrap(), &DetailState::NotFound);
        assert!(fx.cached(&doc_id).await.is_none());
    }

    #[tokio::test]
    async fn test_add_todo_writes_store_then_cache() {
        let fx = Fixture::new().await;
        let doc_id = fx.seed("alice", "Trip", &[("pack", false)]).await;
        let mut detail = fx.detail("alice", &doc_id);
        detail.load().await.unwrap();

        detail.add_todo("book hotel").await.unwrap();

        let stored = fx.stored(&doc_id).await;
        assert_eq!(stored.todos.last(), Some(&TodoItem::new("book hotel")));
        assert_eq!(stored.title, "Trip");
        assert_eq!(fx.cached(&doc_id).await.unwrap(), stored);
        assert_eq!(detail.project().unwrap(), &stored);
    }

    #[tokio::test]
    async fn test_add_blank_todo_is_noop() {
        let fx = Fixture::new().await;
        let doc_id = fx.seed("alice", "Trip", &[("pack", false)]).await;
        let mut detail = fx.detail("alice", &doc_id);
        detail.load().await.unwrap();

        detail.add_todo("   ").await.unwrap();
        detail.add_todo("").await.unwrap();
        assert_eq!(detail.project().unwrap().todos.len(), 1);
        assert_eq!(fx.stored(&doc_id).await.todos.len(), 1);
    }

    #[tokio::test]
    async fn test_add_before_load_is_rejected() {
        let fx = Fixture::new().await;
        let doc_id = fx.seed("alice", "Trip", &[]).await;
        let mut detail = fx.detail("alice", &doc_id);
        assert!(detail.add_todo("x").await.is_err());
    }

    #[tokio::test]
    async fn test_toggle_flips_only_target_item() {
        let fx = Fixture::new().await;
        let doc_id = fx.seed("alice", "Trip", &[("a", false), ("b", true), ("c", false)]).await;
        let mut detail = fx.detail("alice", &doc_id);
        detail.load().await.unwrap();
        let before = detail.project().unwrap().clone();

        assert!(detail.toggle_completion(0).await.unwrap());
        let after = detail.project().unwrap();
        assert_eq!(after.title, before.title);
        assert!(after.todos[0].completed);
        assert_eq!(after.todos[1..], before.todos[1..]);
        assert_eq!(after.todos[0].text, before.todos[0].text);

        assert!(!detail.toggle_completion(0).await.unwrap());
        assert_eq!(detail.project().unwrap(), &before);
    }

    #[tokio::test]
    async fn test_toggle_out_of_range_changes_nothing() {
        let fx = Fixture::new().await;
        let doc_id = fx.seed("alice", "Trip", &[("a", false)]).await;
        let mut detail = fx.detail("alice", &doc_id);
        detail.load().await.unwrap();
        let before = detail.project().unwrap().clone();

        assert!(detail.toggle_completion(5).await.unwrap_err().is_validation());
        assert_eq!(detail.project().unwrap(), &before);
    }

    /// Toggling only reaches the mirror cache; the store keeps the old flag
    /// while adding an item writes through.
    #[tokio::test]
    async fn test_toggle_does_not_write_through_to_store() {
        let fx = Fixture::new().await;
        let doc_id = fx.seed("alice", "Trip", &[("a", false)]).await;
        let mut detail = fx.detail("alice", &doc_id);
        detail.load().await.unwrap();

        detail.toggle_completion(0).await.unwrap();
        assert!(fx.cached(&doc_id).await.unwrap().todos[0].completed);
        assert!(!fx.stored(&doc_id).await.todos[0].completed);

        // A later add sends the whole in-memory list, toggles included
        detail.add_todo("b").await.unwrap();
        assert!(fx.stored(&doc_id).await.todos[0].completed);
    }

    #[tokio::test]
    async fn test_reload_prefers_cached_toggle_state() {
        let fx = Fixture::new().await;
        let doc_id = fx.seed("alice", "Trip", &[("a", false)]).await;
        let mut first = fx.detail("alice", &doc_id);
        first.load().await.unwrap();
        first.toggle_completion(0).await.unwrap();

        let mut second = fx.detail("alice", &doc_id);
        second.load().await.unwrap();
        assert_eq!(second.source(), Some(LoadSource::Cache));
        assert!(second.project().unwrap().todos[0].completed);
    }

    #[tokio::test]
    async fn test_export_markdown_of_loaded_project() {
        let fx = Fixture::new().await;
        let doc_id = fx.seed("alice", "T", &[("a", false), ("b", true)]).await;
        let mut detail = fx.detail("alice", &doc_id);
        assert!(detail.export_markdown().is_none());

        detail.load().await.unwrap();
        let markdown = detail.export_markdown().unwrap();
        assert!(markdown.contains("**Summary:** 1 / 2 completed"));
    }

    #[test]
    fn test_state_serialization() {
        let json = serde_json::to_value(&DetailState::NotFound).unwrap();
        assert_eq!(json, serde_json::json!({"status": "not_found"}));
    }
}
