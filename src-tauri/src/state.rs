//! Application state shared across commands

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, OnceLock};

use project_sync::domain::{DomainResult, Session};
use project_sync::export::GistClient;
use project_sync::repository::{init_db, SqliteDocumentStore, SqliteMirrorCache, Subscription};
use project_sync::services::{ProjectDetail, ProjectList};
use project_sync::session::{require_session, IdentityProvider, LocalIdentityProvider};
use project_sync::AppConfig;

use crate::events::{ProjectsSnapshot, SnapshotCounter};

/// Document store database (stand-in for the hosted store)
pub const STORE_DB: &str = "projects.db";
/// Mirror cache database
pub const CACHE_DB: &str = "mirror.db";

pub struct AppState {
    pub identity: Arc<LocalIdentityProvider>,
    pub store: Arc<SqliteDocumentStore>,
    pub cache: Arc<SqliteMirrorCache>,
    pub projects: ProjectList,
    pub gist: GistClient,
    /// Live list subscription of the dashboard, if mounted
    pub project_watch: Mutex<Option<Subscription>>,
    project_seq: SnapshotCounter,
    /// Detail views keyed by document id
    pub open_projects: tokio::sync::Mutex<HashMap<String, ProjectDetail>>,
    session_bridge: Mutex<Option<Subscription>>,
}

impl AppState {
    pub async fn init(data_dir: &Path, config: &AppConfig) -> DomainResult<Self> {
        let store_db = init_db(&data_dir.join(STORE_DB)).await?;
        let cache_db = init_db(&data_dir.join(CACHE_DB)).await?;

        let store = Arc::new(SqliteDocumentStore::new(store_db.connection()));
        let cache = Arc::new(SqliteMirrorCache::new(cache_db.connection()));
        let gist = GistClient::new(&config.export);
        if !gist.has_token() {
            log::warn!("no GitHub token configured; gist export will fail");
        }

        Ok(Self {
            identity: Arc::new(LocalIdentityProvider::new(config.account.clone())),
            projects: ProjectList::new(store.clone()),
            store,
            cache,
            gist,
            project_watch: Mutex::new(None),
            project_seq: SnapshotCounter::default(),
            open_projects: tokio::sync::Mutex::new(HashMap::new()),
            session_bridge: Mutex::new(None),
        })
    }

    /// Session of the signed-in user, or the IPC error string
    pub fn session(&self) -> Result<Session, String> {
        require_session(self.identity.as_ref()).map_err(|e| e.to_string())
    }

    /// Forward session changes to `on_change` for the lifetime of the app
    pub fn bridge_session(&self, on_change: impl Fn(&Option<Session>) + Send + Sync + 'static) {
        let subscription = self.identity.on_session_change(Arc::new(on_change));
        *self.session_bridge.lock().unwrap_or_else(|p| p.into_inner()) = Some(subscription);
    }

    /// Replace the dashboard watch with one for the current session.
    ///
    /// Every snapshot, the initial one included, goes to `emit`. The initial
    /// snapshot is also returned so the caller can seed its view even if
    /// that emission reached nobody.
    pub async fn watch_projects(
        &self,
        emit: impl Fn(&ProjectsSnapshot) + Send + Sync + 'static,
    ) -> Result<ProjectsSnapshot, String> {
        let session = self.session()?;
        self.set_project_watch(None);

        let counter = self.project_seq.clone();
        let initial: Arc<OnceLock<ProjectsSnapshot>> = Arc::new(OnceLock::new());
        let first = initial.clone();
        let subscription = self
            .projects
            .watch(&session, move |projects| {
                let snapshot = counter.stamp(projects);
                let _ = first.set(snapshot.clone());
                emit(&snapshot);
            })
            .await
            .map_err(|e| e.to_string())?;

        self.set_project_watch(Some(subscription));
        initial
            .get()
            .cloned()
            .ok_or_else(|| "project watch delivered no snapshot".to_string())
    }

    pub fn set_project_watch(&self, subscription: Option<Subscription>) {
        *self.project_watch.lock().unwrap_or_else(|p| p.into_inner()) = subscription;
    }

    pub fn is_watching_projects(&self) -> bool {
        self.project_watch.lock().unwrap_or_else(|p| p.into_inner()).is_some()
    }

    /// Drop the list subscription and every open detail view
    pub async fn release_views(&self) {
        self.set_project_watch(None);
        self.open_projects.lock().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use project_sync::config::AccountConfig;

    fn config() -> AppConfig {
        AppConfig {
            account: Some(AccountConfig { uid: "alice".to_string(), display_name: None }),
            ..AppConfig::default()
        }
    }

    #[tokio::test]
    async fn test_init_creates_both_databases() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::init(dir.path(), &config()).await.unwrap();

        assert!(dir.path().join(STORE_DB).exists());
        assert!(dir.path().join(CACHE_DB).exists());
        assert!(!state.gist.has_token());
        assert!(state.session().is_err());
    }

    #[tokio::test]
    async fn test_release_views_drops_watch() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::init(dir.path(), &config()).await.unwrap();
        let session = state.identity.sign_in().await.unwrap();

        let watch = state.projects.watch(&session, |_| {}).await.unwrap();
        state.set_project_watch(Some(watch));
        assert!(state.is_watching_projects());
        assert_eq!(state.store.subscriber_count(), 1);

        state.release_views().await;
        assert!(!state.is_watching_projects());
        assert_eq!(state.store.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_watch_returns_initial_snapshot_and_numbers_updates() {
        use project_sync::domain::ProjectDraft;
        use project_sync::TodoItem;

        let dir = tempfile::tempdir().unwrap();
        let state = AppState::init(dir.path(), &config()).await.unwrap();
        let session = state.identity.sign_in().await.unwrap();
        let draft = ProjectDraft::new("Trip", vec![TodoItem::new("pack")]);
        state.projects.create_or_update(&session, None, &draft).await.unwrap();

        let emitted: Arc<Mutex<Vec<ProjectsSnapshot>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = emitted.clone();
        let initial = state
            .watch_projects(move |snapshot| sink.lock().unwrap().push(snapshot.clone()))
            .await
            .unwrap();

        // Returned even though the emission may have had no listener
        assert_eq!(initial.projects.len(), 1);
        assert_eq!(emitted.lock().unwrap()[0], initial);

        state.projects.create_or_update(&session, None, &draft).await.unwrap();
        let emitted = emitted.lock().unwrap();
        assert_eq!(emitted.len(), 2);
        assert!(emitted[1].seq > initial.seq);
        assert_eq!(emitted[1].projects.len(), 2);
    }

    #[tokio::test]
    async fn test_rewatch_keeps_numbering_increasing() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::init(dir.path(), &config()).await.unwrap();
        state.identity.sign_in().await.unwrap();

        let first = state.watch_projects(|_| {}).await.unwrap();
        let second = state.watch_projects(|_| {}).await.unwrap();
        assert!(second.seq > first.seq);
        assert_eq!(state.store.subscriber_count(), 1);
    }

    #[tokio::test]
    async fn test_watch_requires_session() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::init(dir.path(), &config()).await.unwrap();
        assert_eq!(state.watch_projects(|_| {}).await.unwrap_err(), "Unauthorized: Not signed in");
    }
}
