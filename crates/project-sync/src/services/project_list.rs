//! Project List
//!
//! Create, edit, delete and live-watch the projects owned by the session.

use serde_json::{Map, Value};
use std::sync::Arc;

use crate::domain::{DomainError, DomainResult, Identity, Project, ProjectDraft, Session, StoredProject, TodoItem};
use crate::repository::{DocumentSnapshot, DocumentStore, Subscription};

/// Collection holding all project documents
pub const PROJECTS_COLLECTION: &str = "projects";

/// Decode the documents owned by `identity`, skipping malformed ones
pub fn owned_projects(docs: &[DocumentSnapshot], identity: &Identity) -> Vec<StoredProject> {
    docs.iter()
        .filter_map(|doc| match doc.decode::<Project>() {
            Ok(project) => Some(StoredProject { doc_id: doc.id.clone(), project }),
            Err(e) => {
                log::warn!("skipping malformed project {}: {}", doc.id, e);
                None
            }
        })
        .filter(|p| p.project.is_owned_by(identity))
        .collect()
}

fn to_document(value: impl serde::Serialize) -> DomainResult<Map<String, Value>> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        _ => Err(DomainError::Internal("project did not serialize to an object".to_string())),
    }
}

#[derive(serde::Serialize)]
struct ProjectUpdate<'a> {
    title: &'a str,
    user: &'a str,
    todos: &'a [TodoItem],
}

pub struct ProjectList {
    store: Arc<dyn DocumentStore>,
}

impl ProjectList {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Fetch a project and check it belongs to the session
    async fn owned(&self, session: &Session, doc_id: &str) -> DomainResult<Option<Project>> {
        let Some(doc) = self.store.get(PROJECTS_COLLECTION, doc_id).await? else {
            return Ok(None);
        };
        let project: Project = doc.decode()?;
        if !project.is_owned_by(&session.identity) {
            return Err(DomainError::Unauthorized(format!("Project {} belongs to another user", doc_id)));
        }
        Ok(Some(project))
    }

    /// Insert a new project, or overwrite title/items of `editing`.
    ///
    /// Returns the document key.
    pub async fn create_or_update(
        &self,
        session: &Session,
        editing: Option<&str>,
        draft: &ProjectDraft,
    ) -> DomainResult<String> {
        let (title, todos) = draft.normalize()?;

        match editing {
            Some(doc_id) => {
                if self.owned(session, doc_id).await?.is_none() {
                    return Err(DomainError::NotFound(format!("Project {}", doc_id)));
                }
                let update = ProjectUpdate {
                    title: &title,
                    user: session.identity.as_str(),
                    todos: &todos,
                };
                self.store.update(PROJECTS_COLLECTION, doc_id, to_document(&update)?).await?;
                log::info!("updated project {} ({} items)", doc_id, todos.len());
                Ok(doc_id.to_string())
            }
            None => {
                let project = Project::new(title, &session.identity, todos);
                let doc_id = self.store.create(PROJECTS_COLLECTION, to_document(&project)?).await?;
                log::info!("created project {} as {}", project.id, doc_id);
                Ok(doc_id)
            }
        }
    }

    /// Remove a project. No confirmation and no undo.
    pub async fn delete(&self, session: &Session, doc_id: &str) -> DomainResult<()> {
        if self.owned(session, doc_id).await?.is_some() {
            self.store.delete(PROJECTS_COLLECTION, doc_id).await?;
            log::info!("deleted project {}", doc_id);
        }
        Ok(())
    }

    /// Call `on_change` with the session's projects now and after every
    /// change to the collection
    pub async fn watch(
        &self,
        session: &Session,
        on_change: impl Fn(Vec<StoredProject>) + Send + Sync + 'static,
    ) -> DomainResult<Subscription> {
        let identity = session.identity.clone();
        self.store
            .subscribe(
                PROJECTS_COLLECTION,
                Arc::new(move |docs: &Vec<DocumentSnapshot>| on_change(owned_projects(docs, &identity))),
            )
            .await
    }
}
