//! Project Entity
//!
//! A titled checklist owned by one identity. Items have no identifier of
//! their own and are addressed by position.

use serde::{Deserialize, Serialize};
use super::error::{DomainError, DomainResult};
use super::identity::Identity;

/// A single checklist line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

impl TodoItem {
    /// Create a new incomplete item
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), completed: false }
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Project document body as stored in the `projects` collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Generated unique identifier (distinct from the store key)
    #[serde(default)]
    pub id: String,
    pub title: String,
    /// Owner identity
    pub user: String,
    #[serde(default)]
    pub todos: Vec<TodoItem>,
}

impl Project {
    /// Create a new project owned by `owner` with a fresh identifier
    pub fn new(title: String, owner: &Identity, todos: Vec<TodoItem>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title,
            user: owner.as_str().to_string(),
            todos,
        }
    }

    pub fn is_owned_by(&self, identity: &Identity) -> bool {
        self.user == identity.as_str()
    }

    pub fn completed_count(&self) -> usize {
        self.todos.iter().filter(|t| t.completed).count()
    }

    pub fn pending(&self) -> impl Iterator<Item = &TodoItem> {
        self.todos.iter().filter(|t| !t.completed)
    }

    pub fn completed(&self) -> impl Iterator<Item = &TodoItem> {
        self.todos.iter().filter(|t| t.completed)
    }
}

/// A project together with its document-store key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredProject {
    pub doc_id: String,
    #[serde(flatten)]
    pub project: Project,
}

/// Unvalidated title and items as submitted from the editing form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectDraft {
    pub title: String,
    pub todos: Vec<TodoItem>,
}

impl ProjectDraft {
    pub fn new(title: impl Into<String>, todos: Vec<TodoItem>) -> Self {
        Self { title: title.into(), todos }
    }

    /// Trimmed title and the non-blank items, in order
    pub fn normalize(&self) -> DomainResult<(String, Vec<TodoItem>)> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(DomainError::InvalidInput("Project title is required".to_string()));
        }
        let todos = self.todos.iter().filter(|t| !t.is_blank()).cloned().collect();
        Ok((title.to_string(), todos))
    }
}
