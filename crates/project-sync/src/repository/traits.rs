//! Repository Layer - Core Traits
//!
//! Abstract interfaces for the document store and the local mirror cache.
//! Implementations can use SQLite, a hosted service, etc.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::domain::DomainResult;
use super::listeners::{Listener, Subscription};

/// One document as returned by the store
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSnapshot {
    /// Store-assigned key
    pub id: String,
    pub data: Map<String, Value>,
}

impl DocumentSnapshot {
    /// Decode the document body into a typed value
    pub fn decode<T: DeserializeOwned>(&self) -> DomainResult<T> {
        Ok(serde_json::from_value(Value::Object(self.data.clone()))?)
    }
}

/// Callback receiving every document of a collection after each change
pub type SnapshotListener = Listener<Vec<DocumentSnapshot>>;

/// Schemaless collection store
///
/// Last write wins per document; no cross-document transactions.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a document and return its generated key
    async fn create(&self, collection: &str, data: Map<String, Value>) -> DomainResult<String>;

    /// Merge top-level fields into an existing document
    async fn update(&self, collection: &str, id: &str, partial: Map<String, Value>) -> DomainResult<()>;

    /// Delete a document. Deleting a missing document is not an error.
    async fn delete(&self, collection: &str, id: &str) -> DomainResult<()>;

    /// Fetch one document
    async fn get(&self, collection: &str, id: &str) -> DomainResult<Option<DocumentSnapshot>>;

    /// All documents of a collection in insertion order
    async fn list(&self, collection: &str) -> DomainResult<Vec<DocumentSnapshot>>;

    /// Register a live query. The listener fires once with the current
    /// contents, then after every change to the collection, until the
    /// returned handle is dropped.
    async fn subscribe(&self, collection: &str, listener: SnapshotListener) -> DomainResult<Subscription>;
}

/// Client-side key-value cache of serialized values
///
/// No expiry and no size bound.
#[async_trait]
pub trait MirrorCache: Send + Sync {
    async fn get(&self, key: &str) -> DomainResult<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> DomainResult<()>;
}
