//! Document Store Implementation
//!
//! SQLite-backed implementation of `DocumentStore`. Documents are JSON
//! objects keyed by (collection, id). Every successful write re-reads the
//! collection and pushes the full contents to its live listeners while
//! still holding the connection, so listeners must not block on the store.

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::{Map, Value};

use crate::domain::{DomainError, DomainResult};
use super::db::SharedConnection;
use super::listeners::{ListenerRegistry, Subscription};
use super::traits::{DocumentSnapshot, DocumentStore, SnapshotListener};

/// SQLite implementation of the document store
pub struct SqliteDocumentStore {
    conn: SharedConnection,
    listeners: ListenerRegistry<Vec<DocumentSnapshot>>,
}

impl SqliteDocumentStore {
    pub fn new(conn: SharedConnection) -> Self {
        Self {
            conn,
            listeners: ListenerRegistry::new(),
        }
    }

    /// Number of live queries currently registered
    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }

    /// Push the current collection contents to its listeners.
    ///
    /// Runs under the connection lock so deliveries follow write order.
    fn publish(&self, conn: &Connection, collection: &str) {
        if !self.listeners.has_listeners(collection) {
            return;
        }
        match query_collection(conn, collection) {
            Ok(docs) => self.listeners.notify(collection, &docs),
            Err(e) => log::warn!("failed to refresh live query for {}: {}", collection, e),
        }
    }
}

fn new_document_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

fn parse_body(id: String, body: &str) -> DomainResult<DocumentSnapshot> {
    match serde_json::from_str::<Value>(body)? {
        Value::Object(data) => Ok(DocumentSnapshot { id, data }),
        other => Err(DomainError::Internal(format!(
            "document {} is not an object: {}",
            id, other
        ))),
    }
}

fn query_collection(conn: &Connection, collection: &str) -> DomainResult<Vec<DocumentSnapshot>> {
    let mut stmt = conn.prepare(
        "SELECT id, body FROM documents WHERE collection = ?1 ORDER BY created_at, rowid",
    )?;
    let rows = stmt.query_map(params![collection], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
    })?;

    let mut docs = Vec::new();
    for row in rows {
        let (id, body) = row?;
        docs.push(parse_body(id, &body)?);
    }
    Ok(docs)
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    async fn create(&self, collection: &str, data: Map<String, Value>) -> DomainResult<String> {
        let id = new_document_id();
        let body = serde_json::to_string(&data)?;
        let conn = self.conn.lock().await;
        let now = now_millis();
        conn.execute(
            "INSERT INTO documents (collection, id, body, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![collection, id, body, now, now],
        )?;
        log::debug!("created {}/{}", collection, id);

        self.publish(&conn, collection);
        Ok(id)
    }

    async fn update(&self, collection: &str, id: &str, partial: Map<String, Value>) -> DomainResult<()> {
        let conn = self.conn.lock().await;
        let existing: Option<String> = conn
            .query_row(
                "SELECT body FROM documents WHERE collection = ?1 AND id = ?2",
                params![collection, id],
                |row| row.get(0),
            )
            .optional()?;
        let existing = existing
            .ok_or_else(|| DomainError::NotFound(format!("{}/{}", collection, id)))?;

        let mut doc = parse_body(id.to_string(), &existing)?;
        for (key, value) in partial {
            doc.data.insert(key, value);
        }

        conn.execute(
            "UPDATE documents SET body = ?1, updated_at = ?2 WHERE collection = ?3 AND id = ?4",
            params![serde_json::to_string(&doc.data)?, now_millis(), collection, id],
        )?;
        log::debug!("updated {}/{}", collection, id);

        self.publish(&conn, collection);
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> DomainResult<()> {
        let conn = self.conn.lock().await;
        let removed = conn.execute(
            "DELETE FROM documents WHERE collection = ?1 AND id = ?2",
            params![collection, id],
        )?;
        log::debug!("deleted {}/{} ({} rows)", collection, id, removed);

        if removed > 0 {
            self.publish(&conn, collection);
        }
        Ok(())
    }

    async fn get(&self, collection: &str, id: &str) -> DomainResult<Option<DocumentSnapshot>> {
        let conn = self.conn.lock().await;
        let body: Option<String> = conn
            .query_row(
                "SELECT body FROM documents WHERE collection = ?1 AND id = ?2",
                params![collection, id],
                |row| row.get(0),
            )
            .optional()?;

        body.map(|b| parse_body(id.to_string(), &b)).transpose()
    }

    async fn list(&self, collection: &str) -> DomainResult<Vec<DocumentSnapshot>> {
        let conn = self.conn.lock().await;
        query_collection(&conn, collection)
    }

    async fn subscribe(&self, collection: &str, listener: SnapshotListener) -> DomainResult<Subscription> {
        // Registered and primed under the same lock writers publish under,
        // so no write lands between the initial snapshot and the first change
        let conn = self.conn.lock().await;
        let initial = query_collection(&conn, collection)?;
        let subscription = self.listeners.add(collection, listener.clone());
        listener(&initial);
        Ok(subscription)
    }
}
