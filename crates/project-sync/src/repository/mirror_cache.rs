//! Mirror Cache Implementation
//!
//! Persists serialized snapshots in a key-value table.

use async_trait::async_trait;
use rusqlite::{params, OptionalExtension};

use crate::domain::DomainResult;
use super::db::SharedConnection;
use super::traits::MirrorCache;

pub struct SqliteMirrorCache {
    conn: SharedConnection,
}

impl SqliteMirrorCache {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl MirrorCache for SqliteMirrorCache {
    async fn get(&self, key: &str) -> DomainResult<Option<String>> {
        let conn = self.conn.lock().await;
        Ok(conn
            .query_row(
                "SELECT value FROM mirror_cache WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?)
    }

    async fn set(&self, key: &str, value: &str) -> DomainResult<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO mirror_cache (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, chrono::Utc::now().timestamp_millis()],
        )?;
        Ok(())
    }
}
