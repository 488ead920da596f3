//! Repository Layer
//!
//! Data access abstractions and implementations.

mod traits;
mod listeners;
mod db;
mod document_store;
mod mirror_cache;


pub use traits::{DocumentSnapshot, DocumentStore, MirrorCache, SnapshotListener};
pub use listeners::{Listener, ListenerRegistry, Subscription};
pub use db::{init_db, DbState, SharedConnection};
pub use document_store::SqliteDocumentStore;
pub use mirror_cache::SqliteMirrorCache;
