//! Project Sync
//!
//! Core of the project-cards app, free of any UI or Tauri dependency.
//!
//! Layered architecture:
//! - domain: projects, to-do items, identities and sessions
//! - repository: document store and mirror cache traits, SQLite implementations
//! - session: identity provider
//! - services: list and detail view operations
//! - export: Markdown checklist and gist publishing
//! - config: file + environment configuration

pub mod config;
pub mod domain;
pub mod export;
pub mod repository;
pub mod services;
pub mod session;

pub use config::AppConfig;
pub use domain::{DomainError, DomainResult, Identity, Project, ProjectDraft, Session, StoredProject, TodoItem};
