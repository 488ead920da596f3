//! Project Commands
//!
//! Frontend bindings for the dashboard and project page.

use wasm_bindgen::prelude::*;
use serde::Serialize;
use crate::models::{DetailState, ProjectsSnapshot, TodoItem};
use super::{call, call_with, DocIdArgs};

// ========================
// Argument Structs
// ========================

#[derive(Serialize)]
struct SaveProjectArgs<'a> {
    editing: Option<&'a str>,
    title: &'a str,
    todos: &'a [TodoItem],
}

#[derive(Serialize)]
struct AddTodoArgs<'a> {
    #[serde(rename = "docId")]
    doc_id: &'a str,
    text: &'a str,
}

#[derive(Serialize)]
struct ToggleTodoArgs<'a> {
    #[serde(rename = "docId")]
    doc_id: &'a str,
    index: usize,
}

// ========================
// Dashboard Commands
// ========================

/// Start receiving `projects-changed` events; returns the initial snapshot
pub async fn watch_projects() -> Result<ProjectsSnapshot, String> {
    call("watch_projects", JsValue::NULL).await
}

pub async fn unwatch_projects() -> Result<(), String> {
    call("unwatch_projects", JsValue::NULL).await
}

/// Create (editing = None) or update a project; returns its document id
pub async fn save_project(editing: Option<&str>, title: &str, todos: &[TodoItem]) -> Result<String, String> {
    call_with("save_project", &SaveProjectArgs { editing, title, todos }).await
}

pub async fn delete_project(doc_id: &str) -> Result<(), String> {
    call_with("delete_project", &DocIdArgs { doc_id }).await
}

// ========================
// Project Page Commands
// ========================

pub async fn open_project(doc_id: &str) -> Result<DetailState, String> {
    call_with("open_project", &DocIdArgs { doc_id }).await
}

pub async fn close_project(doc_id: &str) -> Result<(), String> {
    call_with("close_project", &DocIdArgs { doc_id }).await
}

pub async fn add_project_todo(doc_id: &str, text: &str) -> Result<DetailState, String> {
    call_with("add_project_todo", &AddTodoArgs { doc_id, text }).await
}

pub async fn toggle_project_todo(doc_id: &str, index: usize) -> Result<DetailState, String> {
    call_with("toggle_project_todo", &ToggleTodoArgs { doc_id, index }).await
}
