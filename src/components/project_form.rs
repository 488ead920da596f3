//! Create / edit project modal
//!
//! Title plus a growing list of to-do fields. Blank titles are rejected
//! before anything is sent; blank to-do fields are dropped by the backend.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::commands;
use crate::models::{ProjectCard, TodoItem};

/// Editing session: what the form holds between keystrokes
#[derive(Debug, Clone, PartialEq)]
pub struct FormDraft {
    /// Document id being edited, `None` when creating
    pub editing: Option<String>,
    pub title: String,
    pub todos: Vec<TodoItem>,
    pub title_error: bool,
}

impl Default for FormDraft {
    /// Empty title, one blank to-do field
    fn default() -> Self {
        Self {
            editing: None,
            title: String::new(),
            todos: vec![TodoItem::default()],
            title_error: false,
        }
    }
}

impl FormDraft {
    /// Pre-fill from an existing project (one blank field if it has none)
    pub fn edit(card: &ProjectCard) -> Self {
        let todos = if card.todos.is_empty() {
            vec![TodoItem::default()]
        } else {
            card.todos.clone()
        };
        Self {
            editing: Some(card.doc_id.clone()),
            title: card.title.clone(),
            todos,
            title_error: false,
        }
    }

    /// Editing the title clears a previous title error
    pub fn set_title(&mut self, title: String) {
        self.title = title;
        self.title_error = false;
    }

    pub fn add_todo_field(&mut self) {
        self.todos.push(TodoItem::default());
    }

    pub fn set_todo_text(&mut self, index: usize, text: String) {
        if let Some(item) = self.todos.get_mut(index) {
            item.text = text;
        }
    }

    /// Flag a blank title; the rest of the form is left as typed
    pub fn validate(&mut self) -> bool {
        self.title_error = self.title.trim().is_empty();
        !self.title_error
    }
}

/// Form signals shared between the dashboard and the modal
#[derive(Clone, Copy)]
pub struct ProjectFormState {
    pub open: RwSignal<bool>,
    pub draft: RwSignal<FormDraft>,
    /// Error returned by `save_project`
    pub error: RwSignal<Option<String>>,
}

impl ProjectFormState {
    pub fn new() -> Self {
        Self {
            open: RwSignal::new(false),
            draft: RwSignal::new(FormDraft::default()),
            error: RwSignal::new(None),
        }
    }

    pub fn open_new(&self) {
        self.draft.set(FormDraft::default());
        self.error.set(None);
        self.open.set(true);
    }

    pub fn open_edit(&self, card: &ProjectCard) {
        self.draft.set(FormDraft::edit(card));
        self.error.set(None);
        self.open.set(true);
    }

    /// Close and reset to the empty "new project" form
    pub fn close(&self) {
        self.open.set(false);
        self.draft.set(FormDraft::default());
        self.error.set(None);
    }
}

#[component]
pub fn ProjectFormModal(form: ProjectFormState) -> impl IntoView {
    let (saving, set_saving) = signal(false);
    // Rebuild the field list only when a field is added or the form reloads
    let field_count = Memo::new(move |_| form.draft.with(|d| d.todos.len()));

    let submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let mut valid = false;
        form.draft.update(|d| valid = d.validate());
        if !valid {
            return;
        }

        let draft = form.draft.get_untracked();
        set_saving.set(true);
        spawn_local(async move {
            match commands::save_project(draft.editing.as_deref(), &draft.title, &draft.todos).await {
                Ok(doc_id) => {
                    web_sys::console::log_1(&format!("[FORM] saved {}", doc_id).into());
                    form.close();
                }
                Err(e) => form.error.set(Some(e)),
            }
            set_saving.set(false);
        });
    };

    let heading = move || if form.draft.with(|d| d.editing.is_some()) { "Edit Project" } else { "New Project" };
    let title_error = move || form.draft.with(|d| d.title_error);

    view! {
        <Show when=move || form.open.get()>
            <div class="modal-backdrop" on:click=move |_| form.close()>
                <form class="modal project-form" on:submit=submit on:click=|ev| ev.stop_propagation()>
                    <h2>{heading}</h2>
                    <input
                        type="text"
                        class="project-title-input"
                        class:invalid=title_error
                        placeholder="Project title"
                        prop:value=move || form.draft.with(|d| d.title.clone())
                        on:input=move |ev| form.draft.update(|d| d.set_title(event_target_value(&ev)))
                    />
                    <Show when=title_error>
                        <p class="field-error">"Title is required"</p>
                    </Show>

                    <div class="todo-fields">
                        {move || (0..field_count.get()).map(|index| {
                            let text = form.draft.with_untracked(|d| d.todos[index].text.clone());
                            view! {
                                <input
                                    type="text"
                                    class="todo-field"
                                    placeholder="To-do item"
                                    prop:value=text
                                    on:input=move |ev| {
                                        let text = event_target_value(&ev);
                                        form.draft.update_untracked(|d| d.set_todo_text(index, text));
                                    }
                                />
                            }
                        }).collect_view()}
                        <button
                            type="button"
                            class="add-field-btn"
                            on:click=move |_| form.draft.update(|d| d.add_todo_field())
                        >
                            "+"
                        </button>
                    </div>

                    {move || form.error.get().map(|e| view! { <p class="form-error">{e}</p> })}

                    <div class="modal-actions">
                        <button type="button" on:click=move |_| form.close()>"Cancel"</button>
                        <button type="submit" disabled=saving>"Save"</button>
                    </div>
                </form>
            </div>
        </Show>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(todos: Vec<TodoItem>) -> ProjectCard {
        ProjectCard {
            doc_id: "doc1".to_string(),
            id: "p1".to_string(),
            title: "Trip".to_string(),
            user: "alice".to_string(),
            todos,
        }
    }

    #[test]
    fn test_new_form_has_one_blank_field() {
        let draft = FormDraft::default();
        assert!(draft.editing.is_none());
        assert!(draft.title.is_empty());
        assert_eq!(draft.todos, vec![TodoItem::default()]);
        assert!(!draft.title_error);
    }

    #[test]
    fn test_blank_title_is_flagged_and_form_kept() {
        let mut draft = FormDraft::default();
        draft.set_title("   ".to_string());
        draft.set_todo_text(0, "kept".to_string());

        assert!(!draft.validate());
        assert!(draft.title_error);
        assert_eq!(draft.todos[0].text, "kept");

        draft.set_title("Fixed".to_string());
        assert!(!draft.title_error);
        assert!(draft.validate());
    }

    #[test]
    fn test_edit_points_at_project() {
        let draft = FormDraft::edit(&card(vec![TodoItem { text: "pack".into(), completed: true }]));
        assert_eq!(draft.editing.as_deref(), Some("doc1"));
        assert_eq!(draft.title, "Trip");
        assert!(draft.todos[0].completed);
    }

    #[test]
    fn test_edit_without_items_gets_blank_field() {
        let draft = FormDraft::edit(&card(Vec::new()));
        assert_eq!(draft.todos, vec![TodoItem::default()]);
    }

    #[test]
    fn test_fields_grow_and_out_of_range_text_is_ignored() {
        let mut draft = FormDraft::default();
        draft.add_todo_field();
        draft.set_todo_text(1, "second".to_string());
        draft.set_todo_text(7, "nowhere".to_string());
        assert_eq!(draft.todos.len(), 2);
        assert_eq!(draft.todos[1].text, "second");
    }
}
