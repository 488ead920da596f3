//! Project page
//!
//! Opens the project on the backend (mirror cache first), lets the user
//! add and tick items, and exports the checklist as a gist.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::commands;
use crate::components::TodoRow;
use crate::context::{AppContext, Route};
use crate::markdown::parse_markdown;
use crate::models::DetailState;

fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

#[component]
pub fn ProjectPage(doc_id: String) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let (state, set_state) = signal(DetailState::Fetching);
    let (new_todo, set_new_todo) = signal(String::new());
    let (preview, set_preview) = signal::<Option<String>>(None);
    let (exporting, set_exporting) = signal(false);
    let doc_id = StoredValue::new(doc_id);

    spawn_local(async move {
        let id = doc_id.get_value();
        match commands::open_project(&id).await {
            Ok(loaded) => set_state.set(loaded),
            Err(e) => {
                web_sys::console::error_1(&format!("[PROJECT] open {} failed: {}", id, e).into());
                set_state.set(DetailState::NotFound);
            }
        }
    });
    on_cleanup(move || {
        let id = doc_id.get_value();
        spawn_local(async move {
            let _ = commands::close_project(&id).await;
        });
    });

    let add_todo = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let text = new_todo.get_untracked();
        if text.trim().is_empty() {
            return;
        }
        set_new_todo.set(String::new());
        spawn_local(async move {
            match commands::add_project_todo(&doc_id.get_value(), &text).await {
                Ok(next) => set_state.set(next),
                Err(e) => alert(&e),
            }
        });
    };

    let on_toggle = Callback::new(move |index: usize| {
        spawn_local(async move {
            match commands::toggle_project_todo(&doc_id.get_value(), index).await {
                Ok(next) => set_state.set(next),
                Err(e) => web_sys::console::error_1(&format!("[PROJECT] toggle failed: {}", e).into()),
            }
        });
    });

    let export = move |_| {
        set_exporting.set(true);
        spawn_local(async move {
            match commands::export_project_gist(&doc_id.get_value()).await {
                Ok(url) => web_sys::console::log_1(&format!("[PROJECT] exported to {}", url).into()),
                Err(e) => alert(&e),
            }
            set_exporting.set(false);
        });
    };

    let toggle_preview = move |_| {
        if preview.with_untracked(|p| p.is_some()) {
            set_preview.set(None);
            return;
        }
        spawn_local(async move {
            match commands::preview_project_export(&doc_id.get_value()).await {
                Ok(markdown) => set_preview.set(Some(parse_markdown(&markdown))),
                Err(e) => alert(&e),
            }
        });
    };

    view! {
        <div class="project-page">
            <button class="back-btn" on:click=move |_| ctx.navigate(Route::Dashboard)>"← Dashboard"</button>
            {move || match state.get() {
                DetailState::Unloaded | DetailState::Fetching => view! {
                    <p class="loading">"Loading..."</p>
                }.into_any(),
                DetailState::NotFound => view! {
                    <p class="not-found">"Project not found"</p>
                }.into_any(),
                DetailState::Rendered(project) => view! {
                    <div class="project-detail">
                        <h1>{project.title.clone()}</h1>
                        <ul class="todo-list">
                            {project.todos.into_iter().enumerate().map(|(index, todo)| view! {
                                <TodoRow index=index todo=todo on_toggle=on_toggle />
                            }).collect_view()}
                        </ul>
                    </div>
                }.into_any(),
            }}

            <Show when=move || matches!(state.get(), DetailState::Rendered(_))>
                <form class="add-todo-form" on:submit=add_todo>
                    <input
                        type="text"
                        placeholder="New to-do"
                        prop:value=move || new_todo.get()
                        on:input=move |ev| set_new_todo.set(event_target_value(&ev))
                    />
                    <button type="submit">"Add"</button>
                </form>

                <div class="export-actions">
                    <button on:click=export disabled=exporting>"Export to Gist"</button>
                    <button on:click=toggle_preview>
                        {move || if preview.with(|p| p.is_some()) { "Hide preview" } else { "Preview" }}
                    </button>
                </div>
            </Show>
            {move || preview.get().map(|html| view! { <div class="export-preview" inner_html=html></div> })}
        </div>
    }
}
