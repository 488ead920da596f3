//! Dashboard card
//!
//! Shows the title and every to-do item. Clicking the card opens the
//! project page; the menu offers edit and delete.

use leptos::prelude::*;

use crate::context::{AppContext, Route};
use crate::models::ProjectCard;

#[component]
pub fn ProjectCardView(
    card: ProjectCard,
    #[prop(into)] on_edit: Callback<ProjectCard>,
    #[prop(into)] on_delete: Callback<String>,
) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let (menu_open, set_menu_open) = signal(false);

    let open_id = card.doc_id.clone();
    let delete_id = card.doc_id.clone();
    let edit_card = card.clone();
    let summary = format!("{} / {}", card.completed_count(), card.todos.len());

    view! {
        <div class="project-card" on:click=move |_| ctx.navigate(Route::Project(open_id.clone()))>
            <div class="project-card-header">
                <h3>{card.title.clone()}</h3>
                <button
                    class="card-menu-btn"
                    on:click=move |ev| {
                        ev.stop_propagation();
                        set_menu_open.update(|v| *v = !*v);
                    }
                >
                    "•••"
                </button>
            </div>
            <Show when=move || menu_open.get()>
                <div class="card-menu" on:click=|ev| ev.stop_propagation()>
                    <button on:click={
                        let edit_card = edit_card.clone();
                        move |_| {
                            set_menu_open.set(false);
                            on_edit.run(edit_card.clone());
                        }
                    }>"Edit"</button>
                    <button class="danger" on:click={
                        let delete_id = delete_id.clone();
                        move |_| {
                            set_menu_open.set(false);
                            on_delete.run(delete_id.clone());
                        }
                    }>"Delete"</button>
                </div>
            </Show>
            <ul class="project-card-todos">
                {card.todos.iter().map(|todo| view! {
                    <li class:completed=todo.completed>{"• "}{todo.text.clone()}</li>
                }).collect_view()}
            </ul>
            <div class="project-card-summary">{summary}</div>
        </div>
    }
}
