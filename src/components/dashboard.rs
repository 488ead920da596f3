//! Dashboard
//!
//! Live grid of the signed-in user's projects. Watches `projects-changed`
//! while mounted.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::commands;
use crate::components::{ProjectCardView, ProjectFormModal, ProjectFormState};
use crate::context::{AppContext, Route};
use crate::models::ProjectCard;
use crate::store::{store_apply_projects, store_set_session, use_app_store, AppStateStoreFields};

#[component]
pub fn Dashboard() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let store = use_app_store();
    let form = ProjectFormState::new();

    spawn_local(async move {
        match commands::watch_projects().await {
            Ok(snapshot) => store_apply_projects(&store, snapshot),
            Err(e) => web_sys::console::error_1(&format!("[DASHBOARD] watch failed: {}", e).into()),
        }
    });
    on_cleanup(|| {
        spawn_local(async {
            let _ = commands::unwatch_projects().await;
        });
    });

    let on_edit = Callback::new(move |card: ProjectCard| form.open_edit(&card));
    let on_delete = Callback::new(move |doc_id: String| {
        spawn_local(async move {
            if let Err(e) = commands::delete_project(&doc_id).await {
                web_sys::console::error_1(&format!("[DASHBOARD] delete {} failed: {}", doc_id, e).into());
            }
        });
    });

    let sign_out = move |_| {
        spawn_local(async move {
            match commands::sign_out().await {
                Ok(()) => {
                    store_set_session(&store, None);
                    ctx.navigate(Route::SignIn);
                }
                Err(e) => web_sys::console::error_1(&format!("[DASHBOARD] sign out failed: {}", e).into()),
            }
        });
    };

    let user_label = move || {
        store
            .session()
            .with(|s| s.as_ref().map(|s| s.label().to_string()))
            .unwrap_or_default()
    };

    view! {
        <div class="dashboard">
            <header class="dashboard-header">
                <h1>"Dashboard"</h1>
                <span class="dashboard-user">{user_label}</span>
                <button class="add-project-btn" on:click=move |_| form.open_new()>"Add Project"</button>
                <button class="sign-out-btn" on:click=sign_out>"Sign out"</button>
            </header>

            <div class="project-grid">
                <For
                    each=move || store.feed().with(|f| f.projects.clone())
                    key=|card| (card.doc_id.clone(), card.title.clone(), card.todos.clone())
                    children=move |card| view! {
                        <ProjectCardView card=card on_edit=on_edit on_delete=on_delete />
                    }
                />
            </div>
            <Show when=move || store.feed().with(|f| f.projects.is_empty())>
                <p class="empty-state">"No projects yet"</p>
            </Show>

            <ProjectFormModal form=form />
        </div>
    }
}
