//! Project Cards Frontend App
//!
//! Root component: session gate, routing and backend event wiring.

use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::prelude::*;

use crate::commands;
use crate::context::{AppContext, Route};
use crate::models::{ProjectsSnapshot, Session};
use crate::store::{store_apply_projects, store_set_session, AppState, AppStateStoreFields, AppStore};
use crate::components::{Dashboard, LoginView, ProjectPage};

#[component]
pub fn App() -> impl IntoView {
    let store: AppStore = reactive_stores::Store::new(AppState::default());
    provide_context(store);

    let (route, set_route) = signal(AppContext::initial_route());
    let ctx = AppContext::new((route, set_route));
    provide_context(ctx);

    // Follow browser back/forward
    if let Some(window) = web_sys::window() {
        let on_popstate = Closure::<dyn FnMut(web_sys::Event)>::new(move |_| {
            set_route.set(AppContext::initial_route());
        });
        let _ = window.add_event_listener_with_callback("popstate", on_popstate.as_ref().unchecked_ref());
        on_popstate.forget();
    }

    // Listen before restoring the session: a restored session mounts the
    // dashboard, whose watch emits right away
    spawn_local(async move {
        let session_listener = commands::listen_event(commands::SESSION_CHANGED, move |session: Option<Session>| {
            let signed_out = session.is_none();
            store_set_session(&store, session);
            if signed_out {
                ctx.navigate(Route::SignIn);
            }
        });
        if let Err(e) = session_listener.await {
            web_sys::console::error_1(&format!("[APP] listen {} failed: {}", commands::SESSION_CHANGED, e).into());
        }

        let projects_listener = commands::listen_event(commands::PROJECTS_CHANGED, move |snapshot: ProjectsSnapshot| {
            web_sys::console::log_1(&format!("[APP] {} projects (#{})", snapshot.projects.len(), snapshot.seq).into());
            store_apply_projects(&store, snapshot);
        });
        if let Err(e) = projects_listener.await {
            web_sys::console::error_1(&format!("[APP] listen {} failed: {}", commands::PROJECTS_CHANGED, e).into());
        }

        match commands::current_session().await {
            Ok(session) => store_set_session(&store, session),
            Err(e) => web_sys::console::error_1(&format!("[APP] current_session failed: {}", e).into()),
        }
    });

    let signed_in = move || store.session().with(|s| s.is_some());

    view! {
        <div class="app-layout">
            {move || match route.get().gated(signed_in()) {
                Route::SignIn => view! { <LoginView /> }.into_any(),
                Route::Dashboard => view! { <Dashboard /> }.into_any(),
                Route::Project(doc_id) => view! { <ProjectPage doc_id=doc_id /> }.into_any(),
            }}
        </div>
    }
}
