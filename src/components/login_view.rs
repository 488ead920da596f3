//! Sign-in Page

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::commands;
use crate::context::{AppContext, Route};
use crate::store::{store_set_session, use_app_store, AppStateStoreFields};

#[component]
pub fn LoginView() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let store = use_app_store();
    let (error, set_error) = signal::<Option<String>>(None);
    let (pending, set_pending) = signal(false);

    let sign_in = move |_| {
        set_pending.set(true);
        set_error.set(None);
        spawn_local(async move {
            match commands::sign_in().await {
                Ok(session) => {
                    store_set_session(&store, Some(session));
                    ctx.navigate(Route::Dashboard);
                }
                Err(e) => set_error.set(Some(e)),
            }
            set_pending.set(false);
        });
    };

    let current = move || store.session().get();

    view! {
        <div class="login-view">
            <h1>"Project Cards"</h1>
            {move || current().map(|session| view! {
                <p class="login-current">
                    "Signed in as " <strong>{session.label().to_string()}</strong>
                    <button class="link-btn" on:click=move |_| ctx.navigate(Route::Dashboard)>
                        "Go to dashboard"
                    </button>
                </p>
            })}
            <button class="login-btn" disabled=pending on:click=sign_in>
                "Sign in"
            </button>
            {move || error.get().map(|e| view! { <p class="login-error">{e}</p> })}
        </div>
    }
}
