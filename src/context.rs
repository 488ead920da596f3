//! Application Context
//!
//! Routing shared via Leptos Context API.

use leptos::prelude::*;
use wasm_bindgen::JsValue;

/// Pages of the app, mapped to history paths
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/`
    SignIn,
    /// `/dashboard`
    Dashboard,
    /// `/project/:id`
    Project(String),
}

impl Route {
    /// Unknown paths land on the sign-in page
    pub fn parse(path: &str) -> Self {
        let path = path.trim_end_matches('/');
        if path == "/dashboard" {
            return Route::Dashboard;
        }
        match path.strip_prefix("/project/") {
            Some(id) if !id.is_empty() && !id.contains('/') => Route::Project(id.to_string()),
            _ => Route::SignIn,
        }
    }

    /// Page actually shown: signed-in pages fall back to sign-in without
    /// a session
    pub fn gated(self, signed_in: bool) -> Route {
        match self {
            Route::Dashboard | Route::Project(_) if !signed_in => Route::SignIn,
            route => route,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::SignIn => "/".to_string(),
            Route::Dashboard => "/dashboard".to_string(),
            Route::Project(id) => format!("/project/{}", id),
        }
    }
}

/// App-wide signals provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    /// Current page - read
    pub route: ReadSignal<Route>,
    /// Current page - write
    set_route: WriteSignal<Route>,
}

impl AppContext {
    pub fn new(route: (ReadSignal<Route>, WriteSignal<Route>)) -> Self {
        Self {
            route: route.0,
            set_route: route.1,
        }
    }

    /// Route the window was opened on
    pub fn initial_route() -> Route {
        web_sys::window()
            .and_then(|w| w.location().pathname().ok())
            .map(|p| Route::parse(&p))
            .unwrap_or(Route::SignIn)
    }

    /// Switch page and push it onto the history stack
    pub fn navigate(&self, route: Route) {
        if let Some(history) = web_sys::window().and_then(|w| w.history().ok()) {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(&route.path()));
        }
        self.set_route.set(route);
    }
}
