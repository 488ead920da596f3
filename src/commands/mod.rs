//! Tauri Command Wrappers
//!
//! Frontend bindings to backend commands, organized by domain.

mod session;
mod project;
mod export;

use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_namespace = ["window", "__TAURI__", "core"])]
    async fn invoke(cmd: &str, args: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["window", "__TAURI__", "event"])]
    async fn listen(event: &str, handler: &Closure<dyn FnMut(JsValue)>) -> Result<JsValue, JsValue>;
}

// Re-export all public items
pub use session::*;
pub use project::*;
pub use export::*;

/// Backend events
pub const SESSION_CHANGED: &str = "session-changed";
pub const PROJECTS_CHANGED: &str = "projects-changed";

/// Rejections from commands are plain strings; anything else is stringified
fn js_error(value: JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

async fn call<T: DeserializeOwned>(cmd: &str, args: JsValue) -> Result<T, String> {
    let result = invoke(cmd, args).await.map_err(js_error)?;
    serde_wasm_bindgen::from_value(result).map_err(|e| e.to_string())
}

async fn call_with<A: Serialize, T: DeserializeOwned>(cmd: &str, args: &A) -> Result<T, String> {
    let js_args = serde_wasm_bindgen::to_value(args).map_err(|e| e.to_string())?;
    call(cmd, js_args).await
}

#[derive(Serialize)]
struct DocIdArgs<'a> {
    #[serde(rename = "docId")]
    doc_id: &'a str,
}

/// Subscribe to a backend event for the lifetime of the page
pub async fn listen_event<T, F>(event: &str, mut handler: F) -> Result<(), String>
where
    T: DeserializeOwned + 'static,
    F: FnMut(T) + 'static,
{
    let name = event.to_string();
    let closure = Closure::<dyn FnMut(JsValue)>::new(move |ev: JsValue| {
        let payload = js_sys::Reflect::get(&ev, &JsValue::from_str("payload")).unwrap_or(JsValue::NULL);
        match serde_wasm_bindgen::from_value::<T>(payload) {
            Ok(value) => handler(value),
            Err(e) => web_sys::console::warn_1(&format!("[EVENT] bad {} payload: {}", name, e).into()),
        }
    });
    listen(event, &closure).await.map_err(js_error)?;
    closure.forget();
    Ok(())
}
