//! Session Commands
//!
//! Frontend bindings for sign-in and sign-out.

use wasm_bindgen::prelude::*;
use crate::models::Session;
use super::call;

pub async fn sign_in() -> Result<Session, String> {
    call("sign_in", JsValue::NULL).await
}

pub async fn sign_out() -> Result<(), String> {
    call("sign_out", JsValue::NULL).await
}

pub async fn current_session() -> Result<Option<Session>, String> {
    call("current_session", JsValue::NULL).await
}
