use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request},
    response::Response,
    Router,
};
use chrono::Duration;
use serde_json::Value;

use crate::{
    api::MockBackendApi,
    app::router,
    config::Config,
    session::{Role, SessionPayload, SessionStore},
    state::AppState,
    utils::cookies::SESSION_COOKIE_NAME,
};

pub const TEST_SECRET: &str = "test-session-secret-with-at-least-32-bytes";

pub fn test_config() -> Config {
    Config::from_lookup(|name| match name {
        "SESSION_SECRET" => Some(TEST_SECRET.to_string()),
        _ => None,
    })
    .expect("test config")
}

pub fn test_app(api: MockBackendApi) -> (Router, SessionStore) {
    let state = AppState::new(test_config(), Arc::new(api));
    let store = state.sessions.clone();
    (router(state), store)
}

/// `Cookie` header value holding a fresh session for the given user.
pub fn session_cookie(store: &SessionStore, user_id: &str, username: &str, role: Role) -> String {
    let payload = SessionPayload::new(user_id.into(), username.into(), role, Duration::days(7));
    let token = store.codec().encrypt(&payload).expect("encrypt session");
    format!("{}={}", SESSION_COOKIE_NAME, token)
}

pub fn request(method: &str, uri: &str, cookie: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    }
}

pub async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}
