use std::collections::HashMap;

use archinara_pm::app::{build_router, build_state};
use archinara_pm::config::Config;
use archinara_pm::services::auth::{Role, SessionGrant};
use archinara_pm::state::AppState;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};

pub const BEARER: &str = "dev-token";

pub fn test_config() -> Config {
    let vars: HashMap<&str, &str> = HashMap::from([
        ("DASHBOARD_TOKEN", BEARER),
        ("SESSION_SECRET", "integration-secret"),
        ("SESSION_LEEWAY_SECONDS", "0"),
    ]);
    Config::from_lookup(|key| vars.get(key).map(|v| v.to_string())).expect("config")
}

pub fn test_app() -> (Router, AppState) {
    let config = test_config();
    let state = build_state(&config).expect("state");
    (build_router(state.clone(), &config), state)
}

pub fn session_cookie(state: &AppState, role: Role) -> String {
    let token = state
        .sessions
        .issue(&SessionGrant::new("user-42", role))
        .expect("issue");
    format!("{}={}", state.sessions.cookie_name(), token)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).expect("request")
}

pub fn get_with(uri: &str, name: &str, value: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(name, value)
        .body(Body::empty())
        .expect("request")
}

pub fn location<B>(response: &Response<B>) -> Option<&str> {
    response
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
}

pub async fn read_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}
