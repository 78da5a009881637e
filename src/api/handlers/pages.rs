/*
 * Responsibility
 * - 認証なしで到達できるページ (landing / login / signup / password recovery / forbidden)
 * - logout (session cookie の削除)
 *
 * 画面描画はフロント側の責務。ここはページ識別子と必要なパラメータだけ返す
 */
use axum::{
    Json,
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::services::access::gate::LOGIN_PATH;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    #[serde(rename = "callbackUrl")]
    pub callback_url: Option<String>,
}

pub async fn landing() -> Json<Value> {
    Json(json!({"page": "landing"}))
}

/// Echoes `callbackUrl` only when it is a same-site path.
pub async fn login(Query(query): Query<LoginQuery>) -> Json<Value> {
    let callback_url = query.callback_url.filter(|url| is_local_path(url));
    Json(json!({"page": "login", "callbackUrl": callback_url}))
}

pub async fn signup() -> Json<Value> {
    Json(json!({"page": "signup"}))
}

pub async fn forgot_password() -> Json<Value> {
    Json(json!({"page": "forgot-password"}))
}

pub async fn reset_password() -> Json<Value> {
    Json(json!({"page": "reset-password"}))
}

pub async fn forbidden() -> Json<Value> {
    Json(json!({"page": "forbidden"}))
}

pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::SET_COOKIE, state.sessions.clear_cookie())],
        Redirect::to(LOGIN_PATH),
    )
}

// `//host` and `/\host` are protocol-relative in browsers.
fn is_local_path(url: &str) -> bool {
    url.starts_with('/') && !url.starts_with("//") && !url.starts_with("/\\")
}
