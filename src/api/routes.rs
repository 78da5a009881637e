/*
 * Responsibility
 * - URL 構造の定義 (/health, /pm/:path*, /work/:path*, /auth/forbidden, /auth/logout)
 * - gate は app.rs で Router 全体に掛ける (ここでは route_layer を使わない)
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::api::handlers::{
    areas::{not_found, pm_page, work_page},
    health::health,
    pages::{forbidden, forgot_password, landing, login, logout, reset_password, signup},
};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/pm", get(landing))
        .route("/pm/login", get(login))
        .route("/pm/signup", get(signup))
        .route("/pm/forgot-password", get(forgot_password))
        .route("/pm/reset-password", get(reset_password))
        .route("/pm/{*path}", get(pm_page))
        .route("/work", get(work_page))
        .route("/work/{*path}", get(work_page))
        .route("/auth/forbidden", get(forbidden))
        .route("/auth/logout", post(logout))
        .fallback(not_found)
}
