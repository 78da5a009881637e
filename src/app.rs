/*
 * Responsibility
 * - Config 読み込み → 依存生成 (SessionService / AccessGate) → Router 組み立て
 * - Middleware の適用順: http (request id / trace) → security headers → CORS → access gate → routes
 * - axum::serve() で起動
 */
use std::{panic, process, sync::Arc};

use anyhow::Result;
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::config::Config;
use crate::error::AppError;
use crate::middleware;
use crate::services::access::{AccessGate, GateConfig};
use crate::services::auth::{BearerSecret, SessionVerifier, build_session_service};
use crate::state::AppState;

fn init_tracing() {
    // RUST_LOG=info,archinara_pm=debug,tower_http=debug で gate の判定も出る
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // development: fail fast / production: keep serving
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;
    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting archinara-pm in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config)?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Everything built here is read-only for the life of the process.
pub fn build_state(config: &Config) -> Result<AppState, AppError> {
    let sessions = build_session_service(config);
    let verifier: Arc<dyn SessionVerifier> = sessions.clone();

    let gate_config = GateConfig::standard(BearerSecret::new(&config.dashboard_token))?;
    let gate = Arc::new(AccessGate::new(gate_config, verifier));

    Ok(AppState::new(gate, sessions))
}

pub fn build_router(state: AppState, config: &Config) -> Router {
    let router = middleware::auth::access::apply(api::routes(), state.clone()).with_state(state);
    let router = middleware::cors::apply(router, config);
    let router = middleware::security_headers::apply(router);
    middleware::http::apply(router)
}
