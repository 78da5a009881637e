/// Factory: build `SessionService` from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::session::{SessionService, SessionSettings};

pub fn build_session_service(config: &Config) -> Arc<SessionService> {
    let settings = SessionSettings {
        secret: config.session_secret.clone(),
        ttl_seconds: config.session_ttl_seconds,
        leeway_seconds: config.session_leeway_seconds,
        secure_cookie: config.app_env.is_production(),
    };

    Arc::new(SessionService::new(&settings))
}
