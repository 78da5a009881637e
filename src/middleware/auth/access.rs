//! Access gate → axum middleware.
//!
//! Runs `AccessGate::decide` once per request before routing and turns the
//! decision into either a pass-through or a `307` redirect:
//!
//! - allow: the `Admission` goes into request extensions for the `Viewer` extractor
//! - login required: `Location: /pm/login?callbackUrl=<path>`
//! - role not allowed: `Location: /auth/forbidden`
//!
//! Denials are always redirects, never JSON 401/403, because this gate sits
//! in front of browser navigation.

use axum::{
    Router,
    extract::{Request, State},
    middleware::{self, Next},
    response::{IntoResponse, Redirect, Response},
};

use crate::services::access::GateDecision;
use crate::state::AppState;

/// Wraps the whole router so unknown paths under gated areas are covered too.
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(State(state): State<AppState>, req: Request, next: Next) -> Response {
    // Only the head is borrowed across the verifier call; the body stays untouched.
    let (mut parts, body) = req.into_parts();
    let decision = state
        .gate
        .decide(&parts.method, parts.uri.path(), &parts.headers)
        .await;

    tracing::debug!(
        method = %parts.method,
        path = %parts.uri.path(),
        outcome = decision.outcome(),
        "access gate decision"
    );

    match decision {
        GateDecision::Allow(admission) => {
            parts.extensions.insert(admission);
            next.run(Request::from_parts(parts, body)).await
        }
        GateDecision::RedirectLogin { callback_url } => {
            Redirect::temporary(&state.gate.login_location(&callback_url)).into_response()
        }
        GateDecision::RedirectForbidden => {
            Redirect::temporary(state.gate.forbidden_location()).into_response()
        }
    }
}
