//! Request access gate.
//!
//! Decides, per request, whether a gated path is reachable. Evaluation order
//! is fixed and short-circuits on the first hit:
//!
//! 1. `OPTIONS` preflight → allow
//! 2. public page (or a rule that needs no session) → allow
//! 3. `Authorization: Bearer <DASHBOARD_TOKEN>` → allow, role checks skipped
//! 4. no valid session → redirect to login with `callbackUrl`
//! 5. role not in the rule's allow-list → redirect to forbidden
//! 6. otherwise → allow
//!
//! The gate holds only immutable configuration and never fails: every input
//! produces one of the three decisions.

use std::sync::Arc;

use axum::http::{HeaderMap, Method};

use crate::services::access::path::{PatternError, PublicPage};
use crate::services::access::table::RouteTable;
use crate::services::auth::bearer::BearerSecret;
use crate::services::auth::session::{SessionClaims, SessionVerifier};

pub const LOGIN_PATH: &str = "/pm/login";
pub const FORBIDDEN_PATH: &str = "/auth/forbidden";

/// Login, signup and password recovery must stay reachable while logged out.
pub fn standard_public_pages() -> Vec<PublicPage> {
    vec![
        PublicPage::exact("/pm"),
        PublicPage::subtree("/pm/login"),
        PublicPage::subtree("/pm/signup"),
        PublicPage::subtree("/pm/forgot-password"),
        PublicPage::subtree("/pm/reset-password"),
    ]
}

/// Everything the gate needs, built once at startup.
#[derive(Debug, Clone)]
pub struct GateConfig {
    pub bearer: BearerSecret,
    pub public_pages: Vec<PublicPage>,
    pub routes: RouteTable,
    pub login_path: String,
    pub forbidden_path: String,
}

impl GateConfig {
    pub fn standard(bearer: BearerSecret) -> Result<Self, PatternError> {
        Ok(Self {
            bearer,
            public_pages: standard_public_pages(),
            routes: RouteTable::standard()?,
            login_path: LOGIN_PATH.to_string(),
            forbidden_path: FORBIDDEN_PATH.to_string(),
        })
    }

    pub fn is_public(&self, path: &str) -> bool {
        self.public_pages.iter().any(|page| page.covers(path))
    }
}

/// Why a request was let through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// Path matches no gated pattern.
    Unguarded,
    Preflight,
    PublicPage,
    /// Static bearer secret; no session, no role check.
    ServiceToken,
    Session(SessionClaims),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Allow(Admission),
    RedirectLogin { callback_url: String },
    RedirectForbidden,
}

impl GateDecision {
    pub fn is_allow(&self) -> bool {
        matches!(self, Self::Allow(_))
    }

    pub fn outcome(&self) -> &'static str {
        match self {
            Self::Allow(Admission::Unguarded) => "allow_unguarded",
            Self::Allow(Admission::Preflight) => "allow_preflight",
            Self::Allow(Admission::PublicPage) => "allow_public",
            Self::Allow(Admission::ServiceToken) => "allow_service_token",
            Self::Allow(Admission::Session(_)) => "allow_session",
            Self::RedirectLogin { .. } => "redirect_login",
            Self::RedirectForbidden => "redirect_forbidden",
        }
    }
}

pub struct AccessGate {
    config: GateConfig,
    sessions: Arc<dyn SessionVerifier>,
}

impl std::fmt::Debug for AccessGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessGate")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl AccessGate {
    pub fn new(config: GateConfig, sessions: Arc<dyn SessionVerifier>) -> Self {
        Self { config, sessions }
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    pub async fn decide(&self, method: &Method, path: &str, headers: &HeaderMap) -> GateDecision {
        let Some(rule) = self.config.routes.classify(path) else {
            return GateDecision::Allow(Admission::Unguarded);
        };

        if method == Method::OPTIONS {
            return GateDecision::Allow(Admission::Preflight);
        }

        if self.config.is_public(path) || !rule.access.requires_session() {
            return GateDecision::Allow(Admission::PublicPage);
        }

        if self.config.bearer.matches_headers(headers) {
            return GateDecision::Allow(Admission::ServiceToken);
        }

        let Some(claims) = self.sessions.verify(headers).await else {
            return GateDecision::RedirectLogin {
                callback_url: path.to_string(),
            };
        };

        if !rule.access.permits(claims.role()) {
            return GateDecision::RedirectForbidden;
        }

        GateDecision::Allow(Admission::Session(claims))
    }

    /// `Location` for a login redirect, e.g. `/pm/login?callbackUrl=/pm/dashboard`.
    pub fn login_location(&self, callback_url: &str) -> String {
        format!(
            "{}?callbackUrl={}",
            self.config.login_path,
            encode_callback(callback_url)
        )
    }

    pub fn forbidden_location(&self) -> &str {
        &self.config.forbidden_path
    }
}

// Query-encode each segment but keep `/` literal.
fn encode_callback(path: &str) -> String {
    path.split('/')
        .map(|segment| url::form_urlencoded::byte_serialize(segment.as_bytes()).collect::<String>())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use axum::http::{HeaderValue, header};

    use super::*;
    use crate::services::auth::role::Role;

    struct StubVerifier {
        claims: Option<SessionClaims>,
        calls: AtomicUsize,
    }

    impl StubVerifier {
        fn new(claims: Option<SessionClaims>) -> Arc<Self> {
            Arc::new(Self {
                claims,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SessionVerifier for StubVerifier {
        async fn verify(&self, _headers: &HeaderMap) -> Option<SessionClaims> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.claims.clone()
        }
    }

    fn claims(role: &str) -> SessionClaims {
        SessionClaims {
            subject: "user-1".to_string(),
            role: role.to_string(),
            name: None,
            email: None,
            expires_at: i64::MAX,
        }
    }

    fn gate(verifier: Arc<StubVerifier>) -> AccessGate {
        let config = GateConfig::standard(BearerSecret::new("dev-token")).unwrap();
        AccessGate::new(config, verifier)
    }

    fn bearer(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        );
        headers
    }

    #[tokio::test]
    async fn anonymous_request_is_sent_to_login() {
        let gate = gate(StubVerifier::new(None));
        let decision = gate
            .decide(&Method::GET, "/pm/dashboard", &HeaderMap::new())
            .await;
        assert_eq!(
            decision,
            GateDecision::RedirectLogin {
                callback_url: "/pm/dashboard".to_string()
            }
        );
        assert_eq!(
            gate.login_location("/pm/dashboard"),
            "/pm/login?callbackUrl=/pm/dashboard"
        );
    }

    #[tokio::test]
    async fn bearer_secret_skips_session_and_roles() {
        let verifier = StubVerifier::new(Some(claims("USER")));
        let gate = gate(verifier.clone());
        let decision = gate
            .decide(&Method::GET, "/pm/dashboard", &bearer("dev-token"))
            .await;
        assert_eq!(decision, GateDecision::Allow(Admission::ServiceToken));
        assert_eq!(verifier.calls(), 0);
    }

    #[tokio::test]
    async fn user_role_is_forbidden_on_pm() {
        let gate = gate(StubVerifier::new(Some(claims("USER"))));
        let decision = gate
            .decide(&Method::GET, "/pm/dashboard", &HeaderMap::new())
            .await;
        assert_eq!(decision, GateDecision::RedirectForbidden);
    }

    #[tokio::test]
    async fn staff_roles_are_allowed_on_pm() {
        for role in [Role::Admin, Role::Manager, Role::Architect] {
            let gate = gate(StubVerifier::new(Some(claims(role.as_str()))));
            let decision = gate
                .decide(&Method::GET, "/pm/dashboard", &HeaderMap::new())
                .await;
            assert_eq!(
                decision,
                GateDecision::Allow(Admission::Session(claims(role.as_str())))
            );
        }
    }

    #[tokio::test]
    async fn login_page_is_public_without_credentials() {
        let verifier = StubVerifier::new(None);
        let gate = gate(verifier.clone());
        for path in [
            "/pm",
            "/pm/login",
            "/pm/login/sub",
            "/pm/signup",
            "/pm/forgot-password",
            "/pm/reset-password/abc",
        ] {
            let decision = gate.decide(&Method::GET, path, &HeaderMap::new()).await;
            assert_eq!(decision, GateDecision::Allow(Admission::PublicPage), "{path}");
        }
        assert_eq!(verifier.calls(), 0);
    }

    #[tokio::test]
    async fn lookalike_of_public_page_is_gated() {
        let gate = gate(StubVerifier::new(None));
        for path in ["/pm/login-something", "/pm/loginX", "/pm//login"] {
            let decision = gate.decide(&Method::GET, path, &HeaderMap::new()).await;
            assert_eq!(
                decision,
                GateDecision::RedirectLogin {
                    callback_url: path.to_string()
                }
            );
        }
    }

    #[tokio::test]
    async fn work_area_accepts_any_authenticated_role() {
        for role in ["USER", "ADMIN", "SOMETHING_NEW"] {
            let gate = gate(StubVerifier::new(Some(claims(role))));
            let decision = gate
                .decide(&Method::GET, "/work/tasks", &HeaderMap::new())
                .await;
            assert!(decision.is_allow(), "{role}");
        }
    }

    #[tokio::test]
    async fn work_area_still_requires_a_session() {
        let gate = gate(StubVerifier::new(None));
        let decision = gate
            .decide(&Method::GET, "/work/tasks", &HeaderMap::new())
            .await;
        assert_eq!(decision.outcome(), "redirect_login");
    }

    #[tokio::test]
    async fn unknown_role_is_forbidden_on_pm() {
        let gate = gate(StubVerifier::new(Some(claims("admin"))));
        let decision = gate
            .decide(&Method::GET, "/pm/projects", &HeaderMap::new())
            .await;
        assert_eq!(decision, GateDecision::RedirectForbidden);
    }

    #[tokio::test]
    async fn options_always_passes() {
        let verifier = StubVerifier::new(None);
        let gate = gate(verifier.clone());
        for path in ["/pm/dashboard", "/work/tasks", "/pm/login"] {
            let decision = gate.decide(&Method::OPTIONS, path, &HeaderMap::new()).await;
            assert_eq!(decision, GateDecision::Allow(Admission::Preflight));
        }
        assert_eq!(verifier.calls(), 0);
    }

    #[tokio::test]
    async fn public_page_wins_over_bad_credentials() {
        let gate = gate(StubVerifier::new(Some(claims("USER"))));
        let decision = gate
            .decide(&Method::POST, "/pm/login", &bearer("wrong"))
            .await;
        assert_eq!(decision, GateDecision::Allow(Admission::PublicPage));
    }

    #[tokio::test]
    async fn malformed_bearer_falls_through_to_session() {
        let verifier = StubVerifier::new(None);
        let gate = gate(verifier.clone());
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("bearer dev-token"));
        let decision = gate.decide(&Method::GET, "/pm/dashboard", &headers).await;
        assert_eq!(decision.outcome(), "redirect_login");

        let decision = gate
            .decide(&Method::GET, "/pm/dashboard", &bearer("dev-token-2"))
            .await;
        assert_eq!(decision.outcome(), "redirect_login");
        assert_eq!(verifier.calls(), 2);
    }

    #[tokio::test]
    async fn unguarded_paths_skip_every_check() {
        let verifier = StubVerifier::new(None);
        let gate = gate(verifier.clone());
        for path in ["/", "/health", "/auth/forbidden", "/pmx"] {
            let decision = gate.decide(&Method::GET, path, &HeaderMap::new()).await;
            assert_eq!(decision, GateDecision::Allow(Admission::Unguarded));
        }
        assert_eq!(verifier.calls(), 0);
    }

    #[tokio::test]
    async fn same_input_gives_same_decision() {
        let gate = gate(StubVerifier::new(Some(claims("USER"))));
        let first = gate
            .decide(&Method::GET, "/pm/tasks", &HeaderMap::new())
            .await;
        let second = gate
            .decide(&Method::GET, "/pm/tasks", &HeaderMap::new())
            .await;
        assert_eq!(first, second);
    }

    #[test]
    fn callback_keeps_slashes_and_escapes_query_characters() {
        let gate = gate(StubVerifier::new(None));
        let path = "/pm/a&b=c/d%20e";
        let location = gate.login_location(path);
        assert_eq!(location, "/pm/login?callbackUrl=/pm/a%26b%3Dc/d%2520e");

        let (_, query) = location.split_once('?').unwrap();
        let pairs: Vec<(String, String)> = url::form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect();
        assert_eq!(pairs, vec![("callbackUrl".to_string(), path.to_string())]);
    }
}
