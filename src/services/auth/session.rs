//! Signed session tokens carried in a cookie.
//!
//! The session credential is an HS256 JWT signed with `SESSION_SECRET`.
//! Whoever implements [`SessionVerifier`] owns signature AND expiry checks;
//! the access gate trusts whatever claims come back.

use async_trait::async_trait;
use axum::http::{HeaderMap, header};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::services::auth::role::Role;

pub const SESSION_ISSUER: &str = "archinara-pm";
pub const SESSION_COOKIE: &str = "archinara.session-token";
pub const SECURE_SESSION_COOKIE: &str = "__Secure-archinara.session-token";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session token error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("empty '{0}' claim")]
    EmptyClaim(&'static str),
    #[error("session lifetime out of range: {0}s")]
    LifetimeOutOfRange(u64),
}

/// Verified session, as seen by the gate and downstream handlers.
///
/// `role` is kept as the raw claim string; an unknown role is still an
/// authenticated session, it just belongs to no allow-list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionClaims {
    pub subject: String,
    pub role: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub expires_at: i64,
}

impl SessionClaims {
    pub fn role(&self) -> Option<Role> {
        self.role.parse().ok()
    }
}

/// Identity to mint a session for.
#[derive(Debug, Clone)]
pub struct SessionGrant {
    pub subject: String,
    pub role: Role,
    pub name: Option<String>,
    pub email: Option<String>,
}

impl SessionGrant {
    pub fn new(subject: impl Into<String>, role: Role) -> Self {
        Self {
            subject: subject.into(),
            role,
            name: None,
            email: None,
        }
    }
}

// Wire format of the JWT payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SessionTokenClaims {
    iss: String,
    sub: String,
    #[serde(default)]
    role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    iat: i64,
    exp: i64,
    jti: String,
}

/// Consumed by the access gate.
///
/// Every failure (no cookie, malformed token, bad signature, expired) must be
/// reported as `None`; callers never learn why a credential was rejected.
#[async_trait]
pub trait SessionVerifier: Send + Sync {
    async fn verify(&self, headers: &HeaderMap) -> Option<SessionClaims>;
}

#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub secret: String,
    pub ttl_seconds: u64,
    pub leeway_seconds: u64,
    pub secure_cookie: bool,
}

/// HS256 session issuer + verifier.
#[derive(Clone)]
pub struct SessionService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_seconds: u64,
    secure_cookie: bool,
}

impl std::fmt::Debug for SessionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("SessionService")
            .field("cookie_name", &self.cookie_name())
            .field("ttl_seconds", &self.ttl_seconds)
            .field("leeway_seconds", &self.validation.leeway)
            .finish()
    }
}

impl SessionService {
    pub fn new(settings: &SessionSettings) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[SESSION_ISSUER]);
        validation.set_required_spec_claims(&["exp", "sub", "iss"]);
        validation.leeway = settings.leeway_seconds;

        Self {
            encoding_key: EncodingKey::from_secret(settings.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(settings.secret.as_bytes()),
            validation,
            ttl_seconds: settings.ttl_seconds,
            secure_cookie: settings.secure_cookie,
        }
    }

    /// `__Secure-` prefixed names are only accepted by browsers over https.
    pub fn cookie_name(&self) -> &'static str {
        if self.secure_cookie {
            SECURE_SESSION_COOKIE
        } else {
            SESSION_COOKIE
        }
    }

    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }

    pub fn issue(&self, grant: &SessionGrant) -> Result<String, SessionError> {
        let now = chrono::Utc::now().timestamp();
        let expires_at = i64::try_from(self.ttl_seconds)
            .ok()
            .and_then(|ttl| now.checked_add(ttl))
            .ok_or(SessionError::LifetimeOutOfRange(self.ttl_seconds))?;
        self.issue_at(grant, now, expires_at)
    }

    pub(crate) fn issue_at(
        &self,
        grant: &SessionGrant,
        issued_at: i64,
        expires_at: i64,
    ) -> Result<String, SessionError> {
        if grant.subject.trim().is_empty() {
            return Err(SessionError::EmptyClaim("sub"));
        }

        let claims = SessionTokenClaims {
            iss: SESSION_ISSUER.to_string(),
            sub: grant.subject.clone(),
            role: grant.role.as_str().to_string(),
            name: grant.name.clone(),
            email: grant.email.clone(),
            iat: issued_at,
            exp: expires_at,
            jti: Uuid::new_v4().to_string(),
        };

        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &self.encoding_key,
        )?;
        Ok(token)
    }

    /// `Set-Cookie` value that stores `token` as the session cookie.
    pub fn set_cookie(&self, token: &str) -> String {
        let mut cookie = format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            self.cookie_name(),
            token,
            self.ttl_seconds
        );
        if self.secure_cookie {
            cookie.push_str("; Secure");
        }
        cookie
    }

    /// `Set-Cookie` value that removes the session cookie.
    pub fn clear_cookie(&self) -> String {
        let mut cookie = format!(
            "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
            self.cookie_name()
        );
        if self.secure_cookie {
            cookie.push_str("; Secure");
        }
        cookie
    }

    /// Signature, issuer and `exp` (with leeway) are checked by `jsonwebtoken`.
    pub fn decode(&self, token: &str) -> Result<SessionClaims, SessionError> {
        let data =
            jsonwebtoken::decode::<SessionTokenClaims>(token, &self.decoding_key, &self.validation)?;
        let claims = data.claims;

        if claims.sub.trim().is_empty() {
            return Err(SessionError::EmptyClaim("sub"));
        }

        Ok(SessionClaims {
            subject: claims.sub,
            role: claims.role,
            name: claims.name,
            email: claims.email,
            expires_at: claims.exp,
        })
    }
}

#[async_trait]
impl SessionVerifier for SessionService {
    async fn verify(&self, headers: &HeaderMap) -> Option<SessionClaims> {
        let token = find_cookie(headers, self.cookie_name())?;
        match self.decode(token) {
            Ok(claims) => Some(claims),
            Err(err) => {
                tracing::debug!(error = %err, "session token rejected");
                None
            }
        }
    }
}

/// Value of the first non-empty cookie called `name`, across all `Cookie` headers.
pub fn find_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, value)| *key == name && !value.is_empty())
        .map(|(_, value)| value)
}
