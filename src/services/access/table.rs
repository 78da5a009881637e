/*
 * Responsibility
 * - ゲート対象のルート分類表 (pattern → 必要な認証/ロール)
 * - 先頭から評価し、最初に一致したルールを採用する
 *
 * 新しいエリアを追加する場合はここにルールを足すだけでよい (gate 側の分岐は不要)
 */
use std::collections::BTreeSet;

use crate::services::access::path::{PathPattern, PatternError};
use crate::services::auth::role::Role;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteAccess {
    /// Matched, but no authentication needed.
    Public,
    /// Any valid session, whatever its role.
    Authenticated,
    /// Valid session whose role is in the set.
    Roles(BTreeSet<Role>),
}

impl RouteAccess {
    pub fn roles(roles: impl IntoIterator<Item = Role>) -> Self {
        Self::Roles(roles.into_iter().collect())
    }

    pub fn requires_session(&self) -> bool {
        !matches!(self, Self::Public)
    }

    /// `role` is `None` when the session carries an unknown role string.
    pub fn permits(&self, role: Option<Role>) -> bool {
        match self {
            Self::Public | Self::Authenticated => true,
            Self::Roles(allowed) => role.is_some_and(|r| allowed.contains(&r)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRule {
    pub pattern: PathPattern,
    pub access: RouteAccess,
}

impl RouteRule {
    pub fn new(template: &str, access: RouteAccess) -> Result<Self, PatternError> {
        Ok(Self {
            pattern: PathPattern::parse(template)?,
            access,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteTable {
    rules: Vec<RouteRule>,
}

impl RouteTable {
    pub fn new(rules: Vec<RouteRule>) -> Self {
        Self { rules }
    }

    /// `/pm/**` is staff-only, `/work/**` only needs a login.
    pub fn standard() -> Result<Self, PatternError> {
        Ok(Self::new(vec![
            RouteRule::new(
                "/pm/:path*",
                RouteAccess::roles([Role::Admin, Role::Manager, Role::Architect]),
            )?,
            RouteRule::new("/work/:path*", RouteAccess::Authenticated)?,
        ]))
    }

    pub fn rules(&self) -> &[RouteRule] {
        &self.rules
    }

    pub fn classify(&self, path: &str) -> Option<&RouteRule> {
        self.rules.iter().find(|rule| rule.pattern.matches(path))
    }
}
