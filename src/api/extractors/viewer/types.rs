/*
 * Responsibility
 * - Handler から見える「ゲートを通過した主体」の型
 * - access middleware が request extensions に入れた Admission から作る
 */
use serde::Serialize;

use crate::services::access::Admission;

/// Who the access gate let through.
///
/// `Service` is a bearer-token caller: it has no session and no role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Viewer {
    Anonymous,
    Service,
    Member {
        subject: String,
        role: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        email: Option<String>,
    },
}

impl From<Admission> for Viewer {
    fn from(admission: Admission) -> Self {
        match admission {
            Admission::ServiceToken => Viewer::Service,
            Admission::Session(claims) => Viewer::Member {
                subject: claims.subject,
                role: claims.role,
                name: claims.name,
                email: claims.email,
            },
            Admission::Unguarded | Admission::Preflight | Admission::PublicPage => {
                Viewer::Anonymous
            }
        }
    }
}
