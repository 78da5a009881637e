use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::services::access::Admission;

use super::Viewer;

/// Handler で Viewer を受け取るための extractor
/// access middleware が Admission を request.extensions() に insert 済みである前提
/// 見つからない場合は 401 (middleware 未設定)
impl<S> FromRequestParts<S> for Viewer
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Admission>()
            .cloned()
            .map(Viewer::from)
            .ok_or(AppError::Unauthorized)
    }
}
