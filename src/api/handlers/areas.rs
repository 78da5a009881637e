/*
 * Responsibility
 * - /pm/:path* と /work/:path* の保護ページ (placeholder)
 * - gate を通過した Viewer と要求パスを返す。中身の描画はフロント側
 */
use axum::{Json, http::Uri};
use serde::Serialize;

use crate::api::extractors::Viewer;
use crate::error::AppError;

#[derive(Debug, Serialize)]
pub struct AreaPage {
    pub area: &'static str,
    pub path: String,
    pub viewer: Viewer,
}

pub async fn pm_page(viewer: Viewer, uri: Uri) -> Json<AreaPage> {
    Json(AreaPage {
        area: "pm",
        path: uri.path().to_string(),
        viewer,
    })
}

pub async fn work_page(viewer: Viewer, uri: Uri) -> Json<AreaPage> {
    Json(AreaPage {
        area: "work",
        path: uri.path().to_string(),
        viewer,
    })
}

pub async fn not_found(uri: Uri) -> AppError {
    AppError::not_found(uri.path())
}
