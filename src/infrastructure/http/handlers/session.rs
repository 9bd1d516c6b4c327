//! Session Handler

use axum::{Extension, Json};

use crate::application::Session;
use crate::infrastructure::http::error::ApiError;

/// GET /api/session - 返回当前请求已验证的会话
pub async fn current_session(
    Extension(session): Extension<Session>,
) -> Result<Json<Session>, ApiError> {
    Ok(Json(session))
}
