//! Authentication Middleware
//!
//! 只挂载在受保护路由上。要求 `Authorization: Bearer <token>`，
//! 验证通过后把 [`Session`] 放入请求扩展，处理函数通过 `Extension<Session>` 读取。

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::application::{AuthError, Session, TokenVerifier};
use crate::infrastructure::http::error::ApiError;

/// 从请求头提取 Bearer token
///
/// 头部必须恰好是 `Bearer <token>` 两段
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingHeader)?
        .to_str()
        .map_err(|_| AuthError::MalformedHeader)?;

    if value.is_empty() {
        return Err(AuthError::MissingHeader);
    }

    let mut parts = value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) if !token.is_empty() => Ok(token),
        _ => Err(AuthError::MalformedHeader),
    }
}

/// 认证中间件
///
/// 缺少或格式错误的头部直接返回 401，不调用验证器
pub async fn auth_middleware(
    State(verifier): State<Arc<dyn TokenVerifier>>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = match bearer_token(request.headers()) {
        Ok(token) => token.to_string(),
        Err(e) => return ApiError::from(e).into_response(),
    };

    let session: Session = match verifier.verify(&token).await {
        Ok(session) => session,
        Err(AuthError::Configuration(msg)) => {
            return ApiError::Internal(format!("auth provider misconfigured: {}", msg))
                .into_response();
        }
        Err(e) => {
            tracing::warn!(error = %e, "Session verification failed");
            return ApiError::Unauthorized("Invalid session".to_string()).into_response();
        }
    };

    tracing::debug!(user_id = %session.user_id, "Session verified");
    request.extensions_mut().insert(session);

    next.run(request).await
}
