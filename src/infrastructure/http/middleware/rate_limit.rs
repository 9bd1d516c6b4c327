//! Rate Limiting Middleware

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::infrastructure::http::dto::RateLimitRejection;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::memory::RateLimiter;

/// 按客户端 IP 限流
///
/// 拿不到客户端地址时返回 500，不进入限流逻辑；
/// 令牌耗尽时返回 429 和锁定提示，不再转发
pub async fn rate_limit_middleware(
    State(rate_limiter): State<Arc<RateLimiter>>,
    request: Request,
    next: Next,
) -> Response {
    let Some(ConnectInfo(addr)) = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .copied()
    else {
        return ApiError::Internal("unable to determine client address".to_string())
            .into_response();
    };

    let client = addr.ip();
    if !rate_limiter.check(client) {
        tracing::warn!(client = %client, "Rate limit exceeded");
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(RateLimitRejection::locked()),
        )
            .into_response();
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::memory::RateLimiterConfig;
    use axum::{body::Body, http::Request as HttpRequest, middleware, routing::get, Router};
    use serde_json::Value;
    use std::net::{IpAddr, Ipv4Addr};
    use tower::ServiceExt;

    async fn test_handler() -> &'static str {
        "success"
    }

    fn app(rate_limiter: Arc<RateLimiter>) -> Router {
        Router::new()
            .route("/test", get(test_handler))
            .layer(middleware::from_fn_with_state(
                rate_limiter,
                rate_limit_middleware,
            ))
    }

    fn request_from(addr: SocketAddr) -> HttpRequest<Body> {
        HttpRequest::builder()
            .uri("/test")
            .extension(ConnectInfo(addr))
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_seventh_request_is_locked() {
        let app = app(Arc::new(RateLimiter::default()));
        let addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 50000);

        for _ in 0..6 {
            let response = app.clone().oneshot(request_from(addr)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = app.oneshot(request_from(addr)).await.unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "Request Failed");
        assert_eq!(json["locked"], true);
        assert!(json["body"].as_str().unwrap().contains("5 minutes"));
    }

    #[tokio::test]
    async fn test_port_does_not_change_identity() {
        let limiter = Arc::new(RateLimiter::new(RateLimiterConfig {
            burst_size: 1,
            ..Default::default()
        }));
        let app = app(limiter.clone());

        let first = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 50000);
        let second = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 50001);
        let other = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(192, 168, 1, 1)), 50000);

        let response = app.clone().oneshot(request_from(first)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let response = app.clone().oneshot(request_from(second)).await.unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        let response = app.oneshot(request_from(other)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        assert_eq!(limiter.client_count(), 2);
    }

    #[tokio::test]
    async fn test_missing_client_address_is_internal_error() {
        let limiter = Arc::new(RateLimiter::default());
        let app = app(limiter.clone());

        let request = HttpRequest::builder()
            .uri("/test")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(limiter.client_count(), 0);
    }
}
