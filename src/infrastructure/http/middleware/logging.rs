//! Request Logging Middleware
//!
//! 每个请求记录一条结构化日志，响应为 4xx / 5xx 时额外记录状态码

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request},
    http::header::{HOST, USER_AGENT},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

/// 服务端监听地址，由服务器在构建路由时注入请求扩展
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalAddr(pub SocketAddr);

/// 请求日志中间件
///
/// 只读取请求信息，不修改请求，始终转发
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4();
    let ip_address = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_default();
    let server_addr = request
        .extensions()
        .get::<LocalAddr>()
        .map(|LocalAddr(addr)| addr.to_string())
        .unwrap_or_default();
    let host = header_str(&request, HOST);
    let user_agent = header_str(&request, USER_AGENT);
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    tracing::info!(
        request_id = %request_id,
        ip_address = %ip_address,
        host = %host,
        server_addr = %server_addr,
        user_agent = %user_agent,
        method = %method,
        path = %path,
        "Incoming request"
    );

    let response = next.run(request).await;
    let status = response.status();

    if status.is_server_error() {
        tracing::error!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status = %status.as_u16(),
            "HTTP server error"
        );
    } else if status.is_client_error() {
        tracing::warn!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status = %status.as_u16(),
            "HTTP client error"
        );
    }

    response
}

fn header_str(request: &Request, name: axum::http::HeaderName) -> String {
    request
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}
