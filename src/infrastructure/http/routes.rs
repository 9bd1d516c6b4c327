//! HTTP Routes
//!
//! API Endpoints:
//! - /api/probe      GET  健康检查（公开）
//! - /api/ready      GET  就绪检查，探测数据库（公开）
//! - /api/session    GET  当前会话（需要 Bearer token）

use axum::{routing::get, Router};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 公开路由
pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/probe", get(handlers::probe))
        .route("/ready", get(handlers::ready))
}

/// 需要认证的路由，由调用方挂载认证中间件
pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new().route("/session", get(handlers::current_session))
}
