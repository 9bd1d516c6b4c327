//! Probe Handlers
//!
//! 健康检查与就绪检查，不需要认证

use std::sync::Arc;

use axum::{extract::State, Json};
use chrono::Utc;

use crate::infrastructure::http::dto::{ProbeResponse, ServerStatus};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// GET /api/probe
///
/// 进程存活即返回 200 HEALTHY，不检查依赖
pub async fn probe(State(state): State<Arc<AppState>>) -> Result<Json<ProbeResponse>, ApiError> {
    tracing::info!("Probing backend server");
    Ok(Json(healthy(&state, "pong")))
}

/// GET /api/ready
///
/// 数据库可用时返回 200，否则 503
pub async fn ready(State(state): State<Arc<AppState>>) -> Result<Json<ProbeResponse>, ApiError> {
    state.store.ping().await.map_err(|e| {
        tracing::error!(error = %e, "Readiness check failed to reach database");
        ApiError::Unavailable("database unavailable".to_string())
    })?;
    Ok(Json(healthy(&state, "ready")))
}

fn healthy(state: &AppState, message: &str) -> ProbeResponse {
    ProbeResponse {
        status: ServerStatus::Healthy,
        message: message.to_string(),
        environment: state.environment.clone(),
        timestamp: Utc::now(),
    }
}
