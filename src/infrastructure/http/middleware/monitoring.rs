//! Monitoring Middleware
//!
//! 非 local 层级启用：捕获处理函数 panic，5xx 响应和 panic 按采样率
//! 以 `monitoring` target 的 error 事件上报

use std::any::Any;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::config::MonitoringConfig;
use crate::infrastructure::http::error::ApiError;

/// 监控配置错误
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("Invalid monitoring DSN: {0}")]
    InvalidDsn(String),

    #[error("Monitoring sample rate must be between 0 and 1, got {0}")]
    InvalidSampleRate(f64),
}

/// 监控上报
pub struct Monitor {
    environment: String,
    dsn_host: Option<String>,
    sample_rate: f64,
    seen: AtomicU64,
}

impl Monitor {
    /// DSN 为空时仍然上报到日志，只是不带上报地址
    pub fn new(
        environment: impl Into<String>,
        config: &MonitoringConfig,
    ) -> Result<Self, MonitorError> {
        if !(0.0..=1.0).contains(&config.sample_rate) {
            return Err(MonitorError::InvalidSampleRate(config.sample_rate));
        }

        let dsn_host = if config.dsn.is_empty() {
            None
        } else {
            let url = reqwest::Url::parse(&config.dsn)
                .map_err(|e| MonitorError::InvalidDsn(e.to_string()))?;
            let host = url
                .host_str()
                .ok_or_else(|| MonitorError::InvalidDsn("missing host".to_string()))?;
            Some(host.to_string())
        };

        Ok(Self {
            environment: environment.into(),
            dsn_host,
            sample_rate: config.sample_rate,
            seen: AtomicU64::new(0),
        })
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn dsn_host(&self) -> Option<&str> {
        self.dsn_host.as_deref()
    }

    /// 确定性采样：第 n 个事件在 `floor(n * rate)` 增长时上报
    pub fn should_sample(&self) -> bool {
        let n = self.seen.fetch_add(1, Ordering::Relaxed);
        let before = (n as f64 * self.sample_rate).floor();
        let after = ((n + 1) as f64 * self.sample_rate).floor();
        after > before
    }

    /// 上报一次失败，返回是否被采样
    pub fn capture(&self, kind: &'static str, detail: &str) -> bool {
        if !self.should_sample() {
            return false;
        }
        tracing::error!(
            target: "monitoring",
            environment = %self.environment,
            dsn_host = self.dsn_host.as_deref().unwrap_or("-"),
            kind,
            detail,
            "Captured failure"
        );
        true
    }

    /// 供 `CatchPanicLayer::custom` 使用：上报 panic 并返回 500
    pub fn panic_response(&self, err: Box<dyn Any + Send + 'static>) -> Response {
        let detail = if let Some(s) = err.downcast_ref::<String>() {
            s.clone()
        } else if let Some(s) = err.downcast_ref::<&str>() {
            s.to_string()
        } else {
            "unknown panic payload".to_string()
        };

        self.capture("panic", &detail);
        ApiError::Internal("Internal server error".to_string()).into_response()
    }
}

/// 监控中间件，上报 5xx 响应
pub async fn monitoring_middleware(
    State(monitor): State<Arc<Monitor>>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;

    if response.status().is_server_error() {
        let detail = format!("{} {} -> {}", method, path, response.status().as_u16());
        monitor.capture("server_error", &detail);
    }

    response
}
