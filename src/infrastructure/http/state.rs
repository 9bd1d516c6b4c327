//! Application State
//!
//! 启动时构建一次，通过 `Arc` 在所有请求间共享

use std::sync::Arc;

use crate::application::TokenVerifier;
use crate::config::LOCAL_ENV;
use crate::infrastructure::adapters::ImageStoreClient;
use crate::infrastructure::memory::RateLimiter;
use crate::infrastructure::persistence::SqliteStore;

use super::middleware::Monitor;

/// 应用状态
pub struct AppState {
    /// 部署层级
    pub environment: String,
    pub store: SqliteStore,
    pub verifier: Arc<dyn TokenVerifier>,
    pub rate_limiter: Arc<RateLimiter>,
    pub monitor: Arc<Monitor>,
    pub image_store: Arc<ImageStoreClient>,
}

impl AppState {
    pub fn new(
        environment: impl Into<String>,
        store: SqliteStore,
        verifier: Arc<dyn TokenVerifier>,
        rate_limiter: Arc<RateLimiter>,
        monitor: Arc<Monitor>,
        image_store: Arc<ImageStoreClient>,
    ) -> Self {
        Self {
            environment: environment.into(),
            store,
            verifier,
            rate_limiter,
            monitor,
            image_store,
        }
    }

    /// 最低部署层级之外才启用监控
    pub fn monitoring_enabled(&self) -> bool {
        self.environment != LOCAL_ENV
    }
}
