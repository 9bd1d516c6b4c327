//! Data Transfer Objects

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 限流拒绝时的提示
pub const LOCKED_MESSAGE: &str =
    "The account is locked or disabled. Please wait 5 minutes and try again.";

/// 限流拒绝响应体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitRejection {
    pub status: String,
    pub body: String,
    pub locked: bool,
    pub timestamp: DateTime<Utc>,
}

impl RateLimitRejection {
    pub fn locked() -> Self {
        Self {
            status: "Request Failed".to_string(),
            body: LOCKED_MESSAGE.to_string(),
            locked: true,
            timestamp: Utc::now(),
        }
    }
}

/// 服务状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ServerStatus {
    Healthy,
}

/// 健康检查响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeResponse {
    pub status: ServerStatus,
    pub message: String,
    pub environment: String,
    pub timestamp: DateTime<Utc>,
}
