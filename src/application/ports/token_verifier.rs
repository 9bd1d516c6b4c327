//! Token Verifier Port - 外部认证服务抽象
//!
//! 只约定一件事：给定 token 返回会话或错误

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 认证错误
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Unauthorized")]
    MissingHeader,

    #[error("Invalid authorization header")]
    MalformedHeader,

    #[error("Invalid session: {0}")]
    InvalidToken(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Auth provider misconfigured: {0}")]
    Configuration(String),
}

/// 已验证的会话
///
/// 只在单个请求的处理过程中存在于请求扩展里，不做持久化
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub session_id: String,
    pub user_id: String,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Token Verifier Port
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// 校验 token，成功返回会话
    async fn verify(&self, token: &str) -> Result<Session, AuthError>;
}
