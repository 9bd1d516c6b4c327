//! HTTP Token Verifier - 调用外部认证服务校验会话 token
//!
//! 外部认证 API:
//! POST {verify_url}
//! Authorization: Bearer {secret_key}
//! Request: {"token": "..."}  (JSON)
//! Response: {"session_id": "...", "user_id": "...", "expires_at": "..."}

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use crate::application::ports::{AuthError, Session, TokenVerifier};
use crate::config::AuthConfig;

#[derive(Debug, Serialize)]
struct VerifyRequest<'a> {
    token: &'a str,
}

/// HTTP Token Verifier 配置
#[derive(Clone)]
pub struct HttpTokenVerifierConfig {
    pub verify_url: String,
    pub secret_key: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl From<&AuthConfig> for HttpTokenVerifierConfig {
    fn from(config: &AuthConfig) -> Self {
        Self {
            verify_url: config.verify_url.clone(),
            secret_key: config.secret_key.clone(),
            timeout_secs: config.timeout_secs,
        }
    }
}

/// 通过 HTTP 调用外部认证服务
pub struct HttpTokenVerifier {
    client: Client,
    config: HttpTokenVerifierConfig,
}

impl HttpTokenVerifier {
    /// 密钥或地址缺失时直接失败
    pub fn new(config: HttpTokenVerifierConfig) -> Result<Self, AuthError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AuthError::NetworkError(e.to_string()))?;

        Self::with_client(client, config)
    }

    /// 使用外部构建的 HTTP 客户端
    pub fn with_client(client: Client, config: HttpTokenVerifierConfig) -> Result<Self, AuthError> {
        if config.secret_key.is_empty() {
            return Err(AuthError::Configuration("secret key is empty".to_string()));
        }
        reqwest::Url::parse(&config.verify_url)
            .map_err(|e| AuthError::Configuration(format!("invalid verify url: {}", e)))?;

        tracing::info!(verify_url = %config.verify_url, "Token verifier initialized");
        Ok(Self { client, config })
    }
}

#[async_trait]
impl TokenVerifier for HttpTokenVerifier {
    async fn verify(&self, token: &str) -> Result<Session, AuthError> {
        let response = self
            .client
            .post(&self.config.verify_url)
            .bearer_auth(&self.config.secret_key)
            .json(&VerifyRequest { token })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AuthError::NetworkError("auth provider timed out".to_string())
                } else if e.is_connect() {
                    AuthError::NetworkError(format!("Cannot connect to auth provider: {}", e))
                } else {
                    AuthError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if status.is_client_error() {
            return Err(AuthError::InvalidToken(format!("HTTP {}", status)));
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AuthError::NetworkError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let session: Session = response
            .json()
            .await
            .map_err(|e| AuthError::InvalidToken(format!("malformed session: {}", e)))?;

        if let Some(expires_at) = session.expires_at {
            if expires_at <= Utc::now() {
                return Err(AuthError::InvalidToken("session expired".to_string()));
            }
        }

        Ok(session)
    }
}
