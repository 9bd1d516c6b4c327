//! HTTP Server
//!
//! Axum HTTP 服务器启动、中间件组装和优雅关闭

use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::middleware;
use axum::{Extension, Router};
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::{HeaderValue, Method};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::{RequestBodyTimeoutLayer, TimeoutLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::middleware::{
    auth_middleware, logging_middleware, monitoring_middleware, rate_limit_middleware, LocalAddr,
};
use super::routes::{protected_routes, public_routes};
use super::state::AppState;
use crate::config;

/// 服务器错误
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read listener address: {0}")]
    LocalAddr(#[source] std::io::Error),

    #[error("Graceful shutdown did not finish within {0:?}")]
    ShutdownTimeout(Duration),

    #[error("Server task failed: {0}")]
    Task(String),
}

/// 服务器配置
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// 读取请求体的超时
    pub read_timeout: Duration,
    /// 处理请求并写回响应的超时
    pub write_timeout: Duration,
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            read_timeout: Duration::from_secs(15),
            write_timeout: Duration::from_secs(15),
            allowed_origins: Vec::new(),
        }
    }
}

impl From<&config::ServerConfig> for ServerConfig {
    fn from(config: &config::ServerConfig) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
            read_timeout: Duration::from_secs(config.read_timeout_secs),
            write_timeout: Duration::from_secs(config.write_timeout_secs),
            allowed_origins: config.allowed_origins(),
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// HTTP 服务器
pub struct HttpServer {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl HttpServer {
    pub fn new(config: ServerConfig, state: AppState) -> Self {
        Self {
            config,
            state: Arc::new(state),
        }
    }

    /// 构建 Router
    ///
    /// 请求从外到内依次经过：日志 → 限流 →（受保护路由）认证 →（非 local）监控 → 处理函数
    pub fn build_router(&self, local_addr: SocketAddr) -> Router {
        self.assemble(self.api_routes(), local_addr)
    }

    /// `/api` 下的全部路由，受保护路由带认证
    fn api_routes(&self) -> Router<Arc<AppState>> {
        let public = self.with_monitoring(public_routes());
        let protected = self
            .with_monitoring(protected_routes())
            .route_layer(middleware::from_fn_with_state(
                self.state.verifier.clone(),
                auth_middleware,
            ));
        public.merge(protected)
    }

    /// 在 API 路由外套上公共中间件
    fn assemble(&self, api: Router<Arc<AppState>>, local_addr: SocketAddr) -> Router {
        let state = self.state.clone();

        Router::new()
            .nest("/api", api)
            .layer(middleware::from_fn_with_state(
                state.rate_limiter.clone(),
                rate_limit_middleware,
            ))
            .layer(middleware::from_fn(logging_middleware))
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(self.config.write_timeout))
            .layer(RequestBodyTimeoutLayer::new(self.config.read_timeout))
            .layer(self.cors())
            .layer(Extension(LocalAddr(local_addr)))
            .with_state(state)
    }

    /// 绑定端口并在后台开始接受连接，同时启动限流清理任务
    pub async fn start(self) -> Result<RunningServer, ServerError> {
        let addr = self.config.addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: addr.clone(),
                source,
            })?;
        let local_addr = listener
            .local_addr()
            .map_err(|source| ServerError::Bind { addr, source })?;

        let router = self.build_router(local_addr);
        let token = CancellationToken::new();
        let sweeper = self.state.rate_limiter.spawn_sweeper(token.child_token());

        info!(
            addr = %local_addr,
            environment = %self.state.environment,
            monitoring = self.state.monitoring_enabled(),
            "HTTP server listening"
        );

        RunningServer::spawn(listener, router, token, Some(sweeper))
    }

    fn with_monitoring(&self, router: Router<Arc<AppState>>) -> Router<Arc<AppState>> {
        if !self.state.monitoring_enabled() {
            return router;
        }

        let monitor = self.state.monitor.clone();
        let panic_monitor = monitor.clone();
        router
            .layer(middleware::from_fn_with_state(monitor, monitoring_middleware))
            .layer(CatchPanicLayer::custom(
                move |err: Box<dyn Any + Send + 'static>| panic_monitor.panic_response(err),
            ))
    }

    fn cors(&self) -> CorsLayer {
        let origins: Vec<HeaderValue> = self
            .config
            .allowed_origins
            .iter()
            .filter_map(|origin| match origin.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PATCH,
                Method::PUT,
                Method::DELETE,
            ])
            .allow_headers([AUTHORIZATION, CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(Duration::from_secs(3600))
    }
}

/// 运行中的服务器句柄
pub struct RunningServer {
    local_addr: SocketAddr,
    token: CancellationToken,
    server: JoinHandle<()>,
    sweeper: Option<JoinHandle<()>>,
}

impl RunningServer {
    /// 在后台任务中接受连接，`token` 取消后停止接受新连接
    pub fn spawn(
        listener: TcpListener,
        router: Router,
        token: CancellationToken,
        sweeper: Option<JoinHandle<()>>,
    ) -> Result<Self, ServerError> {
        let local_addr = listener.local_addr().map_err(ServerError::LocalAddr)?;
        let shutdown = token.clone();

        let server = tokio::spawn(async move {
            let result = axum::serve(
                listener,
                router.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .with_graceful_shutdown(async move { shutdown.cancelled().await })
            .await;

            if let Err(e) = result {
                tracing::error!(error = %e, "HTTP server stopped with error");
            }
        });

        Ok(Self {
            local_addr,
            token,
            server,
            sweeper,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// 优雅关闭
    ///
    /// 立即停止接受新连接，等待进行中的请求完成；超过 `grace` 仍未结束时
    /// 中止服务器任务并返回 [`ServerError::ShutdownTimeout`]
    pub async fn shutdown(self, grace: Duration) -> Result<(), ServerError> {
        info!(grace = ?grace, "Shutting down HTTP server");
        self.token.cancel();

        let mut server = self.server;
        let result = match tokio::time::timeout(grace, &mut server).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(ServerError::Task(e.to_string())),
            Err(_) => {
                server.abort();
                tracing::error!(grace = ?grace, "Graceful shutdown timed out");
                Err(ServerError::ShutdownTimeout(grace))
            }
        };

        if let Some(sweeper) = self.sweeper {
            if let Err(e) = sweeper.await {
                tracing::warn!(error = %e, "Rate limiter sweeper ended abnormally");
            }
        }

        if result.is_ok() {
            info!("HTTP server stopped");
        }
        result
    }
}
