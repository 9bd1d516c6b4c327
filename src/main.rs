//! Exchange Core - REST 后端服务
//!
//! 启动顺序：配置 → 日志 → 数据库 → 外部客户端 → HTTP 服务器，
//! 收到中断信号后优雅关闭

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::signal;
use tracing::Instrument;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use exchange_core::application::TokenVerifier;
use exchange_core::config::{load_config, print_config, AppConfig};
use exchange_core::infrastructure::adapters::{
    HttpTokenVerifier, HttpTokenVerifierConfig, ImageStoreClient,
};
use exchange_core::infrastructure::http::middleware::Monitor;
use exchange_core::infrastructure::http::{AppState, HttpServer, ServerConfig};
use exchange_core::infrastructure::memory::{RateLimiter, RateLimiterConfig};
use exchange_core::infrastructure::persistence::sqlite::{
    create_pool, ensure_tables, DatabaseConfig,
};
use exchange_core::infrastructure::persistence::{SqliteStore, MODELS};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值），缺少必需项时直接退出
    let config = load_config().context("Failed to load config")?;

    init_logging(&config);

    let span = tracing::info_span!("app", service = "core");
    run(config).instrument(span).await
}

fn init_logging(config: &AppConfig) {
    let log_filter = format!(
        "{},exchange_core={},tower_http=debug",
        config.log.level, config.log.level
    );
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter));
    let registry = tracing_subscriber::registry().with(filter);

    if config.log.json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn run(config: AppConfig) -> anyhow::Result<()> {
    tracing::info!("Exchange Core starting");
    print_config(&config);

    // 确保数据目录存在
    if let Some(parent) = std::path::Path::new(&config.database.path).parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    // 初始化数据库
    let db_config = DatabaseConfig {
        database_url: config.database.database_url(),
        max_connections: config.database.max_connections,
    };
    let pool = create_pool(&db_config)
        .await
        .context("Failed to connect to database")?;
    ensure_tables(&pool, MODELS)
        .await
        .context("Failed to create tables")?;

    // 外部客户端
    let verifier: Arc<dyn TokenVerifier> = Arc::new(
        HttpTokenVerifier::new(HttpTokenVerifierConfig::from(&config.auth))
            .context("Failed to create auth client")?,
    );
    let image_store = Arc::new(
        ImageStoreClient::from_url(&config.image_store.url)
            .context("Failed to create image store client")?,
    );
    let monitor = Arc::new(
        Monitor::new(&config.env, &config.monitoring)
            .context("Failed to create monitoring client")?,
    );
    let rate_limiter = Arc::new(RateLimiter::new(RateLimiterConfig::from(
        &config.rate_limit,
    )));

    let state = AppState::new(
        config.env.clone(),
        SqliteStore::new(pool.clone()),
        verifier,
        rate_limiter,
        monitor,
        image_store,
    );

    let server = HttpServer::new(ServerConfig::from(&config.server), state);
    let running = server.start().await?;

    shutdown_signal().await;
    tracing::info!("Received shutdown signal");

    let grace = Duration::from_secs(config.server.shutdown_grace_secs);
    let result = running.shutdown(grace).await;

    pool.close().await;

    match result {
        Ok(()) => {
            tracing::info!("Server shutdown complete");
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "Server shutdown failed");
            Err(e.into())
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
