//! SQLite Database - 数据库连接与建表

use sqlx::{sqlite::SqlitePoolOptions, Pool, Sqlite};
use std::path::Path;

use super::TableSchema;

/// 数据库配置
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// 数据库连接 URL
    pub database_url: String,
    /// 最大连接数，0 表示使用连接池默认值
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite:./data/core.db?mode=rwc".to_string(),
            max_connections: 5,
        }
    }
}

impl DatabaseConfig {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            database_url: format!("sqlite:{}?mode=rwc", path.as_ref().display()),
            max_connections: 5,
        }
    }

    pub fn in_memory() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 1,
        }
    }
}

/// 数据库连接池
pub type DbPool = Pool<Sqlite>;

/// 创建数据库连接池并确认连接可用
pub async fn create_pool(config: &DatabaseConfig) -> Result<DbPool, sqlx::Error> {
    let mut options = SqlitePoolOptions::new();
    if config.max_connections > 0 {
        options = options.max_connections(config.max_connections);
    }
    let pool = options.connect(&config.database_url).await?;

    // 启用 WAL 模式，允许并发读写
    sqlx::query("PRAGMA journal_mode=WAL")
        .execute(&pool)
        .await?;

    // 遇到锁时等待而不是立即失败
    sqlx::query("PRAGMA busy_timeout=5000")
        .execute(&pool)
        .await?;

    sqlx::query("SELECT 1").execute(&pool).await?;

    tracing::info!(
        max_connections = config.max_connections,
        "SQLite pool created with WAL mode and busy_timeout=5000ms"
    );

    Ok(pool)
}

/// 确保表存在（不做版本化迁移）
pub async fn ensure_tables(pool: &DbPool, schemas: &[&TableSchema]) -> Result<(), sqlx::Error> {
    for schema in schemas {
        sqlx::query(schema.create_sql).execute(pool).await?;
        tracing::debug!(table = schema.table, "Table ensured");
    }

    tracing::info!(tables = schemas.len(), "Database tables ensured");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    static PROBE_SCHEMA: TableSchema = TableSchema {
        table: "probes",
        id_column: "id",
        columns: &["id", "label"],
        range_fields: &[],
        default_order: None,
        create_sql: "CREATE TABLE IF NOT EXISTS probes (id TEXT PRIMARY KEY, label TEXT NOT NULL)",
    };

    #[tokio::test]
    async fn test_create_in_memory_db() {
        let config = DatabaseConfig::in_memory();
        let pool = create_pool(&config).await.unwrap();
        ensure_tables(&pool, &[&PROBE_SCHEMA]).await.unwrap();
        // 重复执行不报错
        ensure_tables(&pool, &[&PROBE_SCHEMA]).await.unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM probes")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_database_url_from_path() {
        let config = DatabaseConfig::new("data/core.db");
        assert_eq!(config.database_url, "sqlite:data/core.db?mode=rwc");
    }
}
