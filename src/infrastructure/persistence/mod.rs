//! Persistence Layer - 数据持久化
//!
//! SQLite 存储实现

pub mod sqlite;

pub use self::sqlite::{Record, SqliteStore, TableSchema};

/// 启动时需要建表的记录类型，新增 [`Record`] 实现时在这里注册其表结构
pub static MODELS: &[&TableSchema] = &[];
