//! Store Port - 持久化错误定义
//!
//! 通用记录存储的错误类型，具体实现在 infrastructure/persistence 层

use thiserror::Error;

use crate::domain::{FilterError, PageError};

/// 存储错误
#[derive(Debug, Error)]
pub enum StoreError {
    /// 查询期望至少一行但没有结果，与查询失败区分
    #[error("no rows in result set")]
    NotFound,

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Page(#[from] PageError),

    #[error("batch size must be >= 1")]
    InvalidBatchSize,

    #[error("column {0} cannot be updated")]
    ImmutableField(String),

    #[error("record for {table} has {actual} values, expected {expected}")]
    SchemaMismatch {
        table: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound)
    }

    /// 由调用方输入导致的错误（条件值、分页参数、字段名）
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            StoreError::Filter(_)
                | StoreError::Page(_)
                | StoreError::InvalidBatchSize
                | StoreError::ImmutableField(_)
        )
    }
}
