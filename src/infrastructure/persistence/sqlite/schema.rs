//! Table Schema - 记录类型的表结构描述
//!
//! 通用存储不通过反射访问字段，每个记录类型显式提供表名、列名、
//! 范围字段注册以及按列顺序排列的绑定值。

use sqlx::{sqlite::SqliteRow, FromRow};

use crate::domain::{FieldValue, RangeField, SortDirection};

/// 表结构描述
#[derive(Debug)]
pub struct TableSchema {
    pub table: &'static str,
    pub id_column: &'static str,
    /// 列名，顺序与 [`Record::values`] 一致
    pub columns: &'static [&'static str],
    /// 支持 `+`/`-` 范围后缀的数值字段
    pub range_fields: &'static [RangeField],
    /// 未显式指定排序时使用，None 表示数据库自然顺序
    pub default_order: Option<(&'static str, SortDirection)>,
    /// `CREATE TABLE IF NOT EXISTS ...`
    pub create_sql: &'static str,
}

impl TableSchema {
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|column| *column == name)
    }

    pub(crate) fn column_list(&self) -> String {
        self.columns
            .iter()
            .map(|column| quote_ident(column))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// 可持久化的记录类型
pub trait Record: for<'r> FromRow<'r, SqliteRow> + Send + Unpin {
    fn schema() -> &'static TableSchema;

    /// 按 `schema().columns` 顺序返回各列的值
    fn values(&self) -> Vec<FieldValue>;
}

/// 标识符加双引号，调用前字段名必须已通过列名校验
pub(crate) fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name)
}
