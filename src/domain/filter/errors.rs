//! Filter Context - Errors

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    /// 范围字段的条件值不是字符串
    #[error("value ({field}) is not a string")]
    ValueType { field: String },

    /// 去掉后缀后的数值无法解析
    #[error("invalid {field} value: {reason}")]
    Parse { field: String, reason: String },

    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("unsupported value for field {0}")]
    UnsupportedValue(String),
}

impl FilterError {
    pub fn value_type(field: impl Into<String>) -> Self {
        Self::ValueType {
            field: field.into(),
        }
    }

    pub fn parse(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
