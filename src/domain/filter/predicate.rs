//! Filter Context - Typed Predicates
//!
//! 将条件集合编译为类型化谓词:
//! - 普通字段: 相等谓词
//! - 已注册的范围字段: 字符串值以 `+` 结尾表示 `>=`，以 `-` 结尾表示 `<=`
//!
//! 范围字段通过 [`RangeField`] 注册，而不是在查询代码中比较字段名。

use serde_json::Value;

use super::{ConditionSet, FilterError};

/// 范围字段的数值类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericKind {
    Integer,
    Float,
}

/// 范围字段注册项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeField {
    pub name: &'static str,
    pub kind: NumericKind,
}

impl RangeField {
    pub const fn integer(name: &'static str) -> Self {
        Self {
            name,
            kind: NumericKind::Integer,
        }
    }

    pub const fn float(name: &'static str) -> Self {
        Self {
            name,
            kind: NumericKind::Float,
        }
    }
}

/// 绑定到 SQL 的字段值
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl FieldValue {
    /// 从 JSON 值转换，数组和对象不能作为单列的值
    pub fn from_json(field: &str, value: &Value) -> Result<Self, FilterError> {
        match value {
            Value::Null => Ok(FieldValue::Null),
            Value::Bool(b) => Ok(FieldValue::Bool(*b)),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Ok(FieldValue::Integer(i)),
                None => n
                    .as_f64()
                    .map(FieldValue::Float)
                    .ok_or_else(|| FilterError::UnsupportedValue(field.to_string())),
            },
            Value::String(s) => Ok(FieldValue::Text(s.clone())),
            Value::Array(_) | Value::Object(_) => {
                Err(FilterError::UnsupportedValue(field.to_string()))
            }
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

/// 比较运算
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Eq,
    Gte,
    Lte,
}

impl Comparison {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Comparison::Eq => " = ",
            Comparison::Gte => " >= ",
            Comparison::Lte => " <= ",
        }
    }
}

/// 单个谓词，字段名已经过列名校验
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub field: String,
    pub op: Comparison,
    pub value: FieldValue,
}

impl Predicate {
    pub fn equals(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self {
            field: field.into(),
            op: Comparison::Eq,
            value: value.into(),
        }
    }
}

/// 编译条件集合
///
/// `columns` 为允许出现在条件中的列名，未知字段返回 [`FilterError::UnknownField`]。
pub fn compile(
    conditions: &ConditionSet,
    columns: &[&str],
    range_fields: &[RangeField],
) -> Result<Vec<Predicate>, FilterError> {
    conditions
        .iter()
        .map(|(field, value)| {
            if !columns.iter().any(|column| *column == field) {
                return Err(FilterError::UnknownField(field.to_string()));
            }
            match range_fields.iter().find(|r| r.name == field) {
                Some(range) => parse_range(field, range.kind, value),
                None => Ok(Predicate {
                    field: field.to_string(),
                    op: Comparison::Eq,
                    value: FieldValue::from_json(field, value)?,
                }),
            }
        })
        .collect()
}

fn parse_range(field: &str, kind: NumericKind, value: &Value) -> Result<Predicate, FilterError> {
    let raw = value.as_str().ok_or_else(|| FilterError::value_type(field))?;

    // 后缀均为单字节字符，按字节切片安全
    let (number, op) = match raw.as_bytes().last() {
        Some(b'+') => (&raw[..raw.len() - 1], Comparison::Gte),
        Some(b'-') => (&raw[..raw.len() - 1], Comparison::Lte),
        _ => (raw, Comparison::Eq),
    };

    Ok(Predicate {
        field: field.to_string(),
        op,
        value: parse_number(field, kind, number)?,
    })
}

fn parse_number(field: &str, kind: NumericKind, number: &str) -> Result<FieldValue, FilterError> {
    match kind {
        NumericKind::Integer => number
            .parse::<i64>()
            .map(FieldValue::Integer)
            .map_err(|e| FilterError::parse(field, e.to_string())),
        NumericKind::Float => {
            let parsed = number
                .parse::<f64>()
                .map_err(|e| FilterError::parse(field, e.to_string()))?;
            if !parsed.is_finite() {
                return Err(FilterError::parse(field, "not a finite number"));
            }
            Ok(FieldValue::Float(parsed))
        }
    }
}
