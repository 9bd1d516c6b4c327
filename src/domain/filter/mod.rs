//! Filter Context - 查询条件上下文
//!
//! 职责:
//! - 条件集合（字段 → 值，保持插入顺序）
//! - 类型化谓词（相等 / 范围）
//! - 范围字段注册与数值解析

mod condition;
mod errors;
mod predicate;

pub use condition::ConditionSet;
pub use errors::FilterError;
pub use predicate::{compile, Comparison, FieldValue, NumericKind, Predicate, RangeField};
