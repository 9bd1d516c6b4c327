//! Domain Layer - 领域层
//!
//! - Filter Context: 条件集合与类型化谓词
//! - Pagination: 分页请求与结果

pub mod filter;
mod pagination;

pub use filter::{
    Comparison, ConditionSet, FieldValue, FilterError, NumericKind, Predicate, RangeField,
};
pub use pagination::{
    total_pages, PageError, PageRequest, Paginated, SortDirection, SortOrder,
};
