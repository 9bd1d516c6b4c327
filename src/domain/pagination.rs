//! Pagination - 分页请求与分页结果

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageError {
    #[error("page must be >= 1")]
    InvalidPage,

    #[error("page size must be >= 1")]
    InvalidPageSize,
}

/// 分页请求，`page` 从 1 开始
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPageRequest", rename_all = "camelCase")]
pub struct PageRequest {
    page: u32,
    page_size: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPageRequest {
    #[serde(default = "default_page")]
    page: u32,
    #[serde(default = "default_page_size")]
    page_size: u32,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    20
}

impl TryFrom<RawPageRequest> for PageRequest {
    type Error = PageError;

    fn try_from(raw: RawPageRequest) -> Result<Self, Self::Error> {
        PageRequest::new(raw.page, raw.page_size)
    }
}

impl PageRequest {
    pub fn new(page: u32, page_size: u32) -> Result<Self, PageError> {
        if page == 0 {
            return Err(PageError::InvalidPage);
        }
        if page_size == 0 {
            return Err(PageError::InvalidPageSize);
        }
        Ok(Self { page, page_size })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// `(page - 1) * page_size`
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.page_size)
    }

    pub fn limit(&self) -> u64 {
        u64::from(self.page_size)
    }
}

/// 排序方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// 显式排序，字段名在执行查询前按表结构校验
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOrder {
    pub field: String,
    pub direction: SortDirection,
}

impl SortOrder {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }

    /// 解析 `"price"`、`"price asc"`、`"price desc"` 形式的排序参数
    pub fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.split_whitespace();
        let field = parts.next()?;
        let direction = match parts.next().map(str::to_ascii_lowercase).as_deref() {
            None | Some("asc") => SortDirection::Asc,
            Some("desc") => SortDirection::Desc,
            Some(_) => return None,
        };
        if parts.next().is_some() {
            return None;
        }
        Some(Self {
            field: field.to_string(),
            direction,
        })
    }
}

/// 分页结果
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub records: Vec<T>,
    pub total_records: u64,
    pub total_pages: u64,
}

impl<T> Paginated<T> {
    pub fn new(records: Vec<T>, total_records: u64, page: &PageRequest) -> Self {
        Self {
            records,
            total_records,
            total_pages: total_pages(total_records, page.page_size()),
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            records: self.records.into_iter().map(f).collect(),
            total_records: self.total_records,
            total_pages: self.total_pages,
        }
    }
}

/// `ceil(total_records / page_size)`
pub fn total_pages(total_records: u64, page_size: u32) -> u64 {
    total_records.div_ceil(u64::from(page_size.max(1)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset() {
        assert_eq!(PageRequest::new(1, 10).unwrap().offset(), 0);
        assert_eq!(PageRequest::new(3, 10).unwrap().offset(), 20);
        assert_eq!(PageRequest::new(2, 7).unwrap().limit(), 7);
    }

    #[test]
    fn test_rejects_zero_values() {
        assert_eq!(PageRequest::new(0, 10), Err(PageError::InvalidPage));
        assert_eq!(PageRequest::new(1, 0), Err(PageError::InvalidPageSize));
    }

    #[test]
    fn test_total_pages_is_ceiling() {
        for page_size in 1..=12u32 {
            for total in 0..=50u64 {
                let expected = (total + u64::from(page_size) - 1) / u64::from(page_size);
                assert_eq!(total_pages(total, page_size), expected);
            }
        }
        assert_eq!(total_pages(0, 5), 0);
        assert_eq!(total_pages(10, 5), 2);
        assert_eq!(total_pages(11, 5), 3);
    }

    #[test]
    fn test_sort_order_parse() {
        assert_eq!(SortOrder::parse("price"), Some(SortOrder::asc("price")));
        assert_eq!(SortOrder::parse("price DESC"), Some(SortOrder::desc("price")));
        assert_eq!(SortOrder::parse(""), None);
        assert_eq!(SortOrder::parse("price sideways"), None);
        assert_eq!(SortOrder::parse("price desc; drop"), None);
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let page: PageRequest = serde_json::from_str(r#"{"page": 2}"#).unwrap();
        assert_eq!(page.page(), 2);
        assert_eq!(page.page_size(), 20);

        let err = serde_json::from_str::<PageRequest>(r#"{"page": 0, "pageSize": 5}"#);
        assert!(err.is_err());
    }
}
