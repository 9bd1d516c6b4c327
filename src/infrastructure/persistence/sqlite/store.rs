//! SQLite Store - 通用记录存储
//!
//! 所有操作按记录类型泛型化，表结构来自 [`Record::schema`]。
//! 条件集合先编译为类型化谓词，再渲染为带绑定参数的 SQL。
//! 不做缓存和重试，数据库错误直接返回给调用方。

use serde_json::{Map, Value};
use sqlx::{QueryBuilder, Sqlite};

use super::schema::{quote_ident, Record, TableSchema};
use super::DbPool;
use crate::application::ports::StoreError;
use crate::domain::filter::compile;
use crate::domain::{
    Comparison, ConditionSet, FieldValue, FilterError, PageRequest, Paginated, Predicate,
    SortOrder,
};

/// SQLite 单条语句可绑定的参数上限
const MAX_BIND_VARIABLES: usize = 32766;

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            other => StoreError::DatabaseError(other.to_string()),
        }
    }
}

/// SQLite 通用记录存储
#[derive(Clone)]
pub struct SqliteStore {
    pool: DbPool,
}

impl SqliteStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// 检查数据库连接是否可用
    pub async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// 插入单条记录
    pub async fn insert<T: Record>(&self, record: &T) -> Result<(), StoreError> {
        let mut builder = insert_builder(std::slice::from_ref(record))?;
        builder.build().execute(&self.pool).await?;
        Ok(())
    }

    /// 分批插入，每批最多 `batch_size` 条，所有批次在同一事务中提交
    ///
    /// 每批的绑定参数不超过 SQLite 上限，`batch_size` 过大时按上限拆分
    pub async fn batch_insert<T: Record>(
        &self,
        records: &[T],
        batch_size: usize,
    ) -> Result<(), StoreError> {
        if batch_size == 0 {
            return Err(StoreError::InvalidBatchSize);
        }
        if records.is_empty() {
            return Ok(());
        }

        let rows_per_chunk = chunk_rows(batch_size, T::schema().columns.len());
        let mut tx = self.pool.begin().await?;
        for chunk in records.chunks(rows_per_chunk) {
            let mut builder = insert_builder(chunk)?;
            builder.build().execute(&mut *tx).await?;
        }
        tx.commit().await?;

        tracing::debug!(
            table = T::schema().table,
            count = records.len(),
            batch_size,
            rows_per_chunk,
            "Batch insert completed"
        );
        Ok(())
    }

    /// 按主键查找，不存在时返回 [`StoreError::NotFound`]
    pub async fn find_by_id<T: Record>(&self, id: &str) -> Result<T, StoreError> {
        let schema = T::schema();
        let mut builder = select_builder(schema);
        push_where(&mut builder, &[Predicate::equals(schema.id_column, id)]);

        let record = builder.build_query_as::<T>().fetch_one(&self.pool).await?;
        Ok(record)
    }

    /// 按单个字段查找第一条匹配记录，不存在时返回 `Ok(None)`
    pub async fn find_by_field<T: Record>(
        &self,
        field: &str,
        value: impl Into<FieldValue> + Send,
    ) -> Result<Option<T>, StoreError> {
        let schema = T::schema();
        ensure_column(schema, field)?;
        let order = order_clause(schema, None)?;

        let mut builder = select_builder(schema);
        push_where(&mut builder, &[Predicate::equals(field, value)]);
        if let Some(order) = order {
            builder.push(order);
        }
        builder.push(" LIMIT 1");

        let record = builder
            .build_query_as::<T>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(record)
    }

    /// 多个字段的相等条件（AND），不分页
    pub async fn find_by_fields<T: Record>(
        &self,
        conditions: &ConditionSet,
    ) -> Result<Vec<T>, StoreError> {
        let schema = T::schema();
        let predicates = compile(conditions, schema.columns, &[])?;
        let order = order_clause(schema, None)?;

        let mut builder = select_builder(schema);
        push_where(&mut builder, &predicates);
        if let Some(order) = order {
            builder.push(order);
        }

        let records = builder.build_query_as::<T>().fetch_all(&self.pool).await?;
        Ok(records)
    }

    /// 分页获取全部记录
    pub async fn find_all_paginated<T: Record>(
        &self,
        page: &PageRequest,
    ) -> Result<Paginated<T>, StoreError> {
        self.paginate(T::schema(), &[], page, None).await
    }

    /// 按单个字段分页查找
    pub async fn find_page_by_field<T: Record>(
        &self,
        field: &str,
        value: impl Into<FieldValue> + Send,
        page: &PageRequest,
        order: Option<&SortOrder>,
    ) -> Result<Paginated<T>, StoreError> {
        let schema = T::schema();
        ensure_column(schema, field)?;
        let predicates = [Predicate::equals(field, value)];
        self.paginate(schema, &predicates, page, order).await
    }

    /// 条件过滤 + 分页
    ///
    /// 已注册的范围字段支持 `"100-"`（`<=`）和 `"100+"`（`>=`）语法，
    /// 其余字段按相等匹配。`total_pages` 基于过滤后的全部记录数计算。
    pub async fn find_filtered_paginated<T: Record>(
        &self,
        conditions: &ConditionSet,
        page: &PageRequest,
        order: Option<&SortOrder>,
    ) -> Result<Paginated<T>, StoreError> {
        let schema = T::schema();
        let predicates = compile(conditions, schema.columns, schema.range_fields)?;
        self.paginate(schema, &predicates, page, order).await
    }

    /// 按主键部分更新，只写入 `changes` 中出现的列，返回受影响行数
    pub async fn update_by_id<T: Record>(
        &self,
        id: &str,
        changes: &Map<String, Value>,
    ) -> Result<u64, StoreError> {
        let schema = T::schema();
        if changes.is_empty() {
            return Ok(0);
        }

        let mut builder =
            QueryBuilder::<Sqlite>::new(format!("UPDATE {} SET ", quote_ident(schema.table)));
        for (i, (field, value)) in changes.iter().enumerate() {
            ensure_column(schema, field)?;
            if field == schema.id_column {
                return Err(StoreError::ImmutableField(field.clone()));
            }
            if i > 0 {
                builder.push(", ");
            }
            builder.push(quote_ident(field)).push(" = ");
            push_value(&mut builder, &FieldValue::from_json(field, value)?);
        }
        push_where(&mut builder, &[Predicate::equals(schema.id_column, id)]);

        let result = builder.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    /// 按主键删除，返回受影响行数
    pub async fn delete_by_id<T: Record>(&self, id: &str) -> Result<u64, StoreError> {
        let schema = T::schema();
        let mut builder =
            QueryBuilder::<Sqlite>::new(format!("DELETE FROM {}", quote_ident(schema.table)));
        push_where(&mut builder, &[Predicate::equals(schema.id_column, id)]);

        let result = builder.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn paginate<T: Record>(
        &self,
        schema: &'static TableSchema,
        predicates: &[Predicate],
        page: &PageRequest,
        order: Option<&SortOrder>,
    ) -> Result<Paginated<T>, StoreError> {
        let order = order_clause(schema, order)?;

        // 先统计过滤后的总数，再取当前页
        let mut count = QueryBuilder::<Sqlite>::new(format!(
            "SELECT COUNT(*) FROM {}",
            quote_ident(schema.table)
        ));
        push_where(&mut count, predicates);
        let total: i64 = count
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        let mut select = select_builder(schema);
        push_where(&mut select, predicates);
        if let Some(order) = order {
            select.push(order);
        }
        select
            .push(" LIMIT ")
            .push_bind(i64::try_from(page.limit()).unwrap_or(i64::MAX))
            .push(" OFFSET ")
            .push_bind(i64::try_from(page.offset()).unwrap_or(i64::MAX));

        let records = select.build_query_as::<T>().fetch_all(&self.pool).await?;

        tracing::debug!(
            table = schema.table,
            predicates = predicates.len(),
            page = page.page(),
            page_size = page.page_size(),
            total,
            "Paginated query completed"
        );

        Ok(Paginated::new(
            records,
            u64::try_from(total).unwrap_or_default(),
            page,
        ))
    }
}

fn ensure_column(schema: &TableSchema, field: &str) -> Result<(), StoreError> {
    if schema.has_column(field) {
        Ok(())
    } else {
        Err(FilterError::UnknownField(field.to_string()).into())
    }
}

/// 单条 INSERT 的行数，受绑定参数上限约束
fn chunk_rows(batch_size: usize, columns: usize) -> usize {
    batch_size.min(MAX_BIND_VARIABLES / columns.max(1)).max(1)
}

fn select_builder(schema: &TableSchema) -> QueryBuilder<'static, Sqlite> {
    QueryBuilder::new(format!(
        "SELECT {} FROM {}",
        schema.column_list(),
        quote_ident(schema.table)
    ))
}

fn insert_builder<T: Record>(records: &[T]) -> Result<QueryBuilder<'static, Sqlite>, StoreError> {
    let schema = T::schema();
    let mut builder = QueryBuilder::new(format!(
        "INSERT INTO {} ({}) VALUES ",
        quote_ident(schema.table),
        schema.column_list()
    ));

    for (row, record) in records.iter().enumerate() {
        let values = record.values();
        if values.len() != schema.columns.len() {
            return Err(StoreError::SchemaMismatch {
                table: schema.table,
                expected: schema.columns.len(),
                actual: values.len(),
            });
        }

        if row > 0 {
            builder.push(", ");
        }
        builder.push("(");
        for (i, value) in values.iter().enumerate() {
            if i > 0 {
                builder.push(", ");
            }
            push_value(&mut builder, value);
        }
        builder.push(")");
    }

    Ok(builder)
}

/// 显式排序优先，其次表的默认排序；有排序时追加主键保证分页稳定
fn order_clause(
    schema: &TableSchema,
    order: Option<&SortOrder>,
) -> Result<Option<String>, StoreError> {
    let (field, direction) = match order {
        Some(order) => {
            ensure_column(schema, &order.field)?;
            (order.field.as_str(), order.direction)
        }
        None => match schema.default_order {
            Some(default) => default,
            None => return Ok(None),
        },
    };

    let mut clause = format!(" ORDER BY {} {}", quote_ident(field), direction.as_sql());
    if field != schema.id_column {
        clause.push_str(&format!(", {} ASC", quote_ident(schema.id_column)));
    }
    Ok(Some(clause))
}

fn push_where(builder: &mut QueryBuilder<'_, Sqlite>, predicates: &[Predicate]) {
    for (i, predicate) in predicates.iter().enumerate() {
        builder.push(if i == 0 { " WHERE " } else { " AND " });
        builder.push(quote_ident(&predicate.field));

        if predicate.op == Comparison::Eq && predicate.value == FieldValue::Null {
            builder.push(" IS NULL");
            continue;
        }

        builder.push(predicate.op.as_sql());
        push_value(builder, &predicate.value);
    }
}

fn push_value(builder: &mut QueryBuilder<'_, Sqlite>, value: &FieldValue) {
    match value {
        FieldValue::Null => builder.push_bind(None::<String>),
        FieldValue::Bool(b) => builder.push_bind(*b),
        FieldValue::Integer(i) => builder.push_bind(*i),
        FieldValue::Float(f) => builder.push_bind(*f),
        FieldValue::Text(s) => builder.push_bind(s.clone()),
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RangeField, SortDirection};
    use crate::infrastructure::persistence::sqlite::{create_pool, ensure_tables, DatabaseConfig};
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
    struct Listing {
        id: String,
        brand: String,
        price: i64,
        pct_remaining: f64,
        in_stock: bool,
        notes: Option<String>,
    }

    static LISTING_SCHEMA: TableSchema = TableSchema {
        table: "listings",
        id_column: "id",
        columns: &["id", "brand", "price", "pct_remaining", "in_stock", "notes"],
        range_fields: &[
            RangeField::integer("price"),
            RangeField::float("pct_remaining"),
        ],
        default_order: Some(("id", SortDirection::Asc)),
        create_sql: r#"
            CREATE TABLE IF NOT EXISTS listings (
                id TEXT PRIMARY KEY,
                brand TEXT NOT NULL,
                price INTEGER NOT NULL,
                pct_remaining REAL NOT NULL,
                in_stock BOOLEAN NOT NULL,
                notes TEXT
            )
        "#,
    };

    impl Record for Listing {
        fn schema() -> &'static TableSchema {
            &LISTING_SCHEMA
        }

        fn values(&self) -> Vec<FieldValue> {
            vec![
                self.id.clone().into(),
                self.brand.clone().into(),
                self.price.into(),
                self.pct_remaining.into(),
                self.in_stock.into(),
                self.notes.clone().into(),
            ]
        }
    }

    fn listing(id: &str, brand: &str, price: i64, pct: f64, in_stock: bool) -> Listing {
        Listing {
            id: id.to_string(),
            brand: brand.to_string(),
            price,
            pct_remaining: pct,
            in_stock,
            notes: None,
        }
    }

    fn fixtures() -> Vec<Listing> {
        let mut gift = listing("2", "acme", 100, 0.5, true);
        gift.notes = Some("gift".to_string());
        vec![
            listing("1", "acme", 50, 0.9, true),
            gift,
            listing("3", "acme", 150, 0.25, false),
            listing("4", "globex", 100, 1.0, true),
            listing("5", "globex", 200, 0.75, true),
        ]
    }

    async fn seeded_store() -> SqliteStore {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        ensure_tables(&pool, &[&LISTING_SCHEMA]).await.unwrap();
        let store = SqliteStore::new(pool);
        store.batch_insert(&fixtures(), 2).await.unwrap();
        store
    }

    fn ids(records: &[Listing]) -> Vec<&str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    fn page(page: u32, size: u32) -> PageRequest {
        PageRequest::new(page, size).unwrap()
    }

    #[tokio::test]
    async fn test_ping() {
        let store = seeded_store().await;
        store.ping().await.unwrap();

        store.pool().close().await;
        assert!(store.ping().await.is_err());
    }

    #[tokio::test]
    async fn test_equality_conditions_match_all_fields() {
        let store = seeded_store().await;

        let conditions = ConditionSet::new().with("brand", "acme");
        let result: Paginated<Listing> = store
            .find_filtered_paginated(&conditions, &page(1, 10), None)
            .await
            .unwrap();
        assert_eq!(ids(&result.records), vec!["1", "2", "3"]);

        let conditions = ConditionSet::new()
            .with("brand", "acme")
            .with("in_stock", true);
        let result: Paginated<Listing> = store
            .find_filtered_paginated(&conditions, &page(1, 10), None)
            .await
            .unwrap();
        assert_eq!(ids(&result.records), vec!["1", "2"]);
        assert!(result
            .records
            .iter()
            .all(|r| r.brand == "acme" && r.in_stock));
    }

    #[tokio::test]
    async fn test_integer_range_conditions() {
        let store = seeded_store().await;

        let lte: Paginated<Listing> = store
            .find_filtered_paginated(
                &ConditionSet::new().with("price", "100-"),
                &page(1, 10),
                None,
            )
            .await
            .unwrap();
        assert_eq!(ids(&lte.records), vec!["1", "2", "4"]);
        assert!(lte.records.iter().all(|r| r.price <= 100));

        let gte: Paginated<Listing> = store
            .find_filtered_paginated(
                &ConditionSet::new().with("price", "100+"),
                &page(1, 10),
                None,
            )
            .await
            .unwrap();
        assert_eq!(ids(&gte.records), vec!["2", "3", "4", "5"]);
        assert!(gte.records.iter().all(|r| r.price >= 100));
    }

    #[tokio::test]
    async fn test_float_range_combined_with_equality() {
        let store = seeded_store().await;

        let conditions = ConditionSet::new()
            .with("pct_remaining", "0.5+")
            .with("brand", "globex");
        let result: Paginated<Listing> = store
            .find_filtered_paginated(&conditions, &page(1, 10), None)
            .await
            .unwrap();
        assert_eq!(ids(&result.records), vec!["4", "5"]);
    }

    #[tokio::test]
    async fn test_total_pages_counts_whole_filtered_set() {
        let store = seeded_store().await;
        let conditions = ConditionSet::new().with("brand", "acme");
        let order = SortOrder::desc("price");

        let first: Paginated<Listing> = store
            .find_filtered_paginated(&conditions, &page(1, 2), Some(&order))
            .await
            .unwrap();
        assert_eq!(ids(&first.records), vec!["3", "2"]);
        assert_eq!(first.total_records, 3);
        assert_eq!(first.total_pages, 2);

        let second: Paginated<Listing> = store
            .find_filtered_paginated(&conditions, &page(2, 2), Some(&order))
            .await
            .unwrap();
        assert_eq!(ids(&second.records), vec!["1"]);
        assert_eq!(second.total_pages, 2);

        let beyond: Paginated<Listing> = store
            .find_filtered_paginated(&conditions, &page(5, 2), Some(&order))
            .await
            .unwrap();
        assert!(beyond.records.is_empty());
        assert_eq!(beyond.total_records, 3);
    }

    #[tokio::test]
    async fn test_invalid_range_value_is_reported() {
        let store = seeded_store().await;

        let err = store
            .find_filtered_paginated::<Listing>(
                &ConditionSet::new().with("price", "cheap-"),
                &page(1, 10),
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Filter(FilterError::Parse { .. })));
        assert!(err.is_validation());

        let err = store
            .find_filtered_paginated::<Listing>(
                &ConditionSet::new().with("price", 100),
                &page(1, 10),
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Filter(FilterError::ValueType { .. })));
    }

    #[tokio::test]
    async fn test_unknown_fields_rejected() {
        let store = seeded_store().await;

        let err = store
            .find_filtered_paginated::<Listing>(
                &ConditionSet::new().with("owner", "x"),
                &page(1, 10),
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Filter(FilterError::UnknownField(_))));

        let order = SortOrder::asc("price; DROP TABLE listings");
        let err = store
            .find_filtered_paginated::<Listing>(&ConditionSet::new(), &page(1, 10), Some(&order))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Filter(FilterError::UnknownField(_))));
    }

    #[tokio::test]
    async fn test_null_equality() {
        let store = seeded_store().await;
        let records: Vec<Listing> = store
            .find_by_fields(&ConditionSet::new().with("notes", Value::Null))
            .await
            .unwrap();
        assert_eq!(ids(&records), vec!["1", "3", "4", "5"]);
    }

    #[tokio::test]
    async fn test_find_all_paginated() {
        let store = seeded_store().await;
        let result: Paginated<Listing> = store.find_all_paginated(&page(2, 2)).await.unwrap();
        assert_eq!(ids(&result.records), vec!["3", "4"]);
        assert_eq!(result.total_records, 5);
        assert_eq!(result.total_pages, 3);
    }

    #[tokio::test]
    async fn test_find_by_id() {
        let store = seeded_store().await;

        let found: Listing = store.find_by_id("4").await.unwrap();
        assert_eq!(found.brand, "globex");

        let missing = store.find_by_id::<Listing>("404").await.unwrap_err();
        assert!(missing.is_not_found());
    }

    #[tokio::test]
    async fn test_find_by_field_distinguishes_not_found() {
        let store = seeded_store().await;

        let found: Option<Listing> = store.find_by_field("brand", "globex").await.unwrap();
        assert_eq!(found.map(|r| r.id), Some("4".to_string()));

        let missing: Option<Listing> = store.find_by_field("brand", "initech").await.unwrap();
        assert!(missing.is_none());

        let err = store
            .find_by_field::<Listing>("missing_column", "x")
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_find_by_fields_is_equality_only() {
        let store = seeded_store().await;

        let records: Vec<Listing> = store
            .find_by_fields(&ConditionSet::new().with("brand", "acme").with("price", 100))
            .await
            .unwrap();
        assert_eq!(ids(&records), vec!["2"]);
    }

    #[tokio::test]
    async fn test_find_page_by_field() {
        let store = seeded_store().await;
        let result: Paginated<Listing> = store
            .find_page_by_field("in_stock", true, &page(1, 3), Some(&SortOrder::desc("price")))
            .await
            .unwrap();
        assert_eq!(ids(&result.records), vec!["5", "2", "4"]);
        assert_eq!(result.total_records, 4);
        assert_eq!(result.total_pages, 2);
    }

    #[tokio::test]
    async fn test_insert_and_batch_size_validation() {
        let store = seeded_store().await;

        store
            .insert(&listing("6", "initech", 10, 0.1, false))
            .await
            .unwrap();
        let found: Listing = store.find_by_id("6").await.unwrap();
        assert_eq!(found.price, 10);

        let err = store
            .batch_insert(&[listing("7", "a", 1, 0.1, true)], 0)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidBatchSize));

        // 主键冲突作为数据库错误返回
        let err = store
            .insert(&listing("1", "dup", 1, 0.1, true))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DatabaseError(_)));
    }

    #[tokio::test]
    async fn test_batch_insert_is_atomic() {
        let store = seeded_store().await;
        let batch = vec![
            listing("10", "a", 1, 0.1, true),
            listing("11", "a", 1, 0.1, true),
            listing("1", "dup", 1, 0.1, true),
        ];
        assert!(store.batch_insert(&batch, 2).await.is_err());

        let missing: Option<Listing> = store.find_by_field("id", "10").await.unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_chunk_rows_respects_bind_limit() {
        assert_eq!(chunk_rows(2, 6), 2);
        assert_eq!(chunk_rows(20_000, 6), 5461);
        assert_eq!(chunk_rows(100_000, 1), MAX_BIND_VARIABLES);
        assert_eq!(chunk_rows(1, 40_000), 1);
    }

    #[tokio::test]
    async fn test_batch_insert_larger_than_bind_limit() {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        ensure_tables(&pool, &[&LISTING_SCHEMA]).await.unwrap();
        let store = SqliteStore::new(pool);

        // 20000 行 × 6 列远超单条语句的参数上限
        let records: Vec<Listing> = (0..20_000)
            .map(|i| listing(&format!("bulk-{}", i), "bulk", i, 0.5, true))
            .collect();
        store.batch_insert(&records, 20_000).await.unwrap();

        let result: Paginated<Listing> = store.find_all_paginated(&page(1, 10)).await.unwrap();
        assert_eq!(result.total_records, 20_000);
    }

    #[tokio::test]
    async fn test_update_by_id_merges_fields() {
        let store = seeded_store().await;

        let changes = json!({"price": 75, "notes": "reduced"});
        let changes = changes.as_object().unwrap();
        let affected = store.update_by_id::<Listing>("1", changes).await.unwrap();
        assert_eq!(affected, 1);

        let updated: Listing = store.find_by_id("1").await.unwrap();
        assert_eq!(updated.price, 75);
        assert_eq!(updated.notes.as_deref(), Some("reduced"));
        assert_eq!(updated.brand, "acme");
        assert_eq!(updated.pct_remaining, 0.9);

        let empty = Map::new();
        assert_eq!(store.update_by_id::<Listing>("1", &empty).await.unwrap(), 0);

        let id_change = json!({"id": "99"});
        let err = store
            .update_by_id::<Listing>("1", id_change.as_object().unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ImmutableField(_)));
    }

    #[tokio::test]
    async fn test_delete_by_id() {
        let store = seeded_store().await;

        assert_eq!(store.delete_by_id::<Listing>("3").await.unwrap(), 1);
        assert_eq!(store.delete_by_id::<Listing>("3").await.unwrap(), 0);
        assert!(store.find_by_id::<Listing>("3").await.unwrap_err().is_not_found());
    }
}
