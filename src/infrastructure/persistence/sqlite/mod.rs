//! SQLite Persistence - 通用记录存储

mod database;
mod schema;
mod store;

pub use database::*;
pub use schema::{Record, TableSchema};
pub use store::SqliteStore;
