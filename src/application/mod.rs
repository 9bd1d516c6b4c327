//! 应用层
//!
//! 包含：
//! - ports: 六边形架构端口定义（记录存储错误、Token 校验）

pub mod ports;

pub use ports::{AuthError, Session, StoreError, TokenVerifier};
