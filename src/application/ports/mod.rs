//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod store;
mod token_verifier;

pub use store::StoreError;
pub use token_verifier::{AuthError, Session, TokenVerifier};
