//! Exchange Core - REST 后端服务核心
//!
//! 架构设计: Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Filter: 条件集合与范围后缀（`+` / `-`）谓词编译
//! - Pagination: 分页请求与结果
//!
//! 应用层 (application/):
//! - Ports: 存储错误、TokenVerifier
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: 中间件链（日志、限流、认证、监控）、路由、服务器生命周期
//! - Memory: 按客户端 IP 的令牌桶限流器
//! - Persistence: SQLite 通用记录存储
//! - Adapters: 认证服务、图片存储

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
