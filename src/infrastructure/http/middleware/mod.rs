//! HTTP Middleware
//!
//! 请求依次经过：日志 → 限流 →（受保护路由）认证 →（非 local 层级）监控 → 路由分发

mod auth;
mod logging;
mod monitoring;
mod rate_limit;

pub use auth::{auth_middleware, bearer_token};
pub use logging::{logging_middleware, LocalAddr};
pub use monitoring::{monitoring_middleware, Monitor, MonitorError};
pub use rate_limit::rate_limit_middleware;
