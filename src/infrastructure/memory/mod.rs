//! Memory Layer - In-Memory State Management
//!
//! 进程内状态：按客户端 IP 的限流令牌桶

mod rate_limiter;

pub use rate_limiter::{RateLimiter, RateLimiterConfig};
