//! In-Memory Rate Limiter
//!
//! 按客户端 IP 的令牌桶限流。所有客户端状态放在同一把互斥锁下，
//! 请求路径和后台清理任务共用这把锁；锁只在检查令牌期间持有，
//! 不会跨越对下一个中间件的调用。

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::config::RateLimitConfig;

/// 限流器配置
#[derive(Debug, Clone, Copy)]
pub struct RateLimiterConfig {
    /// 令牌桶容量
    pub burst_size: u32,
    /// 每秒补充令牌数
    pub refill_per_second: f64,
    /// 后台清理间隔
    pub sweep_interval: Duration,
    /// 闲置超过该时长的客户端会被清理
    pub idle_timeout: Duration,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            burst_size: 6,
            refill_per_second: 3.0,
            sweep_interval: Duration::from_secs(60),
            idle_timeout: Duration::from_secs(5 * 60),
        }
    }
}

impl From<&RateLimitConfig> for RateLimiterConfig {
    fn from(config: &RateLimitConfig) -> Self {
        Self {
            burst_size: config.burst_size,
            refill_per_second: config.refill_per_second,
            sweep_interval: Duration::from_secs(config.sweep_interval_secs),
            idle_timeout: Duration::from_secs(config.idle_timeout_secs),
        }
    }
}

#[derive(Debug, Clone)]
struct TokenBucket {
    tokens: f64,
    last_refill: Instant,
}

impl TokenBucket {
    fn full(capacity: u32, now: Instant) -> Self {
        Self {
            tokens: f64::from(capacity),
            last_refill: now,
        }
    }

    /// 按经过的时间补充令牌，再尝试取走一个
    fn try_acquire(&mut self, now: Instant, capacity: u32, refill_per_second: f64) -> bool {
        let capacity = f64::from(capacity);
        let elapsed = now.saturating_duration_since(self.last_refill);
        self.tokens = (self.tokens + elapsed.as_secs_f64() * refill_per_second).min(capacity);
        self.last_refill = now;

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

#[derive(Debug)]
struct ClientEntry {
    bucket: TokenBucket,
    last_seen: Instant,
}

/// 按客户端 IP 的令牌桶限流器
pub struct RateLimiter {
    config: RateLimiterConfig,
    clients: Mutex<HashMap<IpAddr, ClientEntry>>,
}

impl RateLimiter {
    pub fn new(config: RateLimiterConfig) -> Self {
        Self {
            config,
            clients: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &RateLimiterConfig {
        &self.config
    }

    /// 记录一次请求，返回是否放行
    ///
    /// 首次出现的客户端按满桶创建
    pub fn check(&self, client: IpAddr) -> bool {
        let now = Instant::now();
        let mut clients = self.lock();

        let entry = clients.entry(client).or_insert_with(|| ClientEntry {
            bucket: TokenBucket::full(self.config.burst_size, now),
            last_seen: now,
        });
        entry.last_seen = now;
        entry
            .bucket
            .try_acquire(now, self.config.burst_size, self.config.refill_per_second)
    }

    /// 移除闲置超时的客户端，返回移除数量
    pub fn sweep(&self) -> usize {
        let now = Instant::now();
        let idle_timeout = self.config.idle_timeout;
        let mut clients = self.lock();

        let before = clients.len();
        clients.retain(|_, entry| now.saturating_duration_since(entry.last_seen) <= idle_timeout);
        before - clients.len()
    }

    /// 当前跟踪的客户端数量
    pub fn client_count(&self) -> usize {
        self.lock().len()
    }

    pub fn is_tracking(&self, client: IpAddr) -> bool {
        self.lock().contains_key(&client)
    }

    /// 启动后台清理任务，`cancel` 触发后退出
    pub fn spawn_sweeper(self: &Arc<Self>, cancel: CancellationToken) -> JoinHandle<()> {
        let limiter = Arc::clone(self);

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(limiter.config.sweep_interval);
            // 第一次 tick 立即完成，跳过
            interval.tick().await;

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        tracing::debug!("Rate limiter sweeper stopped");
                        break;
                    }
                    _ = interval.tick() => {
                        let removed = limiter.sweep();
                        if removed > 0 {
                            tracing::debug!(
                                removed,
                                remaining = limiter.client_count(),
                                "Evicted idle rate limit clients"
                            );
                        }
                    }
                }
            }
        })
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<IpAddr, ClientEntry>> {
        // 持锁期间不会 panic，中毒时直接沿用内部数据
        self.clients.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RateLimiterConfig::default())
    }
}
