// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::engines::traits::FetchError;
use crate::utils::rate_limiter::Sleeper;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// 重试策略配置
///
/// 固定间隔重试，最后一次失败后不再等待
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// 最大尝试次数（包含第一次）
    pub max_attempts: u32,
    /// 两次尝试之间的等待时间
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::static_fetch()
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// 静态抓取的重试策略：最多5次，间隔5秒
    pub fn static_fetch() -> Self {
        Self::new(5, Duration::from_secs(5))
    }

    /// 浏览器启动的重试策略：最多5次，间隔2秒
    pub fn browser_launch() -> Self {
        Self::new(5, Duration::from_secs(2))
    }

    /// 第 `attempt` 次（从1开始）失败后是否还应该重试
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }
}

/// 按策略执行操作直到成功或次数耗尽
///
/// # 参数
///
/// * `policy` - 重试策略
/// * `sleeper` - 两次尝试之间的等待实现
/// * `target` - 日志与错误中使用的目标描述（通常是URL）
/// * `operation` - 接收当前尝试序号（从1开始）的操作
///
/// # 返回值
///
/// * `Ok(T)` - 某次尝试成功
/// * `Err(FetchError::Exhausted)` - 所有尝试都失败，携带最后一次的错误信息
pub async fn retry_with_policy<T, F, Fut>(
    policy: &RetryPolicy,
    sleeper: &dyn Sleeper,
    target: &str,
    mut operation: F,
) -> Result<T, FetchError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let mut attempt = 0;
    loop {
        attempt += 1;
        match operation(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) => {
                warn!("Attempt {} failed for {}: {}", attempt, target, e);
                if !e.is_retryable() || !policy.should_retry(attempt) {
                    return Err(FetchError::Exhausted {
                        url: target.to_string(),
                        attempts: attempt,
                        last_error: e.to_string(),
                    });
                }
                sleeper.sleep(policy.delay).await;
            }
        }
    }
}
