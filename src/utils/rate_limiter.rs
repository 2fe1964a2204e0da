// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::info;

/// 等待抽象
///
/// 生产环境使用tokio定时器，测试中记录等待时长而不真正休眠
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// 基于 `tokio::time::sleep` 的等待实现
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// 只记录等待时长的实现
#[derive(Debug, Default, Clone)]
pub struct RecordingSleeper {
    calls: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    /// 已记录的所有等待时长
    pub fn calls(&self) -> Vec<Duration> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    /// 等待总时长
    pub fn total(&self) -> Duration {
        self.calls().iter().sum()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        match self.calls.lock() {
            Ok(mut calls) => calls.push(duration),
            Err(poisoned) => poisoned.into_inner().push(duration),
        }
    }
}

/// 节奏控制器
#[async_trait]
pub trait Pacer: Send {
    /// 记录一个已处理单元，需要时暂停
    ///
    /// 返回本次是否发生了暂停
    async fn tick(&mut self) -> bool;
}

/// 固定间隔闸门
///
/// 每处理 `every` 个单元暂停 `pause`；`every` 为0时不暂停
pub struct FixedIntervalGate {
    every: usize,
    pause: Duration,
    processed: usize,
    unit: &'static str,
    sleeper: Arc<dyn Sleeper>,
}

impl FixedIntervalGate {
    pub fn new(every: usize, pause: Duration, sleeper: Arc<dyn Sleeper>) -> Self {
        Self {
            every,
            pause,
            processed: 0,
            unit: "items",
            sleeper,
        }
    }

    /// 设置日志中使用的单元名称（如 "sites"、"records"）
    pub fn with_unit(mut self, unit: &'static str) -> Self {
        self.unit = unit;
        self
    }

    /// 已处理的单元数
    pub fn processed(&self) -> usize {
        self.processed
    }

    pub fn is_enabled(&self) -> bool {
        self.every > 0
    }
}

#[async_trait]
impl Pacer for FixedIntervalGate {
    async fn tick(&mut self) -> bool {
        self.processed += 1;
        if !self.is_enabled() || self.processed % self.every != 0 {
            return false;
        }

        info!(
            "Reached {} {}. Taking a {}s break...",
            self.processed,
            self.unit,
            self.pause.as_secs()
        );
        self.sleeper.sleep(self.pause).await;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate(every: usize, sleeper: &RecordingSleeper) -> FixedIntervalGate {
        FixedIntervalGate::new(every, Duration::from_secs(20), Arc::new(sleeper.clone()))
    }

    #[tokio::test]
    async fn test_gate_pauses_every_n_units() {
        let sleeper = RecordingSleeper::default();
        let mut gate = gate(20, &sleeper);

        let mut pauses = Vec::new();
        for _ in 0..45 {
            if gate.tick().await {
                pauses.push(gate.processed());
            }
        }

        assert_eq!(pauses, vec![20, 40]);
        assert_eq!(sleeper.total(), Duration::from_secs(40));
    }

    #[tokio::test]
    async fn test_gate_below_threshold_never_pauses() {
        let sleeper = RecordingSleeper::default();
        let mut gate = gate(20, &sleeper);

        for _ in 0..19 {
            assert!(!gate.tick().await);
        }
        assert!(sleeper.calls().is_empty());
    }

    #[tokio::test]
    async fn test_disabled_gate() {
        let sleeper = RecordingSleeper::default();
        let mut gate = gate(0, &sleeper).with_unit("records");

        assert!(!gate.is_enabled());
        for _ in 0..100 {
            assert!(!gate.tick().await);
        }
        assert_eq!(gate.processed(), 100);
        assert!(sleeper.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_sleeper_advances_clock() {
        let start = tokio::time::Instant::now();
        TokioSleeper.sleep(Duration::from_secs(20)).await;
        assert!(start.elapsed() >= Duration::from_secs(20));
    }
}
