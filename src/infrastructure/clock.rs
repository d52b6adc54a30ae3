//! 节拍时钟 - 基础设施层
//!
//! 答题引擎的倒计时以 1 秒节拍驱动。把节拍抽象成注入的能力，
//! 引擎的状态转移逻辑就能在测试中脱离真实时间运行。

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};

/// 节拍时钟能力
///
/// 职责：
/// - 暴露"等待下一个 1 秒节拍"的能力
/// - 不认识 Attempt / Assessment
/// - 不处理业务流程
#[async_trait]
pub trait Clock: Send {
    /// 等待下一个节拍
    async fn tick(&mut self);
}

/// 真实时间的 1 秒节拍时钟
pub struct IntervalClock {
    interval: Interval,
}

impl IntervalClock {
    /// 创建 1 秒节拍时钟
    ///
    /// 第一个节拍在 1 秒之后到达（tokio 的 interval 默认立即触发第一次，
    /// 这里用 interval_at 推迟，保证倒计时从满时限开始走）。
    pub fn one_second() -> Self {
        let period = Duration::from_secs(1);
        let mut interval = time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval }
    }
}

#[async_trait]
impl Clock for IntervalClock {
    async fn tick(&mut self) {
        self.interval.tick().await;
    }
}

/// 手动驱动的节拍时钟（测试用）
///
/// 由 [`ManualClockDriver`] 逐拍推进；驱动端被丢弃后时钟永久静止。
pub struct ManualClock {
    rx: mpsc::Receiver<()>,
}

/// 手动时钟的驱动端
#[derive(Clone)]
pub struct ManualClockDriver {
    tx: mpsc::Sender<()>,
}

impl ManualClock {
    /// 创建手动时钟，返回（驱动端, 时钟）
    pub fn new() -> (ManualClockDriver, ManualClock) {
        let (tx, rx) = mpsc::channel(64);
        (ManualClockDriver { tx }, ManualClock { rx })
    }
}

impl ManualClockDriver {
    /// 推进指定秒数
    pub async fn advance(&self, seconds: u32) {
        for _ in 0..seconds {
            // 引擎结束后接收端会被丢弃，此时静默忽略
            if self.tx.send(()).await.is_err() {
                break;
            }
        }
    }
}

#[async_trait]
impl Clock for ManualClock {
    async fn tick(&mut self) {
        if self.rx.recv().await.is_none() {
            // 驱动端已丢弃：时钟静止，永不再触发
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_interval_clock_first_tick_after_one_second() {
        let mut clock = IntervalClock::one_second();
        let started = Instant::now();
        clock.tick().await;
        assert_eq!(started.elapsed(), Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_manual_clock_delivers_exact_tick_count() {
        let (driver, mut clock) = ManualClock::new();
        driver.advance(3).await;
        for _ in 0..3 {
            clock.tick().await;
        }
        // 第四拍不应到达
        let pending = time::timeout(Duration::from_millis(20), clock.tick()).await;
        assert!(pending.is_err());
    }
}
