//! 环境完整性信号 - 基础设施层
//!
//! 答题过程中宿主环境可能观察到两类离开迹象：失去前台焦点、
//! 企图离开/刷新页面。这里把它们抽象成一条信号通道，
//! 引擎订阅接收端，宿主持有发布端。

use tokio::sync::mpsc;

/// 完整性信号
///
/// 两类信号都只是提示性的：不暂停倒计时，也不判定本次答题无效。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegritySignal {
    /// 失去前台焦点（切换标签页/窗口）
    FocusLost,
    /// 企图离开或刷新页面
    UnloadIntent,
}

impl IntegritySignal {
    pub fn describe(&self) -> &'static str {
        match self {
            IntegritySignal::FocusLost => "检测到切换页面/窗口",
            IntegritySignal::UnloadIntent => "检测到离开页面意图",
        }
    }
}

/// 信号发布端（宿主持有）
#[derive(Clone)]
pub struct SignalPublisher {
    tx: mpsc::Sender<IntegritySignal>,
}

/// 信号订阅端（引擎持有）
pub struct EnvironmentSignals {
    rx: mpsc::Receiver<IntegritySignal>,
}

/// 创建一对信号通道
pub fn signal_channel() -> (SignalPublisher, EnvironmentSignals) {
    let (tx, rx) = mpsc::channel(16);
    (SignalPublisher { tx }, EnvironmentSignals { rx })
}

impl SignalPublisher {
    /// 发布一个信号（引擎已结束时静默忽略）
    pub async fn publish(&self, signal: IntegritySignal) {
        let _ = self.tx.send(signal).await;
    }
}

impl EnvironmentSignals {
    /// 等待下一个信号；发布端全部丢弃后返回 None
    pub async fn next(&mut self) -> Option<IntegritySignal> {
        self.rx.recv().await
    }
}
