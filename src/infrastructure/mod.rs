//! 基础设施层（Infrastructure）
//!
//! 持有稀缺资源与环境能力，只向上暴露能力：
//! - `ApiExecutor` - 唯一的 HTTP 客户端 owner，提供门户 API 调用能力
//! - `Clock` - 1 秒节拍能力（真实时间 / 手动驱动）
//! - `signals` - 完整性信号通道（宿主发布，引擎订阅）

pub mod api_executor;
pub mod clock;
pub mod signals;

pub use api_executor::ApiExecutor;
pub use clock::{Clock, IntervalClock, ManualClock, ManualClockDriver};
pub use signals::{signal_channel, EnvironmentSignals, IntegritySignal, SignalPublisher};
