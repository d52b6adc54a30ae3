//! 流程层（Workflow）
//!
//! 定义"一次答题"的完整状态与驱动方式：
//! - `attempt` - 答题状态值与纯转移函数
//! - `engine` - 在时钟节拍、宿主指令、环境信号之间驱动转移的引擎
//! - `attempt_ctx` - 答题身份上下文

pub mod attempt;
pub mod attempt_ctx;
pub mod engine;

pub use attempt::{Attempt, AttemptStatus, CommitOutcome, TickOutcome};
pub use attempt_ctx::AttemptCtx;
pub use engine::{
    AttemptCommand, AttemptEngine, AttemptEvent, AttemptHandle, AttemptSnapshot, FinishedAttempt,
};
