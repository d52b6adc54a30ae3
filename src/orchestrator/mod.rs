//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责装配与流程调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `session` - 应用会话
//! - 管理应用生命周期（初始化、运行、收尾）
//! - 按配置装配内容提供方与结果接收方（门户 / 本地模式）
//! - 把终端接成答题宿主（输入、渲染、离开确认）
//!
//! ### `attempt_runner` - 单次答题编排器
//! - 加载测评（失败即阻断）
//! - 启动答题引擎任务
//! - 成绩展示、结果提交、统计输出
//!
//! ## 层次关系
//!
//! ```text
//! session (装配资源，驱动一次会话)
//!     ↓
//! attempt_runner (编排一次答题)
//!     ↓
//! workflow::AttemptEngine (驱动状态机)
//!     ↓
//! services (能力层：loader / scoring / submitter)
//!     ↓
//! infrastructure (基础设施：ApiExecutor / Clock / signals)
//! ```
//!
//! ## 设计原则
//!
//! 1. **单一职责**：session 管装配与宿主，attempt_runner 管单次答题
//! 2. **资源隔离**：只有编排层持有提供方、接收方与信号发布端
//! 3. **向下依赖**：编排层 → workflow → services → infrastructure
//! 4. **无业务逻辑**：只做调度和统计，状态转移全部在 workflow 内

pub mod attempt_runner;
pub mod session;

// 重新导出主要类型
pub use attempt_runner::{AttemptOutcome, RunningAttempt};
pub use session::App;
