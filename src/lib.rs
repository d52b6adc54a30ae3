//! # Assessment Runner
//!
//! 招聘/培训门户的限时测评答题引擎
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源与环境能力，只暴露能力
//! - `ApiExecutor` - 唯一的 HTTP 客户端 owner，提供门户 API 调用能力
//! - `Clock` - 1 秒节拍能力（真实时间 / 手动驱动）
//! - `signals` - 完整性信号通道（切屏 / 离开页面）
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，每个服务只管一种能力
//! - `AssessmentLoader` - 取内容 → 校验 → 洗牌 → 只读模型
//! - `scoring` - 纯计分能力
//! - `ResultSubmitter` - 组装结果 → 持久化 → 记审计
//! - `ContentProvider` / `ResultSink` - 外部协作方接口
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一次答题"的完整状态与驱动
//! - `Attempt` - 带标签的答题状态值与纯转移函数
//! - `AttemptEngine` - 时钟节拍 / 宿主指令 / 环境信号三路驱动
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/session` - 应用会话，装配资源与终端宿主
//! - `orchestrator/attempt_runner` - 单次答题编排器
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::{signal_channel, IntegritySignal, IntervalClock, ManualClock};
pub use models::{Assessment, AttemptResult, Question, Section};
pub use orchestrator::{App, AttemptOutcome};
pub use services::{AssessmentLoader, ContentProvider, ResultSink, ResultSubmitter};
pub use workflow::{AttemptCtx, AttemptEngine, AttemptHandle, AttemptStatus, FinishedAttempt};
