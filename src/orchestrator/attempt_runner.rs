//! 单次答题编排器 - 编排层
//!
//! ## 职责
//!
//! 本模块负责一次答题的完整编排，是答题级别的编排器。
//!
//! ## 核心功能
//!
//! 1. **加载测评**：委托 AssessmentLoader，失败即阻断（不可开始）
//! 2. **答题须知**：开始前向候选人展示规则
//! 3. **启动引擎**：把引擎挂到独立任务上，交还句柄与事件流
//! 4. **收尾提交**：成绩展示（不依赖持久化成败）→ 结果提交 → 统计输出

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::AppResult;
use crate::infrastructure::clock::Clock;
use crate::infrastructure::signals::EnvironmentSignals;
use crate::models::assessment::Assessment;
use crate::models::result::AttemptResult;
use crate::services::assessment_loader::AssessmentLoader;
use crate::services::content_provider::ContentProvider;
use crate::services::result_sink::ResultSink;
use crate::services::result_submitter::ResultSubmitter;
use crate::services::scoring::ScoreSummary;
use crate::utils::logging;
use crate::workflow::attempt_ctx::AttemptCtx;
use crate::workflow::engine::{AttemptEngine, AttemptEvent, AttemptHandle, FinishedAttempt};

/// 一次答题的最终结局
#[derive(Debug)]
pub struct AttemptOutcome {
    pub score: ScoreSummary,
    pub passed: bool,
    /// 成功持久化的结果记录；写入失败时为 None（成绩仍然有效）
    pub result: Option<AttemptResult>,
    pub answered: usize,
    pub unanswered: usize,
}

impl AttemptOutcome {
    pub fn persisted(&self) -> bool {
        self.result.is_some()
    }
}

/// 正在运行的答题
pub struct RunningAttempt {
    pub handle: AttemptHandle,
    pub events: mpsc::Receiver<AttemptEvent>,
    pub task: JoinHandle<AppResult<FinishedAttempt>>,
}

/// 加载测评内容
///
/// 加载是全有或全无的：任何失败都阻断开始，只能返回门户。
pub async fn prepare_assessment(
    provider: Arc<dyn ContentProvider>,
    assessment_id: &str,
    config: &Config,
) -> AppResult<Assessment> {
    info!("\n📁 正在加载测评内容: {} ...", assessment_id);

    let loader = AssessmentLoader::new(provider);
    match loader.load(assessment_id, config.shuffle_seed).await {
        Ok(assessment) => Ok(assessment),
        Err(e) => {
            error!("❌ 测评内容不可用: {}", e);
            error!("本次测评无法开始，请返回门户或联系管理员");
            Err(e)
        }
    }
}

/// 启动答题引擎
///
/// 引擎在独立任务上运行；宿主通过句柄发指令、通过事件流渲染。
/// 中途放弃 = 中止该任务，不会产生任何写入。
pub fn start_attempt(
    assessment: Arc<Assessment>,
    ctx: AttemptCtx,
    clock: Box<dyn Clock>,
    signals: EnvironmentSignals,
) -> RunningAttempt {
    let (engine, handle, events) = AttemptEngine::new(assessment, ctx, clock, signals);
    let task = tokio::spawn(engine.run());

    RunningAttempt {
        handle,
        events,
        task,
    }
}

/// 收尾一次完成的答题
///
/// 成绩先展示再提交：持久化失败只降级为警告，绝不隐藏已算出的成绩。
pub async fn complete_attempt(
    finished: FinishedAttempt,
    ctx: &AttemptCtx,
    sink: Arc<dyn ResultSink>,
    config: &Config,
) -> Result<AttemptOutcome> {
    log_score(&finished.score, config.pass_threshold);

    let answered = finished.answers.len();
    let unanswered = finished.score.total_questions.saturating_sub(answered);

    info!("📤 正在提交测评结果...");
    let submitter = ResultSubmitter::new(sink);
    let result = match submitter
        .submit(
            &ctx.candidate_id,
            &ctx.assessment_id,
            finished.answers,
            finished.timings,
            &finished.score,
            finished.started_at,
        )
        .await
    {
        Ok(result) => Some(result),
        Err(e) => {
            warn!("⚠️ 测评结果可能未被记录: {}", e);
            warn!("💡 成绩以上方本地计算为准，如有疑问请联系管理员");
            None
        }
    };

    log_attempt_stats(ctx, answered, unanswered);

    Ok(AttemptOutcome {
        passed: finished.score.passed(config.pass_threshold),
        score: finished.score,
        result,
        answered,
        unanswered,
    })
}

/// 展示答题须知
pub fn log_instructions(assessment: &Assessment, config: &Config) {
    info!("\n{}", "=".repeat(60));
    info!("📋 测评须知: {}", assessment.title);
    if !assessment.description.is_empty() {
        info!("{}", logging::truncate_text(&assessment.description, 200));
    }
    info!(
        "• 共 {} 个章节、{} 道题目",
        assessment.sections.len(),
        assessment.total_questions()
    );
    info!(
        "• 每题默认时限 {} 秒，倒计时结束自动提交当前题",
        assessment.time_limit_seconds
    );
    info!("• 题目只能向前作答，提交后不可回看");
    info!("• 答题期间请勿切换页面或离开，否则可能被取消资格");
    info!("• 及格线: {}%", config.pass_threshold);
    info!("{}", "=".repeat(60));
}

// ========== 日志辅助函数 ==========

fn log_score(score: &ScoreSummary, pass_threshold: u32) {
    info!("\n{}", "=".repeat(60));
    info!("📊 测评成绩");
    info!(
        "得分: {}% （答对 {}/{} 题）",
        score.score, score.correct_count, score.total_questions
    );
    if score.passed(pass_threshold) {
        info!("✅ 通过（及格线 {}%）", pass_threshold);
    } else {
        info!("❌ 未通过（及格线 {}%）", pass_threshold);
    }
    info!("{}", "=".repeat(60));
}

fn log_attempt_stats(ctx: &AttemptCtx, answered: usize, unanswered: usize) {
    info!(
        "{} 作答统计: 已作答 {}, 未作答 {}",
        ctx, answered, unanswered
    );
}
