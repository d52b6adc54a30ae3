//! 答题引擎 - 流程层
//!
//! 核心职责：在单一时间线上驱动一次答题
//!
//! 事件来源（tokio::select! 三路合一）：
//! 1. 时钟节拍 → 倒计时递减，归零即超时提交
//! 2. 宿主指令 → 暂存选择 / 主动提交
//! 3. 环境信号 → 切屏/离开提示（只告警，不暂停、不判负）
//!
//! 下一题的倒计时一定在上一题的提交完全落账之后才开始：
//! 它们是同一条时间线上的先后步骤，不存在并发。

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::error::AppResult;
use crate::infrastructure::clock::Clock;
use crate::infrastructure::signals::{EnvironmentSignals, IntegritySignal};
use crate::models::assessment::Assessment;
use crate::services::scoring::{self, ScoreSummary};
use crate::workflow::attempt::{Attempt, AttemptStatus, CommitOutcome, TickOutcome};
use crate::workflow::attempt_ctx::AttemptCtx;

/// 剩余秒数降到该值时向宿主发一次提醒
const TIME_LOW_WARNING_SECONDS: u32 = 10;

/// 宿主发给引擎的指令
#[derive(Debug, Clone, Copy)]
pub enum AttemptCommand {
    /// 暂存当前题的选择
    SelectOption(usize),
    /// 主动提交当前题
    SubmitAnswer,
}

/// 供宿主渲染的答题状态快照
#[derive(Debug, Clone)]
pub struct AttemptSnapshot {
    pub status: AttemptStatus,
    pub section_index: usize,
    pub question_index: usize,
    pub time_remaining: u32,
    pub progress_percent: u32,
    /// 完成后才有值
    pub score: Option<u32>,
}

impl AttemptSnapshot {
    fn initial() -> Self {
        Self {
            status: AttemptStatus::NotStarted,
            section_index: 0,
            question_index: 0,
            time_remaining: 0,
            progress_percent: 0,
            score: None,
        }
    }
}

/// 引擎推送给宿主的事件
#[derive(Debug, Clone)]
pub enum AttemptEvent {
    /// 呈现一道新题（开始与每次推进时各一次）
    QuestionPresented {
        section_index: usize,
        question_index: usize,
        section_title: String,
        prompt: String,
        options: Vec<String>,
        time_limit: u32,
    },
    /// 当前题剩余时间不多了
    TimeLow { time_remaining: u32 },
    /// 环境完整性提示（不影响答题继续）
    IntegrityWarning { signal: IntegritySignal },
    /// 全部题目作答完毕
    Completed { score: u32 },
}

/// 宿主侧的引擎句柄
///
/// 对应宿主页面可用的三件事：发选择、发提交、观察状态。
#[derive(Clone)]
pub struct AttemptHandle {
    commands: mpsc::Sender<AttemptCommand>,
    snapshot_rx: watch::Receiver<AttemptSnapshot>,
}

impl AttemptHandle {
    /// 暂存当前题的选择（引擎已结束时静默忽略）
    pub async fn select_option(&self, index: usize) {
        let _ = self
            .commands
            .send(AttemptCommand::SelectOption(index))
            .await;
    }

    /// 主动提交当前题
    pub async fn submit_current_answer(&self) {
        let _ = self.commands.send(AttemptCommand::SubmitAnswer).await;
    }

    /// 当前状态快照
    pub fn snapshot(&self) -> AttemptSnapshot {
        self.snapshot_rx.borrow().clone()
    }

    /// 订阅状态变化
    pub fn watch(&self) -> watch::Receiver<AttemptSnapshot> {
        self.snapshot_rx.clone()
    }
}

/// 一次完成的答题的最终状态
#[derive(Debug)]
pub struct FinishedAttempt {
    pub answers: HashMap<String, usize>,
    pub timings: HashMap<String, u32>,
    pub score: ScoreSummary,
    pub started_at: DateTime<Utc>,
}

/// 答题引擎
///
/// 独占持有一次答题的可变状态；同一引擎实例只运行一次答题。
pub struct AttemptEngine {
    assessment: Arc<Assessment>,
    ctx: AttemptCtx,
    attempt: Attempt,
    clock: Box<dyn Clock>,
    signals: EnvironmentSignals,
    signals_closed: bool,
    commands: mpsc::Receiver<AttemptCommand>,
    commands_closed: bool,
    snapshot_tx: watch::Sender<AttemptSnapshot>,
    events: mpsc::Sender<AttemptEvent>,
    score: Option<ScoreSummary>,
}

impl AttemptEngine {
    /// 创建引擎，返回（引擎, 宿主句柄, 事件接收端）
    pub fn new(
        assessment: Arc<Assessment>,
        ctx: AttemptCtx,
        clock: Box<dyn Clock>,
        signals: EnvironmentSignals,
    ) -> (Self, AttemptHandle, mpsc::Receiver<AttemptEvent>) {
        let (command_tx, command_rx) = mpsc::channel(32);
        let (event_tx, event_rx) = mpsc::channel(32);
        let (snapshot_tx, snapshot_rx) = watch::channel(AttemptSnapshot::initial());

        let engine = Self {
            assessment,
            ctx,
            attempt: Attempt::new(),
            clock,
            signals,
            signals_closed: false,
            commands: command_rx,
            commands_closed: false,
            snapshot_tx,
            events: event_tx,
            score: None,
        };

        let handle = AttemptHandle {
            commands: command_tx,
            snapshot_rx,
        };

        (engine, handle, event_rx)
    }

    /// 运行一次答题直到完成
    ///
    /// 进入即执行开始转移；宿主中途放弃时直接丢弃/中止本任务即可，
    /// 未完成的状态不会产生任何写入。
    pub async fn run(mut self) -> AppResult<FinishedAttempt> {
        let started_at = Utc::now();
        self.attempt.start(&self.assessment, started_at)?;

        info!(
            "{} 🚀 答题开始: {} （共 {} 题）",
            self.ctx,
            self.assessment.title,
            self.assessment.total_questions()
        );

        self.emit_question_presented();
        self.publish_snapshot();

        loop {
            tokio::select! {
                _ = self.clock.tick() => {
                    self.on_tick();
                }
                cmd = self.commands.recv(), if !self.commands_closed => {
                    self.on_command(cmd);
                }
                sig = self.signals.next(), if !self.signals_closed => {
                    self.on_signal(sig);
                }
            }

            self.publish_snapshot();

            if self.attempt.status() == AttemptStatus::Completed {
                break;
            }
        }

        // 跳出循环即不再轮询时钟；得分已在完成转移中算好
        let score = self
            .score
            .unwrap_or_else(|| scoring::compute_score(&self.assessment, self.attempt.answers()));

        info!(
            "{} 🏁 答题结束: 得分 {}% （答对 {}/{} 题）",
            self.ctx, score.score, score.correct_count, score.total_questions
        );

        let (answers, timings) = self.attempt.into_maps();
        Ok(FinishedAttempt {
            answers,
            timings,
            score,
            started_at,
        })
    }

    /// 处理一个时钟节拍
    fn on_tick(&mut self) {
        match self.attempt.tick() {
            TickOutcome::TimedOut => {
                info!(
                    "{} ⏰ 第 {}/{} 题时间用尽，自动提交",
                    self.ctx,
                    self.attempt.section_index() + 1,
                    self.attempt.question_index() + 1
                );
                self.commit_current("超时");
            }
            TickOutcome::Running { time_remaining } => {
                if time_remaining == TIME_LOW_WARNING_SECONDS {
                    self.emit(AttemptEvent::TimeLow { time_remaining });
                }
            }
        }
    }

    /// 处理一条宿主指令
    fn on_command(&mut self, cmd: Option<AttemptCommand>) {
        match cmd {
            Some(AttemptCommand::SelectOption(index)) => {
                let assessment = Arc::clone(&self.assessment);
                match self.attempt.select_option(&assessment, index) {
                    Ok(()) => debug!("{} 已暂存选项 {}", self.ctx, index),
                    Err(e) => warn!("{} ⚠️ 忽略无效选择: {}", self.ctx, e),
                }
            }
            Some(AttemptCommand::SubmitAnswer) => {
                self.commit_current("主动提交");
            }
            None => {
                debug!("{} 指令通道已关闭，仅由倒计时驱动", self.ctx);
                self.commands_closed = true;
            }
        }
    }

    /// 处理一个环境信号（只告警，不改变答题状态）
    fn on_signal(&mut self, signal: Option<IntegritySignal>) {
        match signal {
            Some(signal) => {
                warn!(
                    "{} ⚠️ {}，离开页面可能导致测评被取消",
                    self.ctx,
                    signal.describe()
                );
                self.emit(AttemptEvent::IntegrityWarning { signal });
            }
            None => self.signals_closed = true,
        }
    }

    /// 提交当前题并按结果推进
    fn commit_current(&mut self, reason: &str) {
        let assessment = Arc::clone(&self.assessment);
        match self.attempt.commit(&assessment) {
            Ok(CommitOutcome::Advanced {
                section_index,
                question_index,
            }) => {
                debug!(
                    "{} ✓ 已提交（{}），推进到第 {}/{} 题",
                    self.ctx,
                    reason,
                    section_index + 1,
                    question_index + 1
                );
                self.emit_question_presented();
            }
            Ok(CommitOutcome::Completed) => {
                info!("{} ✅ 全部题目作答完毕（{}）", self.ctx, reason);
                // 完成转移：计分恰好一次，此后状态不再变化
                let score = scoring::compute_score(&self.assessment, self.attempt.answers());
                self.score = Some(score);
                self.emit(AttemptEvent::Completed { score: score.score });
            }
            Err(e) => {
                warn!("{} 提交当前题失败: {}", self.ctx, e);
            }
        }
    }

    /// 呈现当前题（开始与每次推进时调用）
    fn emit_question_presented(&mut self) {
        let assessment = Arc::clone(&self.assessment);
        let section_index = self.attempt.section_index();
        let question_index = self.attempt.question_index();

        if let (Some(section), Some(question)) = (
            assessment.section_at(section_index),
            assessment.question_at(section_index, question_index),
        ) {
            let time_limit = question.effective_time_limit(assessment.time_limit_seconds);
            self.emit(AttemptEvent::QuestionPresented {
                section_index,
                question_index,
                section_title: section.title.clone(),
                prompt: question.text.clone(),
                options: question.options.clone(),
                time_limit,
            });
        }
    }

    /// 推送事件（满/关闭时丢弃：事件只服务于渲染，不得阻塞倒计时）
    fn emit(&mut self, event: AttemptEvent) {
        if let Err(e) = self.events.try_send(event) {
            debug!("{} 事件未送达: {}", self.ctx, e);
        }
    }

    /// 发布状态快照
    fn publish_snapshot(&mut self) {
        let snapshot = AttemptSnapshot {
            status: self.attempt.status(),
            section_index: self.attempt.section_index(),
            question_index: self.attempt.question_index(),
            time_remaining: self.attempt.time_remaining(),
            progress_percent: self
                .attempt
                .progress_percent(self.assessment.total_questions()),
            score: self.score.map(|s| s.score),
        };
        let _ = self.snapshot_tx.send(snapshot);
    }
}
