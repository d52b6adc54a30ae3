//! 答题状态值 - 流程层
//!
//! 一次答题的全部可变状态收在一个带标签的值里，
//! 由显式的转移函数推进：`start` → (`select_option` | `tick` | `commit`)* → 完成。
//! 转移函数是纯逻辑，不依赖真实时钟，属性可直接在单元测试中验证。
//!
//! 游标只会向前：一道题一旦提交（主动或超时），永远不会回到它。

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::error::{AppError, AppResult, EngineError};
use crate::models::assessment::Assessment;

/// 答题状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptStatus {
    NotStarted,
    InProgress,
    Completed,
}

impl AttemptStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttemptStatus::NotStarted => "not_started",
            AttemptStatus::InProgress => "in_progress",
            AttemptStatus::Completed => "completed",
        }
    }
}

/// 一次提交（主动或超时）之后游标的去向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// 推进到下一题
    Advanced {
        section_index: usize,
        question_index: usize,
    },
    /// 所有题目作答完毕
    Completed,
}

/// 一个节拍之后倒计时的状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// 倒计时继续
    Running { time_remaining: u32 },
    /// 时间用尽，当前题必须提交
    TimedOut,
}

/// 一次答题的运行时状态
///
/// 仅存在于内存中；完成后由结果提交服务落库，中途放弃则直接丢弃。
#[derive(Debug, Clone)]
pub struct Attempt {
    status: AttemptStatus,
    section_index: usize,
    question_index: usize,
    /// 当前题暂存的选择（提交前可反复覆盖）
    pending_selection: Option<usize>,
    /// 题目ID → 已提交的选项索引
    answers: HashMap<String, usize>,
    /// 题目ID → 该题用时（秒）
    timings: HashMap<String, u32>,
    started_at: Option<DateTime<Utc>>,
    /// 当前题剩余秒数
    time_remaining: u32,
}

impl Attempt {
    /// 创建一次未开始的答题
    pub fn new() -> Self {
        Self {
            status: AttemptStatus::NotStarted,
            section_index: 0,
            question_index: 0,
            pending_selection: None,
            answers: HashMap::new(),
            timings: HashMap::new(),
            started_at: None,
            time_remaining: 0,
        }
    }

    /// 开始答题：游标落在第一章第一题，倒计时装满该题的有效时限
    pub fn start(
        &mut self,
        assessment: &Assessment,
        started_at: DateTime<Utc>,
    ) -> AppResult<()> {
        if self.status != AttemptStatus::NotStarted {
            return Err(AppError::Engine(EngineError::InvalidTransition {
                action: "start",
                state: self.status.as_str(),
            }));
        }

        let first = assessment.question_at(0, 0).ok_or(AppError::Engine(
            EngineError::CursorOutOfRange {
                section_index: 0,
                question_index: 0,
            },
        ))?;

        self.status = AttemptStatus::InProgress;
        self.section_index = 0;
        self.question_index = 0;
        self.time_remaining = first.effective_time_limit(assessment.time_limit_seconds);
        self.started_at = Some(started_at);

        Ok(())
    }

    /// 暂存当前题的选择（覆盖之前的暂存）
    pub fn select_option(&mut self, assessment: &Assessment, index: usize) -> AppResult<()> {
        if self.status != AttemptStatus::InProgress {
            return Err(AppError::Engine(EngineError::InvalidTransition {
                action: "select_option",
                state: self.status.as_str(),
            }));
        }

        let question = assessment
            .question_at(self.section_index, self.question_index)
            .ok_or(AppError::Engine(EngineError::CursorOutOfRange {
                section_index: self.section_index,
                question_index: self.question_index,
            }))?;

        if index >= question.options.len() {
            return Err(AppError::Engine(EngineError::OptionOutOfRange {
                index,
                option_count: question.options.len(),
            }));
        }

        self.pending_selection = Some(index);
        Ok(())
    }

    /// 消耗一个 1 秒节拍
    pub fn tick(&mut self) -> TickOutcome {
        if self.status != AttemptStatus::InProgress {
            return TickOutcome::Running {
                time_remaining: self.time_remaining,
            };
        }

        self.time_remaining = self.time_remaining.saturating_sub(1);
        if self.time_remaining == 0 {
            TickOutcome::TimedOut
        } else {
            TickOutcome::Running {
                time_remaining: self.time_remaining,
            }
        }
    }

    /// 提交当前题（主动提交与超时共用同一条转移）
    ///
    /// 写入用时（所有被呈现过的题都有用时条目）；有暂存选择时写入作答；
    /// 然后推进游标：本章下一题 → 下一章第一题 → 完成。
    pub fn commit(&mut self, assessment: &Assessment) -> AppResult<CommitOutcome> {
        if self.status != AttemptStatus::InProgress {
            return Err(AppError::Engine(EngineError::InvalidTransition {
                action: "commit",
                state: self.status.as_str(),
            }));
        }

        let question = assessment
            .question_at(self.section_index, self.question_index)
            .ok_or(AppError::Engine(EngineError::CursorOutOfRange {
                section_index: self.section_index,
                question_index: self.question_index,
            }))?;

        // 用时 = 有效时限 - 剩余秒数；超时提交时剩余为 0，即记满时限
        let limit = question.effective_time_limit(assessment.time_limit_seconds);
        let elapsed = limit.saturating_sub(self.time_remaining);
        self.timings.insert(question.id.clone(), elapsed);

        if let Some(selected) = self.pending_selection.take() {
            self.answers.insert(question.id.clone(), selected);
        }

        let section = assessment.section_at(self.section_index).ok_or(
            AppError::Engine(EngineError::CursorOutOfRange {
                section_index: self.section_index,
                question_index: self.question_index,
            }),
        )?;

        if self.question_index + 1 < section.questions.len() {
            self.question_index += 1;
        } else if self.section_index + 1 < assessment.sections.len() {
            self.section_index += 1;
            self.question_index = 0;
        } else {
            self.status = AttemptStatus::Completed;
            self.time_remaining = 0;
            return Ok(CommitOutcome::Completed);
        }

        let next = assessment
            .question_at(self.section_index, self.question_index)
            .ok_or(AppError::Engine(EngineError::CursorOutOfRange {
                section_index: self.section_index,
                question_index: self.question_index,
            }))?;
        self.time_remaining = next.effective_time_limit(assessment.time_limit_seconds);

        Ok(CommitOutcome::Advanced {
            section_index: self.section_index,
            question_index: self.question_index,
        })
    }

    // ========== 只读访问 ==========

    pub fn status(&self) -> AttemptStatus {
        self.status
    }

    pub fn section_index(&self) -> usize {
        self.section_index
    }

    pub fn question_index(&self) -> usize {
        self.question_index
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn pending_selection(&self) -> Option<usize> {
        self.pending_selection
    }

    pub fn answers(&self) -> &HashMap<String, usize> {
        &self.answers
    }

    pub fn timings(&self) -> &HashMap<String, u32> {
        &self.timings
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// 进度百分比：已提交题数 / 题目总数
    pub fn progress_percent(&self, total_questions: usize) -> u32 {
        if total_questions == 0 {
            return 0;
        }
        (self.timings.len() * 100 / total_questions) as u32
    }

    /// 取出作答与用时（答题结束后移交给结果提交服务）
    pub fn into_maps(self) -> (HashMap<String, usize>, HashMap<String, u32>) {
        (self.answers, self.timings)
    }
}

impl Default for Attempt {
    fn default() -> Self {
        Self::new()
    }
}
