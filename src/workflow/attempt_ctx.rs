//! 答题上下文
//!
//! 封装"谁在参加哪个测评"这一信息

use std::fmt::Display;

/// 答题上下文
///
/// 包含一次答题所需的身份信息，主要用于日志显示与结果归属
#[derive(Debug, Clone)]
pub struct AttemptCtx {
    /// 候选人ID
    pub candidate_id: String,

    /// 测评ID
    pub assessment_id: String,

    /// 测评标题（仅用于日志显示）
    pub assessment_title: String,
}

impl AttemptCtx {
    /// 创建新的答题上下文
    pub fn new(
        candidate_id: String,
        assessment_id: String,
        assessment_title: String,
    ) -> Self {
        Self {
            candidate_id,
            assessment_id,
            assessment_title,
        }
    }
}

impl Display for AttemptCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[候选人#{} 测评#{}]",
            self.candidate_id, self.assessment_id
        )
    }
}
