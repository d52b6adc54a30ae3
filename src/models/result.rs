//! 测评结果与审计事件记录
//!
//! 一次完成的答题恰好产生一条结果记录和一条审计事件，写入后不再修改。

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 持久化的测评结果记录
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptResult {
    pub candidate_id: String,
    pub assessment_id: String,
    /// 百分比得分（0-100）
    pub score: u32,
    /// 题目ID → 所选选项索引（超时未作答的题目没有条目）
    pub answers: HashMap<String, usize>,
    /// 题目ID → 该题实际用时（秒）
    pub answer_timings: HashMap<String, u32>,
    pub completed: bool,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

/// 审计事件记录
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEvent {
    pub user_id: String,
    pub action: String,
    pub entity_type: String,
    pub entity_id: String,
    pub details: serde_json::Value,
}

impl ActivityEvent {
    /// 构建"完成测评"审计事件
    pub fn assessment_completed(
        user_id: impl Into<String>,
        assessment_id: impl Into<String>,
        score: u32,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            action: "Completed Assessment".to_string(),
            entity_type: "assessment".to_string(),
            entity_id: assessment_id.into(),
            details: serde_json::json!({ "score": score }),
        }
    }
}
