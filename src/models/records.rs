//! 内容提供方的线上数据结构
//!
//! 与门户后端交换的 JSON 形状（camelCase 字段名），本地 TOML 测评定义
//! 也复用同一套形状。AssessmentLoader 负责把这些记录组装成领域模型。

use serde::{Deserialize, Serialize};

/// 测评元数据记录
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// 每题默认时限（秒）
    pub time_limit_seconds: u32,
    #[serde(default)]
    pub randomize_questions: bool,
    #[serde(default)]
    pub prevent_backtracking: bool,
}

/// 章节记录（返回顺序即章节顺序）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// 题目记录
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRecord {
    pub id: String,
    pub text: String,
    pub options: Vec<String>,
    pub correct_answer_index: usize,
    /// 本题时限（秒），缺省时使用测评默认值
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_limit_seconds: Option<u32>,
}
