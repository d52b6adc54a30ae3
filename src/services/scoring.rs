//! 计分服务 - 业务能力层
//!
//! 只负责"按作答计算得分"能力：对已校验的内存数据做纯计算，不会失败

use std::collections::HashMap;

use crate::models::assessment::Assessment;

/// 一次测评的得分汇总
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreSummary {
    /// 百分比得分（0-100，四舍五入）
    pub score: u32,
    /// 答对题数
    pub correct_count: usize,
    /// 题目总数（所有章节，含未作答的题目）
    pub total_questions: usize,
}

impl ScoreSummary {
    /// 是否达到及格线
    pub fn passed(&self, pass_threshold: u32) -> bool {
        self.score >= pass_threshold
    }
}

/// 计算一次答题的得分
///
/// 逐题比较作答与正确选项索引；未作答的题目计入分母、不计入分子。
pub fn compute_score(assessment: &Assessment, answers: &HashMap<String, usize>) -> ScoreSummary {
    let total_questions = assessment.total_questions();

    let correct_count = assessment
        .all_questions()
        .filter(|q| answers.get(&q.id) == Some(&q.correct_answer_index))
        .count();

    let score = if total_questions == 0 {
        0
    } else {
        ((correct_count as f64 / total_questions as f64) * 100.0).round() as u32
    };

    ScoreSummary {
        score,
        correct_count,
        total_questions,
    }
}
