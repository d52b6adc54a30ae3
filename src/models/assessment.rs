//! 测评领域模型
//!
//! 由 AssessmentLoader 在一次答题开始时构建，此后对整个答题过程只读。

/// 一次可参加的测评（章节 → 题目）
///
/// 加载完成后不可变：题目顺序（含洗牌结果）在整个答题过程中固定。
#[derive(Debug, Clone)]
pub struct Assessment {
    pub id: String,
    pub title: String,
    pub description: String,
    /// 每题默认时限（秒），可被题目自身的时限覆盖
    pub time_limit_seconds: u32,
    /// 是否在加载时打乱各章节内的题目顺序
    pub randomize_questions: bool,
    /// 是否禁止回看（仅作数据保留：引擎本身只会向前推进）
    pub prevent_backtracking: bool,
    pub sections: Vec<Section>,
}

impl Assessment {
    /// 所有章节的题目总数
    pub fn total_questions(&self) -> usize {
        self.sections.iter().map(|s| s.questions.len()).sum()
    }

    /// 按游标取章节
    pub fn section_at(&self, section_index: usize) -> Option<&Section> {
        self.sections.get(section_index)
    }

    /// 按游标取题目
    pub fn question_at(&self, section_index: usize, question_index: usize) -> Option<&Question> {
        self.sections
            .get(section_index)
            .and_then(|s| s.questions.get(question_index))
    }

    /// 遍历全部题目（按章节顺序）
    pub fn all_questions(&self) -> impl Iterator<Item = &Question> {
        self.sections.iter().flat_map(|s| s.questions.iter())
    }
}

/// 测评中的一个章节
///
/// 章节顺序固定，永远不会被打乱。
#[derive(Debug, Clone)]
pub struct Section {
    pub id: String,
    pub title: String,
    pub description: String,
    pub questions: Vec<Question>,
}

/// 单选题目
#[derive(Debug, Clone)]
pub struct Question {
    pub id: String,
    /// 题干
    pub text: String,
    /// 选项列表（至少2个）
    pub options: Vec<String>,
    /// 正确选项的索引
    pub correct_answer_index: usize,
    /// 本题时限（秒），为空时使用测评默认时限
    pub time_limit_seconds: Option<u32>,
}

impl Question {
    /// 本题的有效时限：自身时限优先，否则使用测评默认值
    pub fn effective_time_limit(&self, default_limit: u32) -> u32 {
        self.time_limit_seconds.unwrap_or(default_limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_assessment() -> Assessment {
        Assessment {
            id: "a1".to_string(),
            title: "样例测评".to_string(),
            description: String::new(),
            time_limit_seconds: 30,
            randomize_questions: false,
            prevent_backtracking: false,
            sections: vec![
                Section {
                    id: "s1".to_string(),
                    title: "第一章".to_string(),
                    description: String::new(),
                    questions: vec![
                        Question {
                            id: "q1".to_string(),
                            text: "题目一".to_string(),
                            options: vec!["A".to_string(), "B".to_string()],
                            correct_answer_index: 0,
                            time_limit_seconds: Some(45),
                        },
                        Question {
                            id: "q2".to_string(),
                            text: "题目二".to_string(),
                            options: vec!["A".to_string(), "B".to_string()],
                            correct_answer_index: 1,
                            time_limit_seconds: None,
                        },
                    ],
                },
                Section {
                    id: "s2".to_string(),
                    title: "第二章".to_string(),
                    description: String::new(),
                    questions: vec![Question {
                        id: "q3".to_string(),
                        text: "题目三".to_string(),
                        options: vec!["A".to_string(), "B".to_string(), "C".to_string()],
                        correct_answer_index: 2,
                        time_limit_seconds: None,
                    }],
                },
            ],
        }
    }

    #[test]
    fn test_total_questions() {
        assert_eq!(sample_assessment().total_questions(), 3);
    }

    #[test]
    fn test_question_at() {
        let a = sample_assessment();
        assert_eq!(a.question_at(0, 1).map(|q| q.id.as_str()), Some("q2"));
        assert_eq!(a.question_at(1, 0).map(|q| q.id.as_str()), Some("q3"));
        assert!(a.question_at(1, 1).is_none());
        assert!(a.question_at(2, 0).is_none());
    }

    #[test]
    fn test_effective_time_limit() {
        let a = sample_assessment();
        // 题目自身时限优先
        assert_eq!(a.question_at(0, 0).unwrap().effective_time_limit(30), 45);
        // 无自身时限时回落到测评默认值
        assert_eq!(a.question_at(0, 1).unwrap().effective_time_limit(30), 30);
    }
}
