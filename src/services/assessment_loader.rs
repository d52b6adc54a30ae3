//! 测评加载服务 - 业务能力层
//!
//! 只负责"取内容 → 校验 → 洗牌 → 组装只读模型"能力，不关心答题流程
//!
//! 加载是全有或全无的：任何一步失败，测评都不可开始。

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::error::{AppError, AppResult, ContentError};
use crate::models::assessment::{Assessment, Question, Section};
use crate::models::records::QuestionRecord;
use crate::services::content_provider::ContentProvider;

/// 测评加载服务
///
/// 职责：
/// - 从内容提供方取回测评、章节、题目
/// - 校验题目定义（选项数、正确答案索引）
/// - 按需打乱各章节内的题目顺序（章节顺序不动）
/// - 产出整个答题过程只读的 Assessment 模型
pub struct AssessmentLoader {
    provider: Arc<dyn ContentProvider>,
}

impl AssessmentLoader {
    /// 创建新的测评加载服务
    pub fn new(provider: Arc<dyn ContentProvider>) -> Self {
        Self { provider }
    }

    /// 加载一次测评
    ///
    /// # 参数
    /// - `assessment_id`: 测评ID
    /// - `shuffle_seed`: 洗牌种子；None 时使用系统熵（每次加载独立洗牌）
    ///
    /// # 返回
    /// 返回组装完成的只读测评模型
    pub async fn load(
        &self,
        assessment_id: &str,
        shuffle_seed: Option<u64>,
    ) -> AppResult<Assessment> {
        let record = self
            .provider
            .get_assessment(assessment_id)
            .await?
            .ok_or_else(|| AppError::assessment_not_found(assessment_id))?;

        let section_records = self.provider.get_sections(assessment_id).await?;

        let mut rng = match shuffle_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut sections = Vec::with_capacity(section_records.len());
        for section_record in section_records {
            let question_records = self.provider.get_questions(&section_record.id).await?;

            let mut questions = question_records
                .into_iter()
                .map(build_question)
                .collect::<AppResult<Vec<Question>>>()?;

            // 洗牌只发生在章节内部；本次加载的排列对整个答题过程固定
            if record.randomize_questions {
                shuffle_questions(&mut rng, &mut questions);
                debug!(
                    "章节 {} 题目已打乱: {:?}",
                    section_record.id,
                    questions.iter().map(|q| q.id.as_str()).collect::<Vec<_>>()
                );
            }

            sections.push(Section {
                id: section_record.id,
                title: section_record.title,
                description: section_record.description,
                questions,
            });
        }

        let assessment = Assessment {
            id: record.id,
            title: record.title,
            description: record.description,
            time_limit_seconds: record.time_limit_seconds,
            randomize_questions: record.randomize_questions,
            prevent_backtracking: record.prevent_backtracking,
            sections,
        };

        // 没有题目的测评无法计分，也就不可开始
        if assessment.total_questions() == 0 {
            return Err(AppError::Content(ContentError::EmptyAssessment {
                assessment_id: assessment.id,
            }));
        }

        info!(
            "✓ 测评加载完成: {} （{} 个章节, {} 个题目）",
            assessment.title,
            assessment.sections.len(),
            assessment.total_questions()
        );

        Ok(assessment)
    }
}

/// 校验并转换单个题目记录
fn build_question(record: QuestionRecord) -> AppResult<Question> {
    if record.options.len() < 2 {
        return Err(AppError::invalid_question(
            &record.id,
            format!("至少需要2个选项，实际 {}", record.options.len()),
        ));
    }
    if record.correct_answer_index >= record.options.len() {
        return Err(AppError::invalid_question(
            &record.id,
            format!(
                "正确答案索引 {} 超出选项范围 [0, {})",
                record.correct_answer_index,
                record.options.len()
            ),
        ));
    }

    Ok(Question {
        id: record.id,
        text: record.text,
        options: record.options,
        correct_answer_index: record.correct_answer_index,
        time_limit_seconds: record.time_limit_seconds,
    })
}

/// 打乱一组题目（Fisher–Yates 均匀洗牌）
pub fn shuffle_questions<R: Rng>(rng: &mut R, questions: &mut [Question]) {
    questions.shuffle(rng);
}
