/// 门户内容 API 客户端
///
/// 封装所有与门户内容 API 相关的读取调用
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::debug;

use crate::error::AppResult;
use crate::infrastructure::ApiExecutor;
use crate::models::records::{AssessmentRecord, QuestionRecord, SectionRecord};
use crate::services::content_provider::ContentProvider;

/// 门户内容 API 客户端
pub struct ContentClient {
    executor: Arc<ApiExecutor>,
}

impl ContentClient {
    /// 创建新的内容客户端
    pub fn new(executor: Arc<ApiExecutor>) -> Self {
        Self { executor }
    }
}

#[async_trait]
impl ContentProvider for ContentClient {
    /// 获取测评元数据
    ///
    /// 门户对不存在的测评返回 404，翻译为 None。
    async fn get_assessment(&self, assessment_id: &str) -> AppResult<Option<AssessmentRecord>> {
        debug!("获取测评元数据: {}", assessment_id);

        let response = self
            .executor
            .get(&format!("assessments/{}", assessment_id))
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let record: AssessmentRecord = response.error_for_status()?.json().await?;
        Ok(Some(record))
    }

    /// 获取章节列表（门户按章节顺序返回）
    async fn get_sections(&self, assessment_id: &str) -> AppResult<Vec<SectionRecord>> {
        debug!("获取章节列表: {}", assessment_id);

        self.executor
            .get_json(&format!("assessments/{}/sections", assessment_id))
            .await
    }

    /// 获取章节的题目列表
    async fn get_questions(&self, section_id: &str) -> AppResult<Vec<QuestionRecord>> {
        debug!("获取题目列表: {}", section_id);

        self.executor
            .get_json(&format!("sections/{}/questions", section_id))
            .await
    }
}
