//! 内容提供方接口 - 业务能力层
//!
//! 测评内容（测评 → 章节 → 题目）由外部托管后端提供，
//! 这里只定义读取接口；门户 HTTP 实现见 `clients::ContentClient`，
//! 本地 TOML 目录实现见 [`TomlContentProvider`]。

use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::loaders::toml_loader::{self, AssessmentFile};
use crate::models::records::{AssessmentRecord, QuestionRecord, SectionRecord};

/// 测评内容读取能力
///
/// 职责：
/// - 按 ID 提供测评元数据、章节列表、题目列表
/// - 只读，不产生任何副作用
/// - 不关心加载校验与洗牌（那是 AssessmentLoader 的事）
#[async_trait]
pub trait ContentProvider: Send + Sync {
    /// 获取测评元数据；不存在时返回 None
    async fn get_assessment(&self, assessment_id: &str) -> AppResult<Option<AssessmentRecord>>;

    /// 获取测评的章节列表（返回顺序即章节顺序）
    async fn get_sections(&self, assessment_id: &str) -> AppResult<Vec<SectionRecord>>;

    /// 获取章节的题目列表
    async fn get_questions(&self, section_id: &str) -> AppResult<Vec<QuestionRecord>>;
}

/// 本地 TOML 目录内容提供方
///
/// 启动时把目录下的所有测评定义一次性读入内存，之后的读取不再碰磁盘。
pub struct TomlContentProvider {
    files: Vec<AssessmentFile>,
}

impl TomlContentProvider {
    /// 从内容目录加载所有测评定义
    pub async fn load_dir(folder_path: &str) -> anyhow::Result<Self> {
        let files = toml_loader::load_all_toml_files(folder_path).await?;
        Ok(Self { files })
    }

    /// 由已解析的定义直接构建（测试和内嵌内容用）
    pub fn from_files(files: Vec<AssessmentFile>) -> Self {
        Self { files }
    }

    /// 已加载的测评 ID 列表
    pub fn assessment_ids(&self) -> Vec<String> {
        self.files.iter().map(|f| f.assessment.id.clone()).collect()
    }
}

#[async_trait]
impl ContentProvider for TomlContentProvider {
    async fn get_assessment(&self, assessment_id: &str) -> AppResult<Option<AssessmentRecord>> {
        Ok(self
            .files
            .iter()
            .find(|f| f.assessment.id == assessment_id)
            .map(|f| f.assessment.clone()))
    }

    async fn get_sections(&self, assessment_id: &str) -> AppResult<Vec<SectionRecord>> {
        Ok(self
            .files
            .iter()
            .find(|f| f.assessment.id == assessment_id)
            .map(|f| f.sections.iter().map(|s| s.section.clone()).collect())
            .unwrap_or_default())
    }

    async fn get_questions(&self, section_id: &str) -> AppResult<Vec<QuestionRecord>> {
        Ok(self
            .files
            .iter()
            .flat_map(|f| f.sections.iter())
            .find(|s| s.section.id == section_id)
            .map(|s| s.questions.clone())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::loaders::parse_assessment_toml;

    const SAMPLE: &str = r#"
id = "a1"
title = "样例"
timeLimitSeconds = 30

[[sections]]
id = "s1"
title = "第一章"

[[sections.questions]]
id = "q1"
text = "题干"
options = ["甲", "乙"]
correctAnswerIndex = 0
"#;

    #[test]
    fn test_toml_provider_lookup() {
        let provider =
            TomlContentProvider::from_files(vec![parse_assessment_toml(SAMPLE).unwrap()]);

        let found = tokio_test::block_on(provider.get_assessment("a1")).unwrap();
        assert_eq!(found.map(|a| a.title), Some("样例".to_string()));

        let missing = tokio_test::block_on(provider.get_assessment("不存在")).unwrap();
        assert!(missing.is_none());

        let sections = tokio_test::block_on(provider.get_sections("a1")).unwrap();
        assert_eq!(sections.len(), 1);

        let questions = tokio_test::block_on(provider.get_questions("s1")).unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].id, "q1");
    }
}
