//! 测评定义 TOML 加载器
//!
//! 本地内容模式下，测评定义以 TOML 文件存放在内容目录中，
//! 字段名与门户 JSON 形状保持一致（camelCase），例如：
//!
//! ```toml
//! id = "rust-basics"
//! title = "Rust 基础测评"
//! timeLimitSeconds = 30
//! randomizeQuestions = true
//!
//! [[sections]]
//! id = "s1"
//! title = "所有权"
//!
//! [[sections.questions]]
//! id = "q1"
//! text = "……"
//! options = ["……", "……"]
//! correctAnswerIndex = 0
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tokio::fs;

use crate::models::records::{AssessmentRecord, QuestionRecord, SectionRecord};

/// 一份完整的测评定义文件
#[derive(Debug, Clone, Deserialize)]
pub struct AssessmentFile {
    #[serde(flatten)]
    pub assessment: AssessmentRecord,
    #[serde(default)]
    pub sections: Vec<SectionFile>,
}

/// 定义文件中的章节（含题目）
#[derive(Debug, Clone, Deserialize)]
pub struct SectionFile {
    #[serde(flatten)]
    pub section: SectionRecord,
    #[serde(default)]
    pub questions: Vec<QuestionRecord>,
}

/// 从 TOML 文本解析测评定义
pub fn parse_assessment_toml(content: &str) -> Result<AssessmentFile> {
    let file: AssessmentFile = toml::from_str(content).context("无法解析测评定义TOML")?;
    Ok(file)
}

/// 从 TOML 文件加载测评定义
pub async fn load_assessment_file(toml_file_path: &Path) -> Result<AssessmentFile> {
    let content = fs::read_to_string(toml_file_path)
        .await
        .with_context(|| format!("无法读取TOML文件: {}", toml_file_path.display()))?;

    let file: AssessmentFile = toml::from_str(&content)
        .with_context(|| format!("无法解析TOML文件: {}", toml_file_path.display()))?;

    Ok(file)
}

/// 从文件夹中加载所有 TOML 测评定义
pub async fn load_all_toml_files(folder_path: &str) -> Result<Vec<AssessmentFile>> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        anyhow::bail!("文件夹不存在: {}", folder_path);
    }

    let mut assessment_files = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .with_context(|| format!("无法读取文件夹: {}", folder_path))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("toml") {
            tracing::info!(
                "正在加载: {}",
                path.file_name().unwrap_or_default().to_string_lossy()
            );

            match load_assessment_file(&path).await {
                Ok(file) => {
                    let question_count: usize =
                        file.sections.iter().map(|s| s.questions.len()).sum();
                    tracing::info!(
                        "成功加载测评 {} （{} 个题目）",
                        file.assessment.id,
                        question_count
                    );
                    assessment_files.push(file);
                }
                Err(e) => {
                    tracing::warn!("加载文件失败 {}: {}", path.display(), e);
                }
            }
        }
    }

    Ok(assessment_files)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
id = "rust-basics"
title = "Rust 基础测评"
description = "入职培训测评"
timeLimitSeconds = 30
randomizeQuestions = true

[[sections]]
id = "s1"
title = "所有权"

[[sections.questions]]
id = "q1"
text = "move 语义的含义是？"
options = ["复制", "转移所有权"]
correctAnswerIndex = 1

[[sections.questions]]
id = "q2"
text = "借用检查发生在？"
options = ["运行期", "编译期", "链接期"]
correctAnswerIndex = 1
timeLimitSeconds = 45
"#;

    #[test]
    fn test_parse_assessment_toml() {
        let file = parse_assessment_toml(SAMPLE).unwrap();
        assert_eq!(file.assessment.id, "rust-basics");
        assert_eq!(file.assessment.time_limit_seconds, 30);
        assert!(file.assessment.randomize_questions);
        assert!(!file.assessment.prevent_backtracking);
        assert_eq!(file.sections.len(), 1);
        assert_eq!(file.sections[0].questions.len(), 2);
        assert_eq!(file.sections[0].questions[1].time_limit_seconds, Some(45));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_assessment_toml("这不是TOML = = =").is_err());
    }
}
