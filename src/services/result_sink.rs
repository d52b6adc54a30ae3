//! 结果接收方接口 - 业务能力层
//!
//! 完成的测评结果与审计事件交给外部托管后端保存，这里只定义写入接口；
//! 门户 HTTP 实现见 `clients::ResultClient`，本地文件实现见 [`FileResultSink`]。

use std::fs::OpenOptions;
use std::io::Write;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::models::result::{ActivityEvent, AttemptResult};

/// 测评结果写入能力
///
/// 职责：
/// - 保存一条结果记录
/// - 记录一条审计事件
/// - 不关心得分计算与提交时机（那是 ResultSubmitter 的事）
#[async_trait]
pub trait ResultSink: Send + Sync {
    /// 保存测评结果
    async fn insert_result(&self, result: &AttemptResult) -> AppResult<()>;

    /// 记录审计事件（尽力而为：调用方允许其失败）
    async fn log_activity(&self, event: &ActivityEvent) -> AppResult<()>;
}

/// 本地文件结果接收方
///
/// 结果与审计事件分别以 JSON Lines 追加写入两个文件。
pub struct FileResultSink {
    result_file_path: String,
    activity_file_path: String,
}

impl FileResultSink {
    /// 创建本地文件结果接收方
    pub fn new(result_file_path: impl Into<String>, activity_file_path: impl Into<String>) -> Self {
        Self {
            result_file_path: result_file_path.into(),
            activity_file_path: activity_file_path.into(),
        }
    }

    /// 以追加模式写入一行 JSON
    fn append_line(path: &str, line: &str) -> AppResult<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| AppError::file_write_failed(path, e))?;

        writeln!(file, "{}", line).map_err(|e| AppError::file_write_failed(path, e))?;

        Ok(())
    }
}

#[async_trait]
impl ResultSink for FileResultSink {
    async fn insert_result(&self, result: &AttemptResult) -> AppResult<()> {
        debug!(
            "写入测评结果: 候选人 {} | 测评 {} | 得分 {}",
            result.candidate_id, result.assessment_id, result.score
        );

        let line = serde_json::to_string(result)
            .map_err(|e| AppError::result_write_failed(&result.assessment_id, e))?;

        Self::append_line(&self.result_file_path, &line)
            .map_err(|e| AppError::result_write_failed(&result.assessment_id, e))
    }

    async fn log_activity(&self, event: &ActivityEvent) -> AppResult<()> {
        let line =
            serde_json::to_string(event).map_err(|e| AppError::activity_write_failed(e))?;

        Self::append_line(&self.activity_file_path, &line)
            .map_err(|e| AppError::activity_write_failed(e))
    }
}
