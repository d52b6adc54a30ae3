/// 门户结果 API 客户端
///
/// 封装测评结果与审计事件的写入调用
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::infrastructure::ApiExecutor;
use crate::models::result::{ActivityEvent, AttemptResult};
use crate::services::result_sink::ResultSink;

/// 门户结果 API 客户端
pub struct ResultClient {
    executor: Arc<ApiExecutor>,
}

impl ResultClient {
    /// 创建新的结果客户端
    pub fn new(executor: Arc<ApiExecutor>) -> Self {
        Self { executor }
    }
}

#[async_trait]
impl ResultSink for ResultClient {
    /// 保存测评结果
    async fn insert_result(&self, result: &AttemptResult) -> AppResult<()> {
        debug!(
            "提交测评结果: 候选人 {} | 测评 {} | 得分 {}",
            result.candidate_id, result.assessment_id, result.score
        );

        self.executor
            .post_json("results", result)
            .await
            .map_err(|e| AppError::result_write_failed(&result.assessment_id, e))?;

        Ok(())
    }

    /// 记录审计事件
    async fn log_activity(&self, event: &ActivityEvent) -> AppResult<()> {
        debug!("记录审计事件: {} ({})", event.action, event.entity_id);

        self.executor
            .post_json("activity-logs", event)
            .await
            .map_err(|e| AppError::activity_write_failed(e))?;

        Ok(())
    }
}
