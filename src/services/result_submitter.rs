//! 结果提交服务 - 业务能力层
//!
//! 只负责"组装结果 → 持久化 → 记审计"能力，不关心答题流程
//!
//! 每次完成的答题恰好触发一次提交：一条结果写入、一条审计事件。
//! 写入失败不重试：得分已在本地算出，展示给候选人不依赖持久化成功。

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::error::AppResult;
use crate::models::result::{ActivityEvent, AttemptResult};
use crate::services::result_sink::ResultSink;
use crate::services::scoring::ScoreSummary;

/// 结果提交服务
///
/// 职责：
/// - 用最终答题状态组装 AttemptResult（completed_at 在组装时取）
/// - 调用结果接收方各恰好一次
/// - 审计事件失败只告警，不回滚结果写入
pub struct ResultSubmitter {
    sink: Arc<dyn ResultSink>,
}

impl ResultSubmitter {
    /// 创建新的结果提交服务
    pub fn new(sink: Arc<dyn ResultSink>) -> Self {
        Self { sink }
    }

    /// 提交一次完成的答题
    ///
    /// # 参数
    /// - `candidate_id`: 候选人ID
    /// - `assessment_id`: 测评ID
    /// - `answers`: 题目ID → 所选选项索引
    /// - `timings`: 题目ID → 用时（秒）
    /// - `score`: 已算出的得分汇总
    /// - `started_at`: 答题开始时间
    ///
    /// # 返回
    /// 返回已持久化的结果记录；结果写入失败时返回持久化错误
    pub async fn submit(
        &self,
        candidate_id: &str,
        assessment_id: &str,
        answers: HashMap<String, usize>,
        timings: HashMap<String, u32>,
        score: &ScoreSummary,
        started_at: DateTime<Utc>,
    ) -> AppResult<AttemptResult> {
        let result = AttemptResult {
            candidate_id: candidate_id.to_string(),
            assessment_id: assessment_id.to_string(),
            score: score.score,
            answers,
            answer_timings: timings,
            completed: true,
            started_at,
            completed_at: Utc::now(),
        };

        self.sink.insert_result(&result).await?;
        info!("✓ 测评结果已保存 (测评: {}, 得分: {})", assessment_id, result.score);

        // 审计事件尽力而为：失败不影响已写入的结果
        let event =
            ActivityEvent::assessment_completed(candidate_id, assessment_id, result.score);
        if let Err(e) = self.sink.log_activity(&event).await {
            warn!("⚠️ 审计事件记录失败: {}", e);
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::error::{AppError, PersistenceError};

    /// 计数用的内存结果接收方
    #[derive(Default)]
    struct CountingSink {
        inserts: AtomicUsize,
        activities: AtomicUsize,
        fail_insert: bool,
        fail_activity: bool,
    }

    #[async_trait]
    impl ResultSink for CountingSink {
        async fn insert_result(&self, result: &AttemptResult) -> AppResult<()> {
            self.inserts.fetch_add(1, Ordering::SeqCst);
            if self.fail_insert {
                return Err(AppError::result_write_failed(
                    &result.assessment_id,
                    std::io::Error::new(std::io::ErrorKind::Other, "写入被拒绝"),
                ));
            }
            Ok(())
        }

        async fn log_activity(&self, _event: &ActivityEvent) -> AppResult<()> {
            self.activities.fetch_add(1, Ordering::SeqCst);
            if self.fail_activity {
                return Err(AppError::activity_write_failed(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    "写入被拒绝",
                )));
            }
            Ok(())
        }
    }

    fn summary() -> ScoreSummary {
        ScoreSummary {
            score: 50,
            correct_count: 1,
            total_questions: 2,
        }
    }

    #[tokio::test]
    async fn test_submit_writes_result_and_activity_once() {
        let sink = Arc::new(CountingSink::default());
        let submitter = ResultSubmitter::new(sink.clone());

        let result = submitter
            .submit(
                "c1",
                "a1",
                HashMap::new(),
                HashMap::new(),
                &summary(),
                Utc::now(),
            )
            .await
            .unwrap();

        assert_eq!(result.score, 50);
        assert!(result.completed);
        assert_eq!(sink.inserts.load(Ordering::SeqCst), 1);
        assert_eq!(sink.activities.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_insert_failure_surfaces_persistence_error() {
        let sink = Arc::new(CountingSink {
            fail_insert: true,
            ..Default::default()
        });
        let submitter = ResultSubmitter::new(sink.clone());

        let err = submitter
            .submit(
                "c1",
                "a1",
                HashMap::new(),
                HashMap::new(),
                &summary(),
                Utc::now(),
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AppError::Persistence(PersistenceError::ResultWriteFailed { .. })
        ));
        // 不自动重试
        assert_eq!(sink.inserts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_activity_failure_does_not_fail_submit() {
        let sink = Arc::new(CountingSink {
            fail_activity: true,
            ..Default::default()
        });
        let submitter = ResultSubmitter::new(sink.clone());

        let result = submitter
            .submit(
                "c1",
                "a1",
                HashMap::new(),
                HashMap::new(),
                &summary(),
                Utc::now(),
            )
            .await;

        assert!(result.is_ok());
        assert_eq!(sink.inserts.load(Ordering::SeqCst), 1);
        assert_eq!(sink.activities.load(Ordering::SeqCst), 1);
    }
}
