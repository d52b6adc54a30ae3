//! 完整答题流程集成测试
//!
//! 用手动时钟 + 内存内容/结果替身把整条链路跑到底：
//! 加载 → 引擎驱动 → 计分 → 结果提交。

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use assessment_runner::error::{AppError, ContentError, PersistenceError};
use assessment_runner::infrastructure::{signal_channel, ApiExecutor, ManualClock};
use assessment_runner::models::{parse_assessment_toml, ActivityEvent, AttemptResult};
use assessment_runner::orchestrator::attempt_runner;
use assessment_runner::services::content_provider::TomlContentProvider;
use assessment_runner::services::result_sink::ResultSink;
use assessment_runner::services::result_submitter::ResultSubmitter;
use assessment_runner::clients::ContentClient;
use assessment_runner::workflow::engine::AttemptEngine;
use assessment_runner::{
    AppResult, AssessmentLoader, AttemptCtx, AttemptStatus, Config, ContentProvider,
};

/// 两道题、每题 30 秒、不洗牌
const TWO_QUESTIONS: &str = r#"
id = "onboarding-basics"
title = "入职基础测评"
timeLimitSeconds = 30

[[sections]]
id = "s1"
title = "第一章"

[[sections.questions]]
id = "q1"
text = "第一题"
options = ["甲", "乙", "丙"]
correctAnswerIndex = 1

[[sections.questions]]
id = "q2"
text = "第二题"
options = ["甲", "乙"]
correctAnswerIndex = 0
"#;

/// 一章五题、开启洗牌
const FIVE_SHUFFLED: &str = r#"
id = "shuffled"
title = "洗牌测评"
timeLimitSeconds = 30
randomizeQuestions = true

[[sections]]
id = "s1"
title = "第一章"

[[sections.questions]]
id = "q1"
text = "一"
options = ["甲", "乙"]
correctAnswerIndex = 0

[[sections.questions]]
id = "q2"
text = "二"
options = ["甲", "乙"]
correctAnswerIndex = 1

[[sections.questions]]
id = "q3"
text = "三"
options = ["甲", "乙"]
correctAnswerIndex = 0

[[sections.questions]]
id = "q4"
text = "四"
options = ["甲", "乙"]
correctAnswerIndex = 1

[[sections.questions]]
id = "q5"
text = "五"
options = ["甲", "乙"]
correctAnswerIndex = 0
"#;

/// 计数用的内存结果接收方
#[derive(Default)]
struct CountingSink {
    inserts: AtomicUsize,
    activities: AtomicUsize,
    fail_insert: bool,
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
        Ok(())
    }
}

fn provider_from(toml: &str) -> Arc<dyn ContentProvider> {
    Arc::new(TomlContentProvider::from_files(vec![
        parse_assessment_toml(toml).unwrap(),
    ]))
}

fn ctx(assessment_id: &str) -> AttemptCtx {
    AttemptCtx::new(
        "candidate-1".to_string(),
        assessment_id.to_string(),
        "测试".to_string(),
    )
}

/// 场景：Q1 在第 5 秒选对并主动提交，Q2 无作答走满 30 秒超时。
/// 预期：timings = {q1: 5, q2: 30}，answers 只有 q1，得分 50%。
#[tokio::test]
async fn test_manual_submit_then_timeout() {
    let loader = AssessmentLoader::new(provider_from(TWO_QUESTIONS));
    let assessment = Arc::new(loader.load("onboarding-basics", None).await.unwrap());

    let (driver, clock) = ManualClock::new();
    let (_publisher, signals) = signal_channel();
    let (engine, handle, _events) = AttemptEngine::new(
        assessment.clone(),
        ctx("onboarding-basics"),
        Box::new(clock),
        signals,
    );
    let task = tokio::spawn(engine.run());
    let mut rx = handle.watch();

    // 第 5 秒：选择正确选项并提交
    driver.advance(5).await;
    rx.wait_for(|s| s.time_remaining == 25).await.unwrap();
    handle.select_option(1).await;
    handle.submit_current_answer().await;

    // 推进到 Q2，倒计时重置为满时限
    rx.wait_for(|s| s.question_index == 1).await.unwrap();
    assert_eq!(handle.snapshot().time_remaining, 30);
    assert_eq!(handle.snapshot().progress_percent, 50);

    // Q2 走满 30 秒超时
    driver.advance(30).await;
    rx.wait_for(|s| s.status == AttemptStatus::Completed)
        .await
        .unwrap();

    let finished = task.await.unwrap().unwrap();
    let last = handle.snapshot();
    assert_eq!(last.status, AttemptStatus::Completed);
    assert_eq!(last.score, Some(50));
    assert_eq!(last.progress_percent, 100);
    assert_eq!(finished.timings.get("q1"), Some(&5));
    assert_eq!(finished.timings.get("q2"), Some(&30));
    assert_eq!(finished.answers.get("q1"), Some(&1));
    assert!(!finished.answers.contains_key("q2"));
    assert_eq!(finished.score.score, 50);

    // 提交恰好各写一次
    let sink = Arc::new(CountingSink::default());
    let submitter = ResultSubmitter::new(sink.clone());
    let result = submitter
        .submit(
            "candidate-1",
            "onboarding-basics",
            finished.answers,
            finished.timings,
            &finished.score,
            finished.started_at,
        )
        .await
        .unwrap();

    assert!(result.completed);
    assert_eq!(result.score, 50);
    assert_eq!(sink.inserts.load(Ordering::SeqCst), 1);
    assert_eq!(sink.activities.load(Ordering::SeqCst), 1);
}

/// 场景：两题都在时限内答对。
/// 预期：得分 100%，结果 completed=true、带两条用时。
#[tokio::test]
async fn test_all_correct_within_time() {
    let loader = AssessmentLoader::new(provider_from(TWO_QUESTIONS));
    let assessment = Arc::new(loader.load("onboarding-basics", None).await.unwrap());

    let (_driver, clock) = ManualClock::new();
    let (_publisher, signals) = signal_channel();
    let (engine, handle, _events) = AttemptEngine::new(
        assessment,
        ctx("onboarding-basics"),
        Box::new(clock),
        signals,
    );
    let task = tokio::spawn(engine.run());
    let mut rx = handle.watch();

    handle.select_option(1).await;
    handle.submit_current_answer().await;
    rx.wait_for(|s| s.question_index == 1).await.unwrap();

    handle.select_option(0).await;
    handle.submit_current_answer().await;
    rx.wait_for(|s| s.status == AttemptStatus::Completed)
        .await
        .unwrap();

    let finished = task.await.unwrap().unwrap();
    assert_eq!(finished.score.score, 100);
    assert_eq!(finished.timings.len(), 2);

    let sink = Arc::new(CountingSink::default());
    let result = ResultSubmitter::new(sink)
        .submit(
            "candidate-1",
            "onboarding-basics",
            finished.answers,
            finished.timings,
            &finished.score,
            finished.started_at,
        )
        .await
        .unwrap();
    assert!(result.completed);
    assert_eq!(result.answer_timings.len(), 2);
}

/// 场景：内容提供方查不到该测评。
/// 预期：加载失败（测评不可开始），答题引擎不可达。
#[tokio::test]
async fn test_missing_assessment_blocks_start() {
    let loader = AssessmentLoader::new(provider_from(TWO_QUESTIONS));
    let err = loader.load("ghost", None).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Content(ContentError::AssessmentNotFound { .. })
    ));
}

/// 场景：结果接收方拒绝写入。
/// 预期：提交收尾返回成功（非阻断），成绩照常给出，仅标记未持久化。
#[tokio::test]
async fn test_sink_failure_still_shows_score() {
    let loader = AssessmentLoader::new(provider_from(TWO_QUESTIONS));
    let assessment = Arc::new(loader.load("onboarding-basics", None).await.unwrap());

    let (_driver, clock) = ManualClock::new();
    let (_publisher, signals) = signal_channel();
    let (engine, handle, _events) = AttemptEngine::new(
        assessment,
        ctx("onboarding-basics"),
        Box::new(clock),
        signals,
    );
    let task = tokio::spawn(engine.run());
    let mut rx = handle.watch();

    handle.select_option(1).await;
    handle.submit_current_answer().await;
    rx.wait_for(|s| s.question_index == 1).await.unwrap();
    handle.select_option(0).await;
    handle.submit_current_answer().await;
    rx.wait_for(|s| s.status == AttemptStatus::Completed)
        .await
        .unwrap();

    let finished = task.await.unwrap().unwrap();

    // 提交服务本身报持久化错误
    let sink = Arc::new(CountingSink {
        fail_insert: true,
        ..Default::default()
    });
    let err = ResultSubmitter::new(sink.clone())
        .submit(
            "candidate-1",
            "onboarding-basics",
            finished.answers.clone(),
            finished.timings.clone(),
            &finished.score,
            finished.started_at,
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Persistence(PersistenceError::ResultWriteFailed { .. })
    ));

    // 编排层收尾把它降级为警告：成绩照常展示
    let sink = Arc::new(CountingSink {
        fail_insert: true,
        ..Default::default()
    });
    let outcome = attempt_runner::complete_attempt(
        finished,
        &ctx("onboarding-basics"),
        sink.clone(),
        &Config::default(),
    )
    .await
    .unwrap();

    assert_eq!(outcome.score.score, 100);
    assert!(outcome.passed);
    assert!(!outcome.persisted());
    // 不自动重试
    assert_eq!(sink.inserts.load(Ordering::SeqCst), 1);
}

/// 场景：开启洗牌的测评。
/// 预期：加载顺序是原题集的一个排列；按各题自身 ID 作答，得分与顺序无关。
#[tokio::test]
async fn test_shuffled_order_does_not_affect_scoring() {
    let loader = AssessmentLoader::new(provider_from(FIVE_SHUFFLED));
    let assessment = Arc::new(loader.load("shuffled", Some(2024)).await.unwrap());

    // 加载顺序是 q1..q5 的一个排列
    let mut ids: Vec<&str> = assessment.sections[0]
        .questions
        .iter()
        .map(|q| q.id.as_str())
        .collect();
    ids.sort();
    assert_eq!(ids, vec!["q1", "q2", "q3", "q4", "q5"]);

    let (_driver, clock) = ManualClock::new();
    let (_publisher, signals) = signal_channel();
    let (engine, handle, _events) =
        AttemptEngine::new(assessment.clone(), ctx("shuffled"), Box::new(clock), signals);
    let task = tokio::spawn(engine.run());
    let mut rx = handle.watch();

    // 按呈现顺序逐题选正确答案
    for presented in 0..assessment.sections[0].questions.len() {
        rx.wait_for(|s| {
            s.question_index == presented || s.status == AttemptStatus::Completed
        })
        .await
        .unwrap();
        let question = &assessment.sections[0].questions[presented];
        handle.select_option(question.correct_answer_index).await;
        handle.submit_current_answer().await;
    }
    rx.wait_for(|s| s.status == AttemptStatus::Completed)
        .await
        .unwrap();

    let finished = task.await.unwrap().unwrap();
    assert_eq!(finished.score.score, 100);
    assert_eq!(finished.answers.len(), 5);
}

/// 需要真实门户环境，手动运行：cargo test -- --ignored
#[tokio::test]
#[ignore]
async fn test_portal_content_client_live() {
    let config = Config::from_env();
    assert!(config.is_portal_mode(), "需要设置 PORTAL_API_BASE_URL");

    let executor = Arc::new(ApiExecutor::new(
        &config.portal_api_base_url,
        &config.portal_api_token,
    ));
    let client = ContentClient::new(executor);

    let result = client.get_assessment(&config.assessment_id).await;
    assert!(result.is_ok(), "应该能够访问门户内容API");
}
