//! 应用会话 - 编排层
//!
//! 管理应用生命周期：装配内容提供方与结果接收方（门户 / 本地两种模式）、
//! 把终端接成答题宿主（键盘输入、事件渲染、Ctrl+C 离开确认）、
//! 驱动一次完整的答题并输出最终统计。

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::clients::{ContentClient, ResultClient};
use crate::config::Config;
use crate::error::{AppError, ConfigError};
use crate::infrastructure::clock::IntervalClock;
use crate::infrastructure::signals::{signal_channel, IntegritySignal, SignalPublisher};
use crate::infrastructure::ApiExecutor;
use crate::orchestrator::attempt_runner::{self, RunningAttempt};
use crate::services::content_provider::{ContentProvider, TomlContentProvider};
use crate::services::result_sink::{FileResultSink, ResultSink};
use crate::utils::logging;
use crate::workflow::attempt_ctx::AttemptCtx;
use crate::workflow::engine::{AttemptEvent, AttemptHandle};

/// 应用主结构
pub struct App {
    config: Config,
    provider: Arc<dyn ContentProvider>,
    sink: Arc<dyn ResultSink>,
    assessment_id: String,
}

impl App {
    /// 初始化应用
    ///
    /// 按配置装配两个外部协作方：
    /// - 门户模式：HTTP 客户端（内容 + 结果共用一个执行器）
    /// - 本地模式：TOML 内容目录 + JSONL 结果文件
    pub async fn initialize(config: Config) -> Result<Self> {
        logging::init_log_file(&config.output_log_file)?;
        logging::log_startup(&config.candidate_id, config.pass_threshold);

        let (provider, sink, assessment_id): (
            Arc<dyn ContentProvider>,
            Arc<dyn ResultSink>,
            String,
        ) = if config.is_portal_mode() {
            info!("🌐 门户模式: {}", config.portal_api_base_url);
            if config.assessment_id.is_empty() {
                return Err(AppError::Config(ConfigError::AssessmentIdRequired).into());
            }
            let executor = Arc::new(ApiExecutor::new(
                &config.portal_api_base_url,
                &config.portal_api_token,
            ));
            (
                Arc::new(ContentClient::new(executor.clone())),
                Arc::new(ResultClient::new(executor)),
                config.assessment_id.clone(),
            )
        } else {
            info!("📁 本地模式: 内容目录 {}", config.content_folder);
            let provider = TomlContentProvider::load_dir(&config.content_folder).await?;
            let assessment_id = if config.assessment_id.is_empty() {
                let first = provider
                    .assessment_ids()
                    .first()
                    .cloned()
                    .context("内容目录中没有任何测评定义")?;
                info!("未指定测评ID，自动选择: {}", first);
                first
            } else {
                config.assessment_id.clone()
            };
            (
                Arc::new(provider),
                Arc::new(FileResultSink::new(
                    &config.result_file,
                    &config.activity_file,
                )),
                assessment_id,
            )
        };

        Ok(Self {
            config,
            provider,
            sink,
            assessment_id,
        })
    }

    /// 运行一次完整的答题会话
    pub async fn run(&self) -> Result<()> {
        // 加载（全有或全无；失败即阻断）
        let assessment = Arc::new(
            attempt_runner::prepare_assessment(
                self.provider.clone(),
                &self.assessment_id,
                &self.config,
            )
            .await?,
        );

        let ctx = AttemptCtx::new(
            self.config.candidate_id.clone(),
            assessment.id.clone(),
            assessment.title.clone(),
        );

        attempt_runner::log_instructions(&assessment, &self.config);

        // 装配引擎：真实 1 秒时钟 + 环境信号通道
        let (publisher, signals) = signal_channel();
        let clock = Box::new(IntervalClock::one_second());
        let RunningAttempt {
            handle,
            events,
            mut task,
        } = attempt_runner::start_attempt(assessment, ctx.clone(), clock, signals);

        // 终端宿主：事件渲染 + 键盘输入
        let render_task = tokio::spawn(render_events(events));
        let input_task = tokio::spawn(read_candidate_input(handle.clone()));

        // 等待答题结束；期间 Ctrl+C 走"离开确认"流程
        let outcome = tokio::select! {
            joined = &mut task => {
                let finished = joined.context("答题任务意外终止")??;
                attempt_runner::complete_attempt(finished, &ctx, self.sink.clone(), &self.config)
                    .await?
            }
            _ = wait_for_abandon(publisher.clone()) => {
                // 放弃 = 中止引擎任务；没有部分结果会被写入
                task.abort();
                render_task.abort();
                input_task.abort();
                warn!("🛑 已放弃本次答题（未写入任何结果）");
                return Ok(());
            }
        };

        render_task.abort();
        input_task.abort();

        logging::print_final_stats(
            outcome.score.score,
            outcome.answered,
            outcome.unanswered,
            outcome.passed,
            outcome.persisted(),
            &self.config.output_log_file,
        );

        Ok(())
    }
}

/// 渲染引擎事件到终端
async fn render_events(mut events: mpsc::Receiver<AttemptEvent>) {
    while let Some(event) = events.recv().await {
        match event {
            AttemptEvent::QuestionPresented {
                section_index,
                question_index,
                section_title,
                prompt,
                options,
                time_limit,
            } => {
                info!("\n{}", "─".repeat(30));
                info!(
                    "📄 {} · 第 {} 章第 {} 题",
                    section_title,
                    section_index + 1,
                    question_index + 1
                );
                info!("{}", prompt);
                for (i, option) in options.iter().enumerate() {
                    info!("  {}. {}", i + 1, option);
                }
                info!("⏱️ 时限 {} 秒（输入选项序号选择，直接回车提交）", time_limit);
            }
            AttemptEvent::TimeLow { time_remaining } => {
                warn!("⏰ 本题仅剩 {} 秒", time_remaining);
            }
            AttemptEvent::IntegrityWarning { signal } => {
                warn!("⚠️ {}，请保持答题页面在前台", signal.describe());
            }
            AttemptEvent::Completed { score } => {
                info!("✅ 作答完毕，得分 {}%", score);
            }
        }
    }
}

/// 读取候选人的键盘输入并转成引擎指令
///
/// 约定：数字选择选项（从 1 开始），空行或 s 提交当前题。
async fn read_candidate_input(handle: AttemptHandle) {
    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    while let Ok(Some(line)) = lines.next_line().await {
        let trimmed = line.trim();
        if trimmed.is_empty()
            || trimmed.eq_ignore_ascii_case("s")
            || trimmed.eq_ignore_ascii_case("submit")
        {
            handle.submit_current_answer().await;
        } else if let Ok(number) = trimmed.parse::<usize>() {
            if number >= 1 {
                handle.select_option(number - 1).await;
                info!("已选择选项 {}", number);
            } else {
                warn!("无效输入: {}（选项序号从 1 开始）", trimmed);
            }
        } else {
            warn!("无效输入: {}（输入选项序号，回车提交）", trimmed);
        }
    }
}

/// 离开确认流程
///
/// 第一次 Ctrl+C 只发出离开提示并要求确认；5 秒内第二次才真正放弃。
async fn wait_for_abandon(publisher: SignalPublisher) {
    loop {
        if tokio::signal::ctrl_c().await.is_err() {
            // 信号监听不可用时不提供放弃通道
            std::future::pending::<()>().await;
        }

        publisher.publish(IntegritySignal::UnloadIntent).await;
        warn!("⚠️ 确认要离开吗？离开将丢失当前进度，5 秒内再按一次 Ctrl+C 确认放弃");

        if tokio::time::timeout(Duration::from_secs(5), tokio::signal::ctrl_c())
            .await
            .is_ok()
        {
            return;
        }
        info!("已取消离开，答题继续");
    }
}
