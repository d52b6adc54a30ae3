use anyhow::Result;
/// 日志工具模块
///
/// 提供日志初始化、格式化和输出的辅助函数
use std::fs;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化 tracing 日志
///
/// 默认级别 info，可通过 RUST_LOG 环境变量覆盖
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// 初始化日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
///
/// # 返回
/// 返回是否成功初始化
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\n测评答题日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)?;
    Ok(())
}

/// 记录程序启动信息
///
/// # 参数
/// - `candidate_id`: 候选人ID
/// - `pass_threshold`: 及格线（百分比）
pub fn log_startup(candidate_id: &str, pass_threshold: u32) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 测评答题模式");
    info!("👤 候选人: {}", candidate_id);
    info!("📊 及格线: {}%", pass_threshold);
    info!("{}", "=".repeat(60));
}

/// 打印最终统计信息
///
/// # 参数
/// - `score`: 百分比得分
/// - `answered`: 已作答题数
/// - `unanswered`: 未作答题数
/// - `passed`: 是否通过
/// - `persisted`: 结果是否已成功保存
/// - `log_file_path`: 日志文件路径
pub fn print_final_stats(
    score: u32,
    answered: usize,
    unanswered: usize,
    passed: bool,
    persisted: bool,
    log_file_path: &str,
) {
    info!("\n{}", "=".repeat(60));
    info!("📊 本次答题统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("得分: {}%", score);
    info!("已作答: {} | 未作答: {}", answered, unanswered);
    info!("结论: {}", if passed { "✅ 通过" } else { "❌ 未通过" });
    if !persisted {
        info!("⚠️ 结果未确认保存，请联系管理员");
    }
    info!("{}", "=".repeat(60));
    info!("\n日志已保存至: {}", log_file_path);
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
