use anyhow::Result;
use assessment_runner::orchestrator::App;
use assessment_runner::utils::logging;
use assessment_runner::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    logging::init();

    // 加载配置
    let config = Config::from_env();

    // 初始化并运行应用
    App::initialize(config).await?.run().await?;

    Ok(())
}
