use anyhow::Result;
use notes_maker::utils::logging;
use notes_maker::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::load()?;

    // 初始化日志
    logging::init(config.verbose_logging);

    // 初始化并运行服务
    App::initialize(config).await?.run().await?;

    Ok(())
}
