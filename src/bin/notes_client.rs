use anyhow::Result;
use notes_maker::clients::BackendClient;
use notes_maker::console::Console;
use notes_maker::utils::logging;
use notes_maker::workflow::NotesFlow;
use notes_maker::Config;
use tokio::io::BufReader;

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::load()?;

    // 初始化日志
    logging::init(config.verbose_logging);

    let backend = BackendClient::new(&config.backend_url);

    println!("📚 Web Page → Study Notes");
    println!("Paste your topic URL and questions. Maximum 3 questions at a time.");
    println!("后端地址: {}  (输入 help 查看命令)", backend.base_url());

    let mut console = Console::new(NotesFlow::new(backend), std::io::stdout());
    console.run(BufReader::new(tokio::io::stdin())).await?;

    Ok(())
}
