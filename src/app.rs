use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::api::{build_router, NotesHandlers};
use crate::clients::{LlmClient, TextModel};
use crate::config::Config;
use crate::utils::logging::log_startup;

/// 服务端主结构
///
/// 模型句柄在启动时构造一次，之后只读共享给所有请求。
pub struct App {
    config: Config,
    handlers: NotesHandlers,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        if !config.has_api_key() {
            warn!("⚠️ 未配置 LLM_API_KEY，模型调用将会失败");
        }

        let model: Arc<dyn TextModel> = Arc::new(LlmClient::new(&config));
        Ok(Self::with_model(config, model))
    }

    /// 使用指定的模型句柄初始化（测试时注入替身）
    pub fn with_model(config: Config, model: Arc<dyn TextModel>) -> Self {
        let handlers = NotesHandlers::from_config(&config, model);
        Self { config, handlers }
    }

    /// 运行 HTTP 服务直到进程退出
    pub async fn run(self) -> Result<()> {
        let listener = TcpListener::bind(&self.config.server_addr)
            .await
            .with_context(|| format!("无法监听地址: {}", self.config.server_addr))?;

        log_startup(&self.config.server_addr, &self.config.llm_model_name);

        axum::serve(listener, build_router(self.handlers))
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("HTTP 服务异常退出")?;

        info!("👋 服务已停止");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("监听退出信号失败: {}", e);
    }
}
