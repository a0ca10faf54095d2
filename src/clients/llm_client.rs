//! LLM API 客户端
//!
//! 封装与上游模型的交互。每次调用只发送一条用户消息，不保留对话状态。
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 兼容 OpenAI API 的服务（Gemini OpenAI 兼容端点、Azure 等）

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{AppResult, ModelError, NotesError};

/// 上游生成模型
///
/// 服务层只依赖这个 trait；启动时构造一次，显式传入各个服务。
#[async_trait]
pub trait TextModel: Send + Sync {
    /// 模型名称（用于日志和错误信息）
    fn model_name(&self) -> &str;

    /// 发送一条提示词，返回模型的文本回复
    ///
    /// 回复为空时返回 `ModelError::EmptyResponse`。
    async fn generate(&self, prompt: &str) -> AppResult<String>;
}

/// 基于 `async-openai` 的 LLM 客户端
pub struct LlmClient {
    client: Client<OpenAIConfig>,
    model_name: String,
    temperature: f32,
    max_tokens: u32,
}

impl LlmClient {
    /// 创建新的 LLM 客户端
    pub fn new(config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        Self {
            client: Client::with_config(openai_config),
            model_name: config.llm_model_name.clone(),
            temperature: config.llm_temperature,
            max_tokens: config.llm_max_tokens,
        }
    }

    fn build_failed(&self, source: impl std::error::Error + Send + Sync + 'static) -> NotesError {
        ModelError::RequestBuildFailed {
            model: self.model_name.clone(),
            source: Box::new(source),
        }
        .into()
    }
}

#[async_trait]
impl TextModel for LlmClient {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    async fn generate(&self, prompt: &str) -> AppResult<String> {
        debug!("调用 LLM API，模型: {}", self.model_name);
        debug!("提示词长度: {} 字符", prompt.chars().count());

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()
            .map_err(|e| self.build_failed(e))?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(vec![ChatCompletionRequestMessage::User(user_msg)])
            .temperature(self.temperature)
            .max_tokens(self.max_tokens)
            .build()
            .map_err(|e| self.build_failed(e))?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            NotesError::llm_api_failed(&self.model_name, e)
        })?;

        debug!("LLM API 调用成功");

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .unwrap_or_default();

        let content = content.trim();
        if content.is_empty() {
            return Err(NotesError::empty_response(&self.model_name));
        }

        Ok(content.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 需要真实的 API 密钥：
    /// ```bash
    /// LLM_API_KEY=... cargo test test_generate_live -- --ignored --nocapture
    /// ```
    #[tokio::test]
    #[ignore]
    async fn test_generate_live() {
        crate::utils::logging::init(true);

        let config = Config::from_env().expect("读取配置失败");
        let client = LlmClient::new(&config);

        let reply = client
            .generate("Reply with the single word: ready")
            .await
            .expect("LLM 调用失败");

        println!("LLM 响应: {}", reply);
        assert!(!reply.is_empty());
    }
}
