//! 测试用的模型替身
//!
//! 按顺序返回预设回复，并记录收到的提示词。

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::clients::llm_client::TextModel;
use crate::error::{AppResult, NotesError};

/// 预设回复
#[derive(Debug, Clone)]
pub enum MockReply {
    /// 返回这段文本
    Text(String),
    /// 模拟空回复
    Empty,
}

/// 模型替身
#[derive(Debug, Clone, Default)]
pub struct MockModel {
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一条文本回复
    pub fn with_reply(self, text: impl Into<String>) -> Self {
        self.push(MockReply::Text(text.into()));
        self
    }

    /// 追加一条空回复
    pub fn with_empty_reply(self) -> Self {
        self.push(MockReply::Empty);
        self
    }

    fn push(&self, reply: MockReply) {
        if let Ok(mut replies) = self.replies.lock() {
            replies.push_back(reply);
        }
    }

    /// 已收到的提示词
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }

    /// 调用次数
    pub fn call_count(&self) -> usize {
        self.prompts().len()
    }
}

#[async_trait]
impl TextModel for MockModel {
    fn model_name(&self) -> &str {
        "mock-model"
    }

    async fn generate(&self, prompt: &str) -> AppResult<String> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        let reply = self
            .replies
            .lock()
            .ok()
            .and_then(|mut replies| replies.pop_front())
            .unwrap_or(MockReply::Empty);

        match reply {
            MockReply::Text(text) if !text.trim().is_empty() => Ok(text.trim().to_string()),
            _ => Err(NotesError::empty_response(self.model_name())),
        }
    }
}
