//! 出题服务 - 业务能力层
//!
//! 只负责"摘录 + 出题参数 → 题目列表"能力。
//! 返回的题目原样透传：不去重，不按请求数量截断或补齐。

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::clients::TextModel;
use crate::error::{AppResult, NotesError};
use crate::models::GenerationParams;
use crate::services::reply_decoder::decode_question_list;

/// 出题服务
pub struct QuestionGenerator {
    model: Arc<dyn TextModel>,
}

impl QuestionGenerator {
    pub fn new(model: Arc<dyn TextModel>) -> Self {
        Self { model }
    }

    /// 根据摘录生成考试题目
    ///
    /// # 参数
    /// - `page_text`: 网页摘录
    /// - `params`: 数量 / 分值 / 难度
    pub async fn generate(&self, page_text: &str, params: &GenerationParams) -> AppResult<Vec<String>> {
        if page_text.trim().is_empty() {
            return Err(NotesError::missing_field("pageText"));
        }

        info!(
            "📝 生成题目: {} 道, {} 分, 难度 {}",
            params.num_questions, params.marks, params.difficulty
        );

        let prompt = build_question_prompt(page_text, params);
        let raw = self.model.generate(&prompt).await?;
        debug!("模型原始输出:\n{}", raw);

        let questions = decode_question_list(&raw).into_result()?;

        if questions.len() != params.num_questions as usize {
            warn!(
                "请求 {} 道题，模型返回 {} 道，原样返回",
                params.num_questions,
                questions.len()
            );
        }

        info!("✓ 生成 {} 道题目", questions.len());
        Ok(questions)
    }
}

/// 构建出题提示词
fn build_question_prompt(page_text: &str, params: &GenerationParams) -> String {
    format!(
        r#"Return ONLY valid JSON. Do NOT add markdown or code fences.

Generate {count} university exam-oriented questions from the given PAGE_TEXT.

Guidelines:
- Questions must be suitable for {marks}-mark answers
- Difficulty: {difficulty}
- Use clear, direct exam-style wording
- Do NOT include answers
- Use plain questions only: no special characters, no brackets or parentheses inside a question

Return format:
[
  "Question 1",
  "Question 2"
]

PAGE_TEXT:
"""{page_text}"""
"#,
        count = params.num_questions,
        marks = params.marks,
        difficulty = params.difficulty,
        page_text = page_text,
    )
}
