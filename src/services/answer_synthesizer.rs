//! 答案生成服务 - 业务能力层
//!
//! 只负责"摘录 + 问题 → 问答记录"能力
//!
//! 一次调用只请求一次模型；解析失败直接上抛，不重试。

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::clients::TextModel;
use crate::error::{AppResult, InputError, ParseError};
use crate::models::{AnswerRecord, NOT_FOUND_ANSWER};
use crate::services::reply_decoder::decode_answer_records;
use crate::utils::truncate_text;

/// 答案生成服务
pub struct AnswerSynthesizer {
    model: Arc<dyn TextModel>,
}

impl AnswerSynthesizer {
    pub fn new(model: Arc<dyn TextModel>) -> Self {
        Self { model }
    }

    /// 根据摘录回答问题
    ///
    /// # 参数
    /// - `page_text`: 网页摘录
    /// - `questions`: 问题列表（按顺序）
    ///
    /// # 返回
    /// 每个问题一条记录，顺序与输入一致；条数不一致视为 `ParseError`
    pub async fn answer(&self, page_text: &str, questions: &[String]) -> AppResult<Vec<AnswerRecord>> {
        if page_text.trim().is_empty() || questions.iter().all(|q| q.trim().is_empty()) {
            return Err(InputError::MissingFields {
                fields: vec!["pageText", "questions"],
            }
            .into());
        }

        info!(
            "🤖 生成答案: {} 个问题, 摘录 {} 字符, 模型: {}",
            questions.len(),
            page_text.chars().count(),
            self.model.model_name()
        );

        let prompt = build_answer_prompt(page_text, questions);
        let raw = self.model.generate(&prompt).await?;
        debug!("模型原始输出:\n{}", raw);

        let records = decode_answer_records(&raw).into_result().inspect_err(|e| {
            warn!("解析模型输出失败: {} | 原文: {}", e, truncate_text(&raw, 200));
        })?;

        if records.len() != questions.len() {
            warn!(
                "模型返回 {} 条记录，期望 {} 条",
                records.len(),
                questions.len()
            );
            return Err(ParseError::RecordCountMismatch {
                expected: questions.len(),
                actual: records.len(),
            }
            .into());
        }

        info!("✓ 答案生成完成");
        Ok(records)
    }
}

/// 构建答题提示词
fn build_answer_prompt(page_text: &str, questions: &[String]) -> String {
    let questions_block = questions
        .iter()
        .enumerate()
        .map(|(i, q)| format!("{}. {}", i + 1, q))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are an exam-notes assistant.

You are given the text of a single web page (PAGE_TEXT).
Answer each question using ONLY this text.
If the answer is not clearly available in PAGE_TEXT, set "found" to false.

Return a JSON array with exactly one element per question, in the same order as QUESTIONS.
Each element must be:
{{
  "question": "the question text",
  "answer": "the answer",
  "found": true or false,
  "source_snippet": "the exact lines or phrases from PAGE_TEXT you relied on, if any"
}}

Rules:
- Answer length: about 150-250 words when found.
- Treat every question as worth 15 marks.
- Do NOT use knowledge from outside PAGE_TEXT.
- If not found, answer: "{not_found}"
- Return only the JSON array, no commentary.

PAGE_TEXT:
"""{page_text}"""

QUESTIONS:
{questions_block}
"#,
        not_found = NOT_FOUND_ANSWER,
        page_text = page_text,
        questions_block = questions_block,
    )
}
