//! 模型回复解码
//!
//! 上游模型的输出不可信，解码结果显式区分成功与失败，
//! 由调用方决定如何上抛。解析失败不重试、不修复。

use regex::Regex;
use serde::de::DeserializeOwned;
use std::sync::LazyLock;

use crate::error::{AppResult, ParseError};
use crate::models::AnswerRecord;
use crate::utils::truncate_text;

static CODE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```json|```").expect("code fence pattern is valid"));

static BRACKETED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\[.*\]").expect("bracket pattern is valid"));

/// 错误里保留的原始回复长度
const RAW_EXCERPT_LEN: usize = 500;

/// 解码结果
#[derive(Debug)]
pub enum Decoded<T> {
    /// 解析成功
    Parsed(T),
    /// 回复不符合预期结构
    Rejected(ParseError),
}

impl<T> Decoded<T> {
    pub fn is_parsed(&self) -> bool {
        matches!(self, Decoded::Parsed(_))
    }

    /// 转为 `AppResult`，失败时为 `ParseError`
    pub fn into_result(self) -> AppResult<T> {
        match self {
            Decoded::Parsed(value) => Ok(value),
            Decoded::Rejected(err) => Err(err.into()),
        }
    }
}

/// 去掉 markdown 代码围栏
pub fn strip_code_fences(raw: &str) -> String {
    CODE_FENCE.replace_all(raw, "").trim().to_string()
}

/// 取第一个 `[` 到最后一个 `]` 之间的内容（含括号）
pub fn find_bracketed(raw: &str) -> Option<&str> {
    BRACKETED.find(raw).map(|m| m.as_str())
}

fn decode_json<T: DeserializeOwned>(text: &str, raw: &str) -> Decoded<T> {
    match serde_json::from_str::<T>(text) {
        Ok(value) => Decoded::Parsed(value),
        Err(source) => Decoded::Rejected(ParseError::InvalidJson {
            raw: truncate_text(raw, RAW_EXCERPT_LEN),
            source,
        }),
    }
}

/// 解码问答记录：去围栏后整体按 JSON 数组解析
pub fn decode_answer_records(raw: &str) -> Decoded<Vec<AnswerRecord>> {
    let cleaned = strip_code_fences(raw);
    decode_json(&cleaned, raw)
}

/// 解码题目列表：取第一个方括号片段，按字符串数组解析
pub fn decode_question_list(raw: &str) -> Decoded<Vec<String>> {
    match find_bracketed(raw) {
        Some(array) => decode_json(array, raw),
        None => Decoded::Rejected(ParseError::NoArrayFound {
            raw: truncate_text(raw, RAW_EXCERPT_LEN),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_code_fences() {
        let raw = "```json\n[{\"question\": \"q\"}]\n```";
        assert_eq!(strip_code_fences(raw), "[{\"question\": \"q\"}]");
        assert_eq!(strip_code_fences("  plain  "), "plain");
    }

    #[test]
    fn test_decode_answer_records_fenced() {
        let raw = r#"```json
[
  {"question": "What is deadlock?", "answer": "A cycle of waiting.", "found": true, "source_snippet": "Deadlock is..."},
  {"question": "Define thread.", "answer": "Not clearly available in the given page.", "found": false, "source_snippet": ""}
]
```"#;
        let records = decode_answer_records(raw).into_result().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].question, "What is deadlock?");
        assert!(!records[1].found);
    }

    #[test]
    fn test_decode_answer_records_rejects_prose() {
        let decoded = decode_answer_records("Sure! Here are your answers: ...");
        assert!(!decoded.is_parsed());
        let err = decoded.into_result().unwrap_err();
        assert_eq!(err.kind(), "ParseError");
    }

    #[test]
    fn test_decode_answer_records_does_not_repair() {
        // 前后夹杂说明文字时不做截取
        let raw = "Here you go:\n[{\"question\": \"q\", \"answer\": \"a\"}]";
        assert!(!decode_answer_records(raw).is_parsed());
    }

    #[test]
    fn test_decode_question_list_with_surrounding_text() {
        let raw = "Here are the questions:\n[\n  \"What is deadlock\",\n  \"Explain paging\"\n]\nGood luck!";
        let questions = decode_question_list(raw).into_result().unwrap();
        assert_eq!(questions, vec!["What is deadlock", "Explain paging"]);
    }

    #[test]
    fn test_decode_question_list_without_array() {
        match decode_question_list("1. What is deadlock?\n2. Explain paging.") {
            Decoded::Rejected(ParseError::NoArrayFound { .. }) => {}
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_decode_question_list_not_strings() {
        let decoded = decode_question_list("[1, 2, 3]");
        assert!(matches!(
            decoded,
            Decoded::Rejected(ParseError::InvalidJson { .. })
        ));
    }
}
