//! HTTP 请求 / 响应结构
//!
//! 字段名与线上协议保持一致（`pageText`、`num_questions` 等），
//! 客户端也复用这些结构。

use serde::{Deserialize, Serialize};

use crate::error::{AppResult, NotesError};
use crate::models::{AnswerRecord, Difficulty, ExportRequest, GenerationParams, DEFAULT_TITLE};

// ========== 请求 ==========

/// POST /scrape
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScrapeRequest {
    #[serde(default)]
    pub url: String,
}

/// POST /answer-questions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnswerQuestionsRequest {
    #[serde(rename = "pageText", default)]
    pub page_text: String,
    #[serde(default)]
    pub questions: Vec<String>,
}

/// POST /generate-questions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateQuestionsRequest {
    #[serde(rename = "pageText", default)]
    pub page_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_questions: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marks: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
}

impl GenerateQuestionsRequest {
    /// 转为出题参数，缺省值：5 道 / 10 分 / exam
    ///
    /// 难度标签不做限制，原样交给提示词。
    pub fn params(&self) -> AppResult<GenerationParams> {
        let difficulty = match self.difficulty.as_deref().map(str::trim) {
            None | Some("") => Difficulty::default(),
            Some(raw) => raw
                .parse::<Difficulty>()
                .map_err(|reason| NotesError::invalid_value("difficulty", reason))?,
        };

        Ok(GenerationParams {
            num_questions: self.num_questions.unwrap_or(GenerationParams::DEFAULT_COUNT),
            marks: self.marks.unwrap_or(GenerationParams::DEFAULT_MARKS),
            difficulty,
        })
    }
}

/// POST /export-docx
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportDocxRequest {
    #[serde(default)]
    pub qa: Vec<AnswerRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl ExportDocxRequest {
    /// 标题缺省或为空白时使用 "Study Notes"
    pub fn into_export_request(self) -> ExportRequest {
        let title = self
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TITLE.to_string());
        ExportRequest::new(title, self.qa)
    }
}

// ========== 响应 ==========

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeResponse {
    #[serde(rename = "pageText")]
    pub page_text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerQuestionsResponse {
    pub qa: Vec<AnswerRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateQuestionsResponse {
    pub questions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// 错误响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_request_defaults() {
        let req: GenerateQuestionsRequest =
            serde_json::from_str(r#"{"pageText": "Deadlock is..."}"#).unwrap();
        let params = req.params().unwrap();
        assert_eq!(params, GenerationParams::default());
    }

    #[test]
    fn test_generate_request_free_form_difficulty() {
        let req: GenerateQuestionsRequest =
            serde_json::from_str(r#"{"pageText": "x", "difficulty": "nightmare"}"#).unwrap();
        assert_eq!(
            req.params().unwrap().difficulty,
            Difficulty::Other("nightmare".to_string())
        );

        let blank: GenerateQuestionsRequest =
            serde_json::from_str(r#"{"pageText": "x", "difficulty": " "}"#).unwrap();
        assert_eq!(blank.params().unwrap().difficulty, Difficulty::Exam);
    }

    #[test]
    fn test_export_request_title_default() {
        let req: ExportDocxRequest = serde_json::from_str(r#"{"qa": []}"#).unwrap();
        assert_eq!(req.into_export_request().title, DEFAULT_TITLE);

        let blank = ExportDocxRequest {
            qa: vec![],
            title: Some("  ".to_string()),
        };
        assert_eq!(blank.into_export_request().title, DEFAULT_TITLE);
    }

    #[test]
    fn test_wire_field_names() {
        let json = serde_json::to_value(AnswerQuestionsRequest {
            page_text: "text".to_string(),
            questions: vec!["q".to_string()],
        })
        .unwrap();
        assert_eq!(json["pageText"], "text");

        let err = serde_json::to_value(ErrorResponse::new("boom")).unwrap();
        assert!(err.get("details").is_none());
    }
}
