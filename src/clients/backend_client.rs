/// 后端服务客户端
///
/// 交互式客户端通过它按步骤调用四个端点
use async_trait::async_trait;
use reqwest::header::CONTENT_DISPOSITION;
use reqwest::Response;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::api::dto::{
    AnswerQuestionsRequest, AnswerQuestionsResponse, ErrorResponse, ExportDocxRequest,
    GenerateQuestionsRequest, GenerateQuestionsResponse, ScrapeRequest, ScrapeResponse,
};
use crate::error::BackendError;
use crate::models::{AnswerRecord, ExportedDocument, GenerationParams};

/// 下载时的缺省文件名
pub const DEFAULT_DOWNLOAD_NAME: &str = "study_notes.docx";

/// 笔记后端的四个操作
#[async_trait]
pub trait NotesBackend: Send + Sync {
    /// 抓取网页，返回摘录文本
    async fn scrape(&self, url: &str) -> Result<String, BackendError>;

    /// 根据摘录回答问题
    async fn answer_questions(
        &self,
        page_text: &str,
        questions: &[String],
    ) -> Result<Vec<AnswerRecord>, BackendError>;

    /// 根据摘录生成题目
    async fn generate_questions(
        &self,
        page_text: &str,
        params: &GenerationParams,
    ) -> Result<Vec<String>, BackendError>;

    /// 导出 docx
    async fn export_docx(
        &self,
        title: &str,
        qa: &[AnswerRecord],
    ) -> Result<ExportedDocument, BackendError>;
}

/// 基于 HTTP 的后端客户端
#[derive(Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    /// 创建新的后端客户端
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Response, BackendError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("POST {}", url);

        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|source| BackendError::Transport { source })?;

        if response.status().is_success() {
            Ok(response)
        } else {
            Err(rejection(response).await)
        }
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, BackendError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.post(path, body).await?;
        response.json::<T>().await.map_err(|e| BackendError::Decode {
            reason: e.to_string(),
        })
    }
}

/// 把非 2xx 响应转为错误；响应体不是 `{error}` 时保留原文
async fn rejection(response: Response) -> BackendError {
    let status = response.status().as_u16();
    let text = response.text().await.unwrap_or_default();

    match serde_json::from_str::<ErrorResponse>(&text) {
        Ok(body) => BackendError::Rejected {
            status,
            message: body.error,
            details: body.details,
        },
        Err(_) => BackendError::Rejected {
            status,
            message: format!("HTTP {}", status),
            details: Some(text).filter(|t| !t.trim().is_empty()),
        },
    }
}

/// 从 `Content-Disposition` 中取出文件名
pub fn attachment_file_name(header: Option<&str>) -> String {
    header
        .and_then(|value| {
            value
                .split(';')
                .map(str::trim)
                .find_map(|part| part.strip_prefix("filename="))
        })
        .map(|name| name.trim_matches('"').to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_DOWNLOAD_NAME.to_string())
}

#[async_trait]
impl NotesBackend for BackendClient {
    async fn scrape(&self, url: &str) -> Result<String, BackendError> {
        let body = ScrapeRequest {
            url: url.to_string(),
        };
        let resp: ScrapeResponse = self.post_json("/scrape", &body).await?;
        Ok(resp.page_text)
    }

    async fn answer_questions(
        &self,
        page_text: &str,
        questions: &[String],
    ) -> Result<Vec<AnswerRecord>, BackendError> {
        let body = AnswerQuestionsRequest {
            page_text: page_text.to_string(),
            questions: questions.to_vec(),
        };
        let resp: AnswerQuestionsResponse = self.post_json("/answer-questions", &body).await?;
        Ok(resp.qa)
    }

    async fn generate_questions(
        &self,
        page_text: &str,
        params: &GenerationParams,
    ) -> Result<Vec<String>, BackendError> {
        let body = GenerateQuestionsRequest {
            page_text: page_text.to_string(),
            num_questions: Some(params.num_questions),
            marks: Some(params.marks),
            difficulty: Some(params.difficulty.to_string()),
        };
        let resp: GenerateQuestionsResponse =
            self.post_json("/generate-questions", &body).await?;
        Ok(resp.questions)
    }

    async fn export_docx(
        &self,
        title: &str,
        qa: &[AnswerRecord],
    ) -> Result<ExportedDocument, BackendError> {
        let body = ExportDocxRequest {
            qa: qa.to_vec(),
            title: Some(title.to_string()),
        };
        let response = self.post("/export-docx", &body).await?;

        let file_name = attachment_file_name(
            response
                .headers()
                .get(CONTENT_DISPOSITION)
                .and_then(|v| v.to_str().ok()),
        );
        let bytes = response
            .bytes()
            .await
            .map_err(|source| BackendError::Transport { source })?;

        Ok(ExportedDocument {
            file_name,
            bytes: bytes.to_vec(),
        })
    }
}
