//! HTTP 处理函数
//!
//! 每个处理函数都是无状态的：校验字段 → 调用单个服务 → 映射结果。
//! 输入错误返回 400，其余错误一律 500，响应体 `{ "error": ... }`。

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::{error, info, warn};

use super::dto::{
    AnswerQuestionsRequest, AnswerQuestionsResponse, ErrorResponse, ExportDocxRequest,
    GenerateQuestionsRequest, GenerateQuestionsResponse, HealthResponse, ScrapeRequest,
    ScrapeResponse,
};
use crate::clients::TextModel;
use crate::config::Config;
use crate::error::{AppResult, InputError, NotesError};
use crate::services::document_exporter::DOCX_MIME;
use crate::services::{AnswerSynthesizer, ContentExtractor, DocumentExporter, QuestionGenerator};

// ========== 处理函数共享状态 ==========

/// 四个服务的只读句柄
#[derive(Clone)]
pub struct NotesHandlers {
    extractor: Arc<ContentExtractor>,
    synthesizer: Arc<AnswerSynthesizer>,
    generator: Arc<QuestionGenerator>,
    exporter: Arc<DocumentExporter>,
}

impl NotesHandlers {
    pub fn new(
        extractor: Arc<ContentExtractor>,
        synthesizer: Arc<AnswerSynthesizer>,
        generator: Arc<QuestionGenerator>,
        exporter: Arc<DocumentExporter>,
    ) -> Self {
        Self {
            extractor,
            synthesizer,
            generator,
            exporter,
        }
    }

    /// 由配置和模型句柄构造全部服务
    pub fn from_config(config: &Config, model: Arc<dyn TextModel>) -> Self {
        Self::new(
            Arc::new(ContentExtractor::new(config)),
            Arc::new(AnswerSynthesizer::new(model.clone())),
            Arc::new(QuestionGenerator::new(model)),
            Arc::new(DocumentExporter::new()),
        )
    }
}

// ========== 错误映射 ==========

impl IntoResponse for NotesError {
    fn into_response(self) -> Response {
        let status = status_for(&self);
        log_failure(&self, status);
        (status, Json(ErrorResponse::new(self.message()))).into_response()
    }
}

fn status_for(err: &NotesError) -> StatusCode {
    if err.is_input() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

fn log_failure(err: &NotesError, status: StatusCode) {
    if status.is_server_error() {
        error!("❌ [{}] {}", err.kind(), err);
    } else {
        warn!("⚠️ [{}] {}", err.kind(), err);
    }
}

/// 请求体不是合法 JSON 时也返回 `{ "error": ... }`
fn body_error(rejection: JsonRejection) -> NotesError {
    NotesError::Input(InputError::MalformedBody {
        reason: rejection.body_text(),
    })
}

// ========== HTTP 处理函数 ==========

/// POST /scrape
pub async fn scrape(
    State(handlers): State<NotesHandlers>,
    payload: Result<Json<ScrapeRequest>, JsonRejection>,
) -> Result<Json<ScrapeResponse>, NotesError> {
    let Json(req) = payload.map_err(body_error)?;
    let url = req.url.trim();
    if url.is_empty() {
        return Err(NotesError::missing_field("url"));
    }

    info!("🔍 抓取网页: {}", url);
    let excerpt = handlers.extractor.extract(url).await?;

    Ok(Json(ScrapeResponse {
        page_text: excerpt.into_string(),
    }))
}

/// POST /answer-questions
pub async fn answer_questions(
    State(handlers): State<NotesHandlers>,
    payload: Result<Json<AnswerQuestionsRequest>, JsonRejection>,
) -> Result<Json<AnswerQuestionsResponse>, NotesError> {
    let Json(req) = payload.map_err(body_error)?;

    let qa = handlers
        .synthesizer
        .answer(&req.page_text, &req.questions)
        .await?;

    Ok(Json(AnswerQuestionsResponse { qa }))
}

/// POST /generate-questions
///
/// 服务端失败时附带 `details`
pub async fn generate_questions(
    State(handlers): State<NotesHandlers>,
    payload: Result<Json<GenerateQuestionsRequest>, JsonRejection>,
) -> Response {
    match run_generate(&handlers, payload).await {
        Ok(questions) => Json(GenerateQuestionsResponse { questions }).into_response(),
        Err(e) if e.is_input() => e.into_response(),
        Err(e) => {
            let status = status_for(&e);
            log_failure(&e, status);
            (
                status,
                Json(ErrorResponse::new("Failed to generate questions").with_details(e.message())),
            )
                .into_response()
        }
    }
}

async fn run_generate(
    handlers: &NotesHandlers,
    payload: Result<Json<GenerateQuestionsRequest>, JsonRejection>,
) -> AppResult<Vec<String>> {
    let Json(req) = payload.map_err(body_error)?;
    let params = req.params()?;
    handlers.generator.generate(&req.page_text, &params).await
}

/// POST /export-docx
pub async fn export_docx(
    State(handlers): State<NotesHandlers>,
    payload: Result<Json<ExportDocxRequest>, JsonRejection>,
) -> Result<Response, NotesError> {
    let Json(req) = payload.map_err(body_error)?;
    let request = req.into_export_request();

    let doc = handlers.exporter.export(&request)?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, DOCX_MIME.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", doc.file_name),
            ),
        ],
        doc.bytes,
    )
        .into_response())
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
