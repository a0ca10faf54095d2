//! HTTP 路由

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers::{
    answer_questions, export_docx, generate_questions, health, scrape, NotesHandlers,
};

/// 四个业务端点 + 健康检查
pub fn notes_routes(handlers: NotesHandlers) -> Router {
    Router::new()
        .route("/scrape", post(scrape))
        .route("/answer-questions", post(answer_questions))
        .route("/generate-questions", post(generate_questions))
        .route("/export-docx", post(export_docx))
        .route("/health", get(health))
        .with_state(handlers)
}

/// 完整的服务路由：允许跨域，并记录每个请求
pub fn build_router(handlers: NotesHandlers) -> Router {
    notes_routes(handlers)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
