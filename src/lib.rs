//! # Notes Maker
//!
//! 把网页内容整理成学习笔记的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统分为服务端与交互式客户端两部分：
//!
//! ### ① 客户端层（Clients）
//! - `clients/` - 对外部系统的调用，只暴露能力
//! - `PageFetcher` - 下载网页 HTML
//! - `LlmClient` - OpenAI 兼容接口的文本模型（`TextModel` trait）
//! - `BackendClient` - 交互式客户端访问服务端（`NotesBackend` trait）
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，每个服务只做一件事
//! - `ContentExtractor` - 网页正文提取与截断
//! - `AnswerSynthesizer` - 依据页面回答问题
//! - `QuestionGenerator` - 依据页面出题
//! - `DocumentExporter` - 问答记录导出为 docx
//!
//! ### ③ 接口层（Api）
//! - `api/` - axum 路由、请求/响应结构、错误到 HTTP 状态码的映射
//! - `App` - 组装服务并启动 HTTP 服务
//!
//! ### ④ 流程层（Workflow / Console）
//! - `workflow/` - 客户端会话状态机与逐步操作
//! - `console/` - 基于 clap 的行命令控制台
//!
//! ## 二进制
//! - `notes_server` - HTTP 服务端
//! - `notes_client` - 交互式客户端

pub mod api;
pub mod app;
pub mod clients;
pub mod config;
pub mod console;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use app::App;
pub use clients::{BackendClient, LlmClient, MockModel, NotesBackend, TextModel};
pub use config::Config;
pub use error::{AppResult, NotesError};
pub use models::{AnswerRecord, Difficulty, GenerationParams, PageExcerpt};
pub use workflow::{NotesFlow, NotesSession, Phase};
