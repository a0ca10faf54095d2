//! 笔记流程 - 流程层
//!
//! 核心职责：把用户的每一步操作转成一次后端请求，并在成功后推进会话状态
//!
//! 步骤顺序：
//! 1. scrape → 页面摘录
//! 2. generate / select（可选）或手动输入问题
//! 3. answer → 问答记录
//! 4. export → 写入 docx 文件

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use crate::clients::NotesBackend;
use crate::error::BackendError;
use crate::models::{AnswerRecord, GenerationParams, DEFAULT_TITLE};
use crate::utils::truncate_text;
use crate::workflow::session::{NotesSession, SessionError};

/// 抓取后展示的预览长度
pub const PREVIEW_CHARS: usize = 3000;

/// 缺省导出路径
pub const DEFAULT_EXPORT_PATH: &str = "study_notes.docx";

/// 步骤失败原因
#[derive(Debug, Error)]
pub enum StepError {
    #[error("{0}")]
    Session(#[from] SessionError),
    #[error("{0}")]
    Backend(#[from] BackendError),
    #[error("{0}")]
    InvalidInput(String),
    #[error("写入文件失败 ({path}): {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// 笔记流程
///
/// - 不持有会话，会话由调用方传入
/// - 只依赖 `NotesBackend`，测试时可替换
pub struct NotesFlow<B: NotesBackend> {
    backend: B,
    title: String,
}

impl<B: NotesBackend> NotesFlow<B> {
    /// 创建新的笔记流程
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            title: DEFAULT_TITLE.to_string(),
        }
    }

    /// 设置导出文档标题
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// 抓取页面，返回预览
    pub async fn scrape(&self, session: &mut NotesSession, url: &str) -> Result<String, StepError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(StepError::InvalidInput("Please enter a URL.".to_string()));
        }

        info!("🌐 抓取页面: {}", url);
        let page_text = self.backend.scrape(url).await?;
        info!("✓ 抓取完成，共 {} 字符", page_text.chars().count());

        let preview = truncate_text(&page_text, PREVIEW_CHARS);
        session.on_scraped(page_text);
        Ok(preview)
    }

    /// 生成候选题目
    pub async fn generate(
        &self,
        session: &mut NotesSession,
        params: &GenerationParams,
    ) -> Result<Vec<String>, StepError> {
        let page_text = session.require_page_text()?;
        params.validate().map_err(StepError::InvalidInput)?;

        info!(
            "📝 生成题目: {} 道, {} 分, 难度 {}",
            params.num_questions, params.marks, params.difficulty
        );
        let questions = self.backend.generate_questions(page_text, params).await?;
        if questions.is_empty() {
            warn!("⚠️ 后端没有返回任何题目");
        }

        session.on_generated(questions.clone());
        Ok(questions)
    }

    /// 提交问题并获取答案
    pub async fn answer(&self, session: &mut NotesSession) -> Result<Vec<AnswerRecord>, StepError> {
        let questions = session.questions_to_answer()?;

        info!("🤖 提交 {} 个问题", questions.len());
        let qa = self
            .backend
            .answer_questions(session.page_text(), &questions)
            .await?;

        let missing = qa.iter().filter(|r| !r.found).count();
        if missing > 0 {
            warn!("⚠️ {} 个问题在页面中没有找到明确答案", missing);
        }

        session.on_answered(qa.clone());
        Ok(qa)
    }

    /// 导出 docx 并写入磁盘
    pub async fn export(
        &self,
        session: &mut NotesSession,
        path: Option<&Path>,
    ) -> Result<PathBuf, StepError> {
        let qa = session.require_answers()?;
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_PATH));

        let document = self.backend.export_docx(&self.title, qa).await?;
        tokio::fs::write(&path, &document.bytes)
            .await
            .map_err(|source| StepError::Io {
                path: path.display().to_string(),
                source,
            })?;

        info!(
            "💾 已导出 {} ({} 字节, 服务端文件名 {})",
            path.display(),
            document.bytes.len(),
            document.file_name
        );
        session.on_exported(path.clone());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExportedDocument;
    use crate::workflow::session::Phase;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// 固定返回值的后端替身
    #[derive(Default)]
    struct FakeBackend {
        fail_answers: bool,
        answered: Mutex<Vec<Vec<String>>>,
    }

    #[async_trait]
    impl NotesBackend for FakeBackend {
        async fn scrape(&self, url: &str) -> Result<String, BackendError> {
            if url.contains("missing") {
                return Err(BackendError::Rejected {
                    status: 500,
                    message: "请求返回状态码 404".to_string(),
                    details: None,
                });
            }
            Ok("x".repeat(PREVIEW_CHARS + 100))
        }

        async fn answer_questions(
            &self,
            _page_text: &str,
            questions: &[String],
        ) -> Result<Vec<AnswerRecord>, BackendError> {
            if self.fail_answers {
                return Err(BackendError::Rejected {
                    status: 500,
                    message: "Empty response from model".to_string(),
                    details: None,
                });
            }
            self.answered.lock().unwrap().push(questions.to_vec());
            Ok(questions
                .iter()
                .map(|q| AnswerRecord::new(q.clone(), "answer", true, "snippet"))
                .collect())
        }

        async fn generate_questions(
            &self,
            _page_text: &str,
            params: &GenerationParams,
        ) -> Result<Vec<String>, BackendError> {
            Ok((1..=params.num_questions)
                .map(|i| format!("Question {}", i))
                .collect())
        }

        async fn export_docx(
            &self,
            title: &str,
            _qa: &[AnswerRecord],
        ) -> Result<ExportedDocument, BackendError> {
            Ok(ExportedDocument {
                file_name: format!("{}.docx", title.replace(' ', "_")),
                bytes: b"PK\x03\x04fake".to_vec(),
            })
        }
    }

    #[tokio::test]
    async fn test_scrape_returns_preview_and_stores_full_text() {
        let flow = NotesFlow::new(FakeBackend::default());
        let mut session = NotesSession::new();

        let preview = flow.scrape(&mut session, "https://example.com").await.unwrap();
        assert!(preview.chars().count() <= PREVIEW_CHARS + 3);
        assert_eq!(session.page_text().len(), PREVIEW_CHARS + 100);
        assert_eq!(session.phase(), Phase::Scraped);
    }

    #[tokio::test]
    async fn test_failed_scrape_leaves_state_unchanged() {
        let flow = NotesFlow::new(FakeBackend::default());
        let mut session = NotesSession::new();

        assert!(matches!(
            flow.scrape(&mut session, "   ").await,
            Err(StepError::InvalidInput(_))
        ));
        assert!(matches!(
            flow.scrape(&mut session, "https://example.com/missing").await,
            Err(StepError::Backend(_))
        ));
        assert_eq!(session.phase(), Phase::Empty);
    }

    #[tokio::test]
    async fn test_generate_requires_scrape_and_valid_params() {
        let flow = NotesFlow::new(FakeBackend::default());
        let mut session = NotesSession::new();

        let params = GenerationParams::default();
        assert!(matches!(
            flow.generate(&mut session, &params).await,
            Err(StepError::Session(SessionError::NotScraped))
        ));

        flow.scrape(&mut session, "https://example.com").await.unwrap();
        let bad = GenerationParams {
            marks: 7,
            ..GenerationParams::default()
        };
        assert!(matches!(
            flow.generate(&mut session, &bad).await,
            Err(StepError::InvalidInput(_))
        ));

        let questions = flow.generate(&mut session, &params).await.unwrap();
        assert_eq!(questions.len(), 5);
        assert_eq!(session.phase(), Phase::QuestionsGenerated);
    }

    #[tokio::test]
    async fn test_answer_uses_selection_when_nothing_typed() {
        let flow = NotesFlow::new(FakeBackend::default());
        let mut session = NotesSession::new();
        flow.scrape(&mut session, "https://example.com").await.unwrap();
        flow.generate(&mut session, &GenerationParams::default())
            .await
            .unwrap();
        session.select(&[2, 4]).unwrap();

        let qa = flow.answer(&mut session).await.unwrap();
        assert_eq!(qa.len(), 2);
        assert_eq!(qa[0].question, "Question 2");
        assert_eq!(qa[1].question, "Question 4");
        assert_eq!(session.phase(), Phase::Answered);
        assert_eq!(
            flow.backend.answered.lock().unwrap()[0],
            vec!["Question 2", "Question 4"]
        );
    }

    #[tokio::test]
    async fn test_answer_failure_keeps_previous_phase() {
        let flow = NotesFlow::new(FakeBackend {
            fail_answers: true,
            ..FakeBackend::default()
        });
        let mut session = NotesSession::new();
        flow.scrape(&mut session, "https://example.com").await.unwrap();
        session.set_typed_questions(["What is deadlock?"]);

        let err = flow.answer(&mut session).await.unwrap_err();
        assert!(err.to_string().contains("Empty response"));
        assert_eq!(session.phase(), Phase::Scraped);
        assert!(session.qa().is_empty());
    }

    #[tokio::test]
    async fn test_export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("os_notes.docx");

        let flow = NotesFlow::new(FakeBackend::default()).with_title("OS Notes");
        let mut session = NotesSession::new();

        assert!(matches!(
            flow.export(&mut session, Some(&target)).await,
            Err(StepError::Session(SessionError::NoAnswers))
        ));

        flow.scrape(&mut session, "https://example.com").await.unwrap();
        session.set_typed_questions(["What is deadlock?"]);
        flow.answer(&mut session).await.unwrap();

        let written = flow.export(&mut session, Some(&target)).await.unwrap();
        assert_eq!(written, target);
        let bytes = std::fs::read(&target).unwrap();
        assert!(bytes.starts_with(b"PK"));
        assert_eq!(session.phase(), Phase::Exported);
    }
}
