//! 客户端会话状态
//!
//! 显式的有限状态对象，在各步骤之间传递。
//!
//! ```text
//! Empty → Scraped → Answered → Exported
//!            ↘ QuestionsGenerated ↗
//! ```
//!
//! 只在用户显式操作且请求成功后迁移；失败不改变状态。

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::models::AnswerRecord;

/// 一次最多提交的问题数量
pub const MAX_QUESTIONS_PER_REQUEST: usize = 3;

/// 会话阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Empty,
    Scraped,
    QuestionsGenerated,
    Answered,
    Exported,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Empty => "未抓取",
            Phase::Scraped => "已抓取",
            Phase::QuestionsGenerated => "已生成题目",
            Phase::Answered => "已生成答案",
            Phase::Exported => "已导出",
        };
        f.write_str(name)
    }
}

/// 步骤前置条件不满足
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Scrape the page first (step 1).")]
    NotScraped,
    #[error("Please enter at least one question.")]
    NoQuestions,
    #[error("Maximum {max} questions at a time, got {got}.")]
    TooManyQuestions { max: usize, got: usize },
    #[error("No generated questions to select from. Run `generate` first.")]
    NothingGenerated,
    #[error("Question #{index} does not exist (1..={len}).")]
    SelectionOutOfRange { index: usize, len: usize },
    #[error("No notes yet. Run `answer` first.")]
    NoAnswers,
}

/// 客户端会话
#[derive(Debug, Clone, Default)]
pub struct NotesSession {
    phase: Phase,
    page_text: String,
    /// 用户手动输入的问题
    typed_questions: Vec<String>,
    /// 模型生成的候选题目
    generated: Vec<String>,
    /// 从候选题目中选中的
    selected: Vec<String>,
    qa: Vec<AnswerRecord>,
    last_export: Option<PathBuf>,
}

impl NotesSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn page_text(&self) -> &str {
        &self.page_text
    }

    pub fn typed_questions(&self) -> &[String] {
        &self.typed_questions
    }

    pub fn generated(&self) -> &[String] {
        &self.generated
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn qa(&self) -> &[AnswerRecord] {
        &self.qa
    }

    pub fn last_export(&self) -> Option<&PathBuf> {
        self.last_export.as_ref()
    }

    /// 已抓取页面才能出题 / 答题
    pub fn require_page_text(&self) -> Result<&str, SessionError> {
        if self.page_text.is_empty() {
            Err(SessionError::NotScraped)
        } else {
            Ok(&self.page_text)
        }
    }

    /// 本次要提交的问题：优先使用手动输入，否则使用选中的候选题目
    pub fn questions_to_answer(&self) -> Result<Vec<String>, SessionError> {
        self.require_page_text()?;

        let questions = if self.typed_questions.is_empty() {
            self.selected.clone()
        } else {
            self.typed_questions.clone()
        };

        if questions.is_empty() {
            return Err(SessionError::NoQuestions);
        }
        if questions.len() > MAX_QUESTIONS_PER_REQUEST {
            return Err(SessionError::TooManyQuestions {
                max: MAX_QUESTIONS_PER_REQUEST,
                got: questions.len(),
            });
        }
        Ok(questions)
    }

    // ========== 状态迁移 ==========

    /// 抓取成功：替换页面文本，之前的结果全部作废
    pub fn on_scraped(&mut self, page_text: String) {
        self.page_text = page_text;
        self.generated.clear();
        self.selected.clear();
        self.qa.clear();
        self.last_export = None;
        self.phase = Phase::Scraped;
    }

    /// 记录手动输入的问题（空行会被忽略）
    pub fn set_typed_questions<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.typed_questions = lines
            .into_iter()
            .map(|l| l.as_ref().trim().to_string())
            .filter(|l| !l.is_empty())
            .collect();
    }

    /// 出题成功
    pub fn on_generated(&mut self, questions: Vec<String>) {
        self.generated = questions;
        self.selected.clear();
        self.phase = Phase::QuestionsGenerated;
    }

    /// 选中候选题目（从 1 开始编号），整体校验通过才生效
    pub fn select(&mut self, indices: &[usize]) -> Result<&[String], SessionError> {
        if self.generated.is_empty() {
            return Err(SessionError::NothingGenerated);
        }
        let len = self.generated.len();

        let mut picked = Vec::with_capacity(indices.len());
        for &index in indices {
            if index == 0 || index > len {
                return Err(SessionError::SelectionOutOfRange { index, len });
            }
            let question = &self.generated[index - 1];
            if !picked.contains(question) {
                picked.push(question.clone());
            }
        }

        self.selected = picked;
        Ok(&self.selected)
    }

    /// 答题成功
    pub fn on_answered(&mut self, qa: Vec<AnswerRecord>) {
        self.qa = qa;
        self.phase = Phase::Answered;
    }

    /// 导出前检查
    pub fn require_answers(&self) -> Result<&[AnswerRecord], SessionError> {
        if self.qa.is_empty() {
            Err(SessionError::NoAnswers)
        } else {
            Ok(&self.qa)
        }
    }

    /// 导出成功
    pub fn on_exported(&mut self, path: PathBuf) {
        self.last_export = Some(path);
        self.phase = Phase::Exported;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scraped() -> NotesSession {
        let mut session = NotesSession::new();
        session.on_scraped("Deadlock is...".to_string());
        session
    }

    #[test]
    fn test_starts_empty() {
        let session = NotesSession::new();
        assert_eq!(session.phase(), Phase::Empty);
        assert_eq!(session.questions_to_answer(), Err(SessionError::NotScraped));
        assert_eq!(session.require_answers().unwrap_err(), SessionError::NoAnswers);
    }

    #[test]
    fn test_typed_questions_preferred_over_selection() {
        let mut session = scraped();
        session.on_generated(vec!["Generated A".into(), "Generated B".into()]);
        session.select(&[2]).unwrap();
        assert_eq!(session.questions_to_answer().unwrap(), vec!["Generated B"]);

        session.set_typed_questions(["  What is deadlock?  ", "", "Define thread."]);
        assert_eq!(
            session.questions_to_answer().unwrap(),
            vec!["What is deadlock?", "Define thread."]
        );
    }

    #[test]
    fn test_question_limit() {
        let mut session = scraped();
        session.set_typed_questions(["a", "b", "c", "d"]);
        assert_eq!(
            session.questions_to_answer(),
            Err(SessionError::TooManyQuestions { max: 3, got: 4 })
        );
    }

    #[test]
    fn test_no_questions() {
        let session = scraped();
        assert_eq!(session.questions_to_answer(), Err(SessionError::NoQuestions));
    }

    #[test]
    fn test_select_validation_keeps_previous_selection() {
        let mut session = scraped();
        assert_eq!(session.select(&[1]), Err(SessionError::NothingGenerated));

        session.on_generated(vec!["A".into(), "B".into(), "C".into()]);
        session.select(&[1, 3, 1]).unwrap();
        assert_eq!(session.selected(), ["A", "C"]);

        assert_eq!(
            session.select(&[2, 4]),
            Err(SessionError::SelectionOutOfRange { index: 4, len: 3 })
        );
        assert_eq!(session.selected(), ["A", "C"]);
    }

    #[test]
    fn test_full_path() {
        let mut session = scraped();
        assert_eq!(session.phase(), Phase::Scraped);

        session.on_generated(vec!["What is deadlock".into()]);
        assert_eq!(session.phase(), Phase::QuestionsGenerated);

        session.select(&[1]).unwrap();
        session.on_answered(vec![AnswerRecord::new("What is deadlock", "...", true, "")]);
        assert_eq!(session.phase(), Phase::Answered);

        session.on_exported(PathBuf::from("study_notes.docx"));
        assert_eq!(session.phase(), Phase::Exported);
        assert!(session.last_export().is_some());
    }

    #[test]
    fn test_rescrape_resets_results() {
        let mut session = scraped();
        session.on_generated(vec!["A".into()]);
        session.on_answered(vec![AnswerRecord::new("A", "a", true, "")]);

        session.on_scraped("New page".to_string());
        assert_eq!(session.phase(), Phase::Scraped);
        assert!(session.generated().is_empty());
        assert!(session.qa().is_empty());
        assert_eq!(session.page_text(), "New page");
    }
}
