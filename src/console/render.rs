//! 控制台文本输出

use std::fmt::Write;

use crate::models::{AnswerRecord, NOT_FOUND_ANSWER};
use crate::workflow::NotesSession;

/// 问答笔记
pub fn render_notes(qa: &[AnswerRecord]) -> String {
    if qa.is_empty() {
        return "Run steps 1 and 2 to see generated notes here.\n".to_string();
    }

    let mut out = String::new();
    for (i, record) in qa.iter().enumerate() {
        let _ = writeln!(out, "Q{}. {}", i + 1, record.question);
        if !record.found {
            let _ = writeln!(out, "⚠ {}", NOT_FOUND_ANSWER);
        }
        let _ = writeln!(out, "{}", record.answer);
        if !record.source_snippet.is_empty() {
            let _ = writeln!(out, "  来源: {}", record.source_snippet);
        }
        out.push('\n');
    }
    out
}

/// 带编号的题目列表，选中的题目前加 `*`
pub fn render_question_list(questions: &[String], selected: &[String]) -> String {
    let mut out = String::new();
    for (i, question) in questions.iter().enumerate() {
        let mark = if selected.contains(question) { '*' } else { ' ' };
        let _ = writeln!(out, "{} {:>2}. {}", mark, i + 1, question);
    }
    out
}

/// 会话状态摘要
pub fn render_status(session: &NotesSession) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "阶段: {}", session.phase());
    let _ = writeln!(out, "页面文本: {} 字符", session.page_text().chars().count());
    let _ = writeln!(out, "手动输入的问题: {}", session.typed_questions().len());
    let _ = writeln!(
        out,
        "候选题目: {} (已选 {})",
        session.generated().len(),
        session.selected().len()
    );
    let _ = writeln!(out, "问答记录: {}", session.qa().len());
    if let Some(path) = session.last_export() {
        let _ = writeln!(out, "最近导出: {}", path.display());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_notes_marks_missing_answers() {
        let qa = vec![
            AnswerRecord::new("What is deadlock?", "A cycle of waiting.", true, "Deadlock is..."),
            AnswerRecord::new("Who wrote it?", NOT_FOUND_ANSWER, false, ""),
        ];
        let text = render_notes(&qa);

        assert!(text.starts_with("Q1. What is deadlock?\nA cycle of waiting.\n"));
        assert!(text.contains("来源: Deadlock is..."));
        assert!(text.contains("Q2. Who wrote it?\n⚠ Not clearly available"));
        assert_eq!(text.matches("来源").count(), 1);
    }

    #[test]
    fn test_render_notes_empty() {
        assert!(render_notes(&[]).contains("Run steps 1 and 2"));
    }

    #[test]
    fn test_render_question_list() {
        let questions = vec!["A".to_string(), "B".to_string()];
        let text = render_question_list(&questions, &["B".to_string()]);
        assert_eq!(text, "   1. A\n*  2. B\n");
    }

    #[test]
    fn test_render_status() {
        let mut session = NotesSession::new();
        session.on_scraped("abc".to_string());
        let text = render_status(&session);
        assert!(text.contains("阶段: 已抓取"));
        assert!(text.contains("页面文本: 3 字符"));
    }
}
