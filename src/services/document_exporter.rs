//! 文档导出服务 - 业务能力层
//!
//! 只负责"问答记录 → .docx 字节"能力
//!
//! 先生成纯数据的大纲，再交给 `docx-rs` 渲染；
//! 相同输入得到相同大纲。

use docx_rs::{Docx, Paragraph, Run, Style, StyleType};
use std::io::Cursor;
use tracing::info;

use crate::error::{AppResult, SerializationError};
use crate::models::{ExportRequest, ExportedDocument};

/// `found == false` 时在答案前追加的提示段落
pub const NOT_FOUND_DISCLAIMER: &str = "(Not clearly available in the given page.)";

/// docx 的 MIME 类型
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

const TITLE_STYLE: &str = "Heading1";
const QUESTION_STYLE: &str = "Heading2";

/// 文档块
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// 一级标题（文档标题）
    Title(String),
    /// 二级标题（问题）
    Question(String),
    /// 正文段落
    Paragraph(String),
}

/// 生成文档大纲
///
/// 未找到答案时提示段落与答案段落都会输出。
pub fn outline(request: &ExportRequest) -> Vec<Block> {
    let mut blocks = Vec::with_capacity(1 + request.records.len() * 3);
    blocks.push(Block::Title(request.title.clone()));

    for record in &request.records {
        blocks.push(Block::Question(record.question.clone()));
        if !record.found {
            blocks.push(Block::Paragraph(NOT_FOUND_DISCLAIMER.to_string()));
        }
        blocks.push(Block::Paragraph(record.answer.clone()));
    }

    blocks
}

/// 文档导出服务
#[derive(Debug, Default, Clone)]
pub struct DocumentExporter;

impl DocumentExporter {
    pub fn new() -> Self {
        Self
    }

    /// 导出为 .docx
    pub fn export(&self, request: &ExportRequest) -> AppResult<ExportedDocument> {
        let blocks = outline(request);
        let bytes = render(&blocks)?;
        let file_name = request.file_name();

        info!(
            "📦 导出文档: {} ({} 条记录, {} 字节)",
            file_name,
            request.records.len(),
            bytes.len()
        );

        Ok(ExportedDocument { file_name, bytes })
    }
}

/// 渲染大纲为 .docx 字节
pub fn render(blocks: &[Block]) -> AppResult<Vec<u8>> {
    let mut docx = Docx::new()
        .add_style(
            Style::new(TITLE_STYLE, StyleType::Paragraph)
                .name("Heading 1")
                .size(32)
                .bold(),
        )
        .add_style(
            Style::new(QUESTION_STYLE, StyleType::Paragraph)
                .name("Heading 2")
                .size(26)
                .bold(),
        );

    for block in blocks {
        let paragraph = match block {
            Block::Title(text) => text_paragraph(text).style(TITLE_STYLE),
            Block::Question(text) => text_paragraph(text).style(QUESTION_STYLE),
            Block::Paragraph(text) => text_paragraph(text),
        };
        docx = docx.add_paragraph(paragraph);
    }

    let mut buf = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buf)
        .map_err(|e| SerializationError::PackFailed {
            source: Box::new(e),
        })?;

    Ok(buf.into_inner())
}

fn text_paragraph(text: &str) -> Paragraph {
    Paragraph::new().add_run(Run::new().add_text(text))
}
