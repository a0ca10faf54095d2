//! 控制台命令定义
//!
//! 每一行输入按空白切分后交给 clap 解析，帮助信息与参数错误提示都由 clap 生成。

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::models::{Difficulty, GenerationParams};

/// 一行控制台输入
#[derive(Parser, Debug)]
#[command(
    no_binary_name = true,
    disable_version_flag = true,
    about = "Web page study notes. Maximum 3 questions at a time."
)]
pub struct ConsoleLine {
    #[command(subcommand)]
    pub command: ConsoleCommand,
}

/// 控制台命令
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// Fetch a page and keep its text
    Scrape {
        /// Page URL
        url: String,
    },

    /// Type questions, one per line, blank line to finish
    #[command(visible_alias = "questions")]
    Ask,

    /// Generate exam questions from the page
    Generate {
        /// Number of questions (1-20)
        #[arg(default_value_t = GenerationParams::DEFAULT_COUNT)]
        count: u32,

        /// Marks per question (5, 10 or 15)
        #[arg(default_value_t = GenerationParams::DEFAULT_MARKS)]
        marks: u32,

        /// easy, exam or hard
        #[arg(default_value = "exam")]
        difficulty: Difficulty,
    },

    /// Pick generated questions by number, e.g. `select 1,3`
    Select {
        #[arg(required = true, num_args = 1.., value_delimiter = ',')]
        indices: Vec<usize>,
    },

    /// Answer the typed questions, or the selected ones
    Answer,

    /// Show the current notes
    Notes,

    /// Save the notes as a .docx file
    Export {
        /// Output path (default: study_notes.docx)
        path: Option<PathBuf>,
    },

    /// Show the session state
    Status,

    /// Leave the console
    #[command(visible_alias = "exit")]
    Quit,
}

impl ConsoleCommand {
    /// 解析一行输入；空行返回 `None`
    pub fn parse_line(line: &str) -> Option<Result<Self, clap::Error>> {
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.is_empty() {
            return None;
        }
        Some(ConsoleLine::try_parse_from(words).map(|parsed| parsed.command))
    }

    /// `generate` 的参数
    pub fn generation_params(count: u32, marks: u32, difficulty: Difficulty) -> GenerationParams {
        GenerationParams {
            num_questions: count,
            marks,
            difficulty,
        }
    }
}
