//! 交互式控制台
//!
//! 一行一个命令，每个命令对应一次后端请求；失败只打印错误，会话保持不变。

pub mod commands;
pub mod render;

use anyhow::Result;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tracing::debug;

use crate::clients::NotesBackend;
use crate::workflow::{NotesFlow, NotesSession, MAX_QUESTIONS_PER_REQUEST};
pub use commands::{ConsoleCommand, ConsoleLine};

/// 控制台提示符
pub const PROMPT: &str = "notes> ";

/// 命令执行后的去向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Next {
    Continue,
    Quit,
}

/// 交互式控制台
pub struct Console<B: NotesBackend, W: Write> {
    flow: NotesFlow<B>,
    session: NotesSession,
    out: W,
}

impl<B: NotesBackend, W: Write> Console<B, W> {
    /// 创建新的控制台
    pub fn new(flow: NotesFlow<B>, out: W) -> Self {
        Self {
            flow,
            session: NotesSession::new(),
            out,
        }
    }

    pub fn session(&self) -> &NotesSession {
        &self.session
    }

    /// 取回输出端（测试时读取输出）
    pub fn into_output(self) -> W {
        self.out
    }

    /// 读取输入直到 `quit` 或输入结束
    pub async fn run<R>(&mut self, input: R) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();

        loop {
            write!(self.out, "{}", PROMPT)?;
            self.out.flush()?;

            let Some(line) = lines.next_line().await? else {
                writeln!(self.out)?;
                break;
            };

            let command = match ConsoleCommand::parse_line(&line) {
                None => continue,
                Some(Ok(command)) => command,
                Some(Err(e)) => {
                    write!(self.out, "{}", e.render())?;
                    continue;
                }
            };

            debug!("控制台命令: {:?}", command);
            if self.execute(command, &mut lines).await? == Next::Quit {
                break;
            }
        }
        Ok(())
    }

    async fn execute<R>(&mut self, command: ConsoleCommand, lines: &mut Lines<R>) -> Result<Next>
    where
        R: AsyncBufRead + Unpin,
    {
        match command {
            ConsoleCommand::Scrape { url } => match self.flow.scrape(&mut self.session, &url).await {
                Ok(preview) => {
                    writeln!(self.out, "Page text extracted!")?;
                    writeln!(self.out, "{}", preview)?;
                }
                Err(e) => writeln!(self.out, "{}", e)?,
            },

            ConsoleCommand::Ask => {
                writeln!(
                    self.out,
                    "Enter up to {} questions, one per line. Blank line to finish.",
                    MAX_QUESTIONS_PER_REQUEST
                )?;
                let mut typed = Vec::new();
                while let Some(line) = lines.next_line().await? {
                    if line.trim().is_empty() {
                        break;
                    }
                    typed.push(line);
                }
                self.session.set_typed_questions(typed);
                writeln!(
                    self.out,
                    "{} question(s) ready.",
                    self.session.typed_questions().len()
                )?;
            }

            ConsoleCommand::Generate {
                count,
                marks,
                difficulty,
            } => {
                let params = ConsoleCommand::generation_params(count, marks, difficulty);
                match self.flow.generate(&mut self.session, &params).await {
                    Ok(questions) => {
                        writeln!(
                            self.out,
                            "Questions generated! Select the ones you want to use with `select`."
                        )?;
                        write!(
                            self.out,
                            "{}",
                            render::render_question_list(&questions, self.session.selected())
                        )?;
                    }
                    Err(e) => writeln!(self.out, "Failed to generate questions: {}", e)?,
                }
            }

            ConsoleCommand::Select { indices } => match self.session.select(&indices).map(|_| ()) {
                Ok(()) => write!(
                    self.out,
                    "{}",
                    render::render_question_list(self.session.generated(), self.session.selected())
                )?,
                Err(e) => writeln!(self.out, "{}", e)?,
            },

            ConsoleCommand::Answer => match self.flow.answer(&mut self.session).await {
                Ok(qa) => {
                    writeln!(self.out, "Answers generated!")?;
                    write!(self.out, "{}", render::render_notes(&qa))?;
                }
                Err(e) => writeln!(self.out, "{}", e)?,
            },

            ConsoleCommand::Notes => write!(self.out, "{}", render::render_notes(self.session.qa()))?,

            ConsoleCommand::Export { path } => {
                match self.flow.export(&mut self.session, path.as_deref()).await {
                    Ok(written) => writeln!(self.out, "Saved {}", written.display())?,
                    Err(e) => writeln!(self.out, "{}", e)?,
                }
            }

            ConsoleCommand::Status => write!(self.out, "{}", render::render_status(&self.session))?,

            ConsoleCommand::Quit => return Ok(Next::Quit),
        }
        Ok(Next::Continue)
    }
}
