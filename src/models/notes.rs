//! 笔记数据模型
//!
//! 每个处理阶段都由输入产生新值，不做原地修改。

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// 模型判定"页面中没有答案"时的固定提示
pub const NOT_FOUND_ANSWER: &str = "Not clearly available in the given page.";

/// 默认文档标题
pub const DEFAULT_TITLE: &str = "Study Notes";

/// 网页摘录
///
/// 创建时按字符数截断，之后不可变。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageExcerpt {
    text: String,
}

impl PageExcerpt {
    /// 截断到 `max_chars` 个字符
    pub fn new(text: impl Into<String>, max_chars: usize) -> Self {
        let text = text.into();
        let text = match text.char_indices().nth(max_chars) {
            Some((byte_idx, _)) => text[..byte_idx].to_string(),
            None => text,
        };
        Self { text }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// 字符数（不是字节数）
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

impl fmt::Display for PageExcerpt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// 问答记录
///
/// 缺失的键或 `null` 取默认值：`found` 默认为 true，文本字段默认为空。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub question: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub answer: String,
    #[serde(default = "default_found", deserialize_with = "null_as_found")]
    pub found: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub source_snippet: String,
}

fn default_found() -> bool {
    true
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_found<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or_else(default_found))
}

impl AnswerRecord {
    pub fn new(
        question: impl Into<String>,
        answer: impl Into<String>,
        found: bool,
        source_snippet: impl Into<String>,
    ) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            found,
            source_snippet: source_snippet.into(),
        }
    }
}

/// 题目难度
///
/// 服务端把其他标签原样写进提示词；客户端只允许三个预设档位。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Exam,
    Hard,
    Other(String),
}

impl Difficulty {
    pub fn as_str(&self) -> &str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Exam => "exam",
            Difficulty::Hard => "hard",
            Difficulty::Other(label) => label,
        }
    }

    /// 是否为预设档位
    pub fn is_preset(&self) -> bool {
        !matches!(self, Difficulty::Other(_))
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim();
        match label.to_ascii_lowercase().as_str() {
            "" => Err("难度不能为空".to_string()),
            "easy" => Ok(Difficulty::Easy),
            "exam" => Ok(Difficulty::Exam),
            "hard" => Ok(Difficulty::Hard),
            _ => Ok(Difficulty::Other(label.to_string())),
        }
    }
}

/// 出题参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationParams {
    pub num_questions: u32,
    pub marks: u32,
    pub difficulty: Difficulty,
}

impl GenerationParams {
    pub const DEFAULT_COUNT: u32 = 5;
    pub const DEFAULT_MARKS: u32 = 10;
    /// 客户端允许的最大出题数量
    pub const MAX_COUNT: u32 = 20;
    /// 客户端允许的分值档位
    pub const ALLOWED_MARKS: [u32; 3] = [5, 10, 15];

    /// 客户端侧校验（服务端对参数原样透传）
    pub fn validate(&self) -> Result<(), String> {
        if !(1..=Self::MAX_COUNT).contains(&self.num_questions) {
            return Err(format!(
                "题目数量必须在 1 到 {} 之间，当前为 {}",
                Self::MAX_COUNT,
                self.num_questions
            ));
        }
        if !Self::ALLOWED_MARKS.contains(&self.marks) {
            return Err(format!("分值只能是 5 / 10 / 15，当前为 {}", self.marks));
        }
        if !self.difficulty.is_preset() {
            return Err(format!(
                "未知难度 '{}'，可选: easy / exam / hard",
                self.difficulty
            ));
        }
        Ok(())
    }
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            num_questions: Self::DEFAULT_COUNT,
            marks: Self::DEFAULT_MARKS,
            difficulty: Difficulty::default(),
        }
    }
}

/// 导出请求，只使用一次
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    pub title: String,
    pub records: Vec<AnswerRecord>,
}

impl ExportRequest {
    pub fn new(title: impl Into<String>, records: Vec<AnswerRecord>) -> Self {
        Self {
            title: title.into(),
            records,
        }
    }

    /// 下载文件名：空白、控制字符、引号和反斜杠替换为下划线，
    /// 结果可以直接放进 `Content-Disposition`
    pub fn file_name(&self) -> String {
        let stem: String = self
            .title
            .chars()
            .map(|c| match c {
                c if c.is_whitespace() || c.is_control() => '_',
                '"' | '\\' => '_',
                c => c,
            })
            .collect();
        format!("{}.docx", stem)
    }
}

/// 导出的文档
#[derive(Debug, Clone)]
pub struct ExportedDocument {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_excerpt_truncates_by_chars() {
        let excerpt = PageExcerpt::new("死锁是指两个进程", 2);
        assert_eq!(excerpt.as_str(), "死锁");
        assert_eq!(excerpt.char_len(), 2);

        let short = PageExcerpt::new("abc", 10);
        assert_eq!(short.as_str(), "abc");
    }

    #[test]
    fn test_answer_record_defaults_missing_keys() {
        let record: AnswerRecord = serde_json::from_str(r#"{"question": "What is deadlock?"}"#).unwrap();
        assert_eq!(record.question, "What is deadlock?");
        assert_eq!(record.answer, "");
        assert!(record.found);
        assert_eq!(record.source_snippet, "");
    }

    #[test]
    fn test_answer_record_null_fields_take_defaults() {
        let record: AnswerRecord = serde_json::from_str(
            r#"{"question": "Q", "answer": null, "found": null, "source_snippet": null}"#,
        )
        .unwrap();
        assert_eq!(record, AnswerRecord::new("Q", "", true, ""));

        let record: AnswerRecord = serde_json::from_str(
            r#"{"question": "Q", "answer": "...", "found": false, "source_snippet": null}"#,
        )
        .unwrap();
        assert!(!record.found);
        assert_eq!(record.source_snippet, "");
    }

    #[test]
    fn test_difficulty_parsing() {
        assert_eq!("Hard".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert_eq!(
            " university final ".parse::<Difficulty>().unwrap(),
            Difficulty::Other("university final".to_string())
        );
        assert!("  ".parse::<Difficulty>().is_err());
        assert_eq!(Difficulty::Other("tricky".to_string()).to_string(), "tricky");
    }

    #[test]
    fn test_generation_params_validate() {
        assert!(GenerationParams::default().validate().is_ok());

        let too_many = GenerationParams {
            num_questions: 21,
            ..Default::default()
        };
        assert!(too_many.validate().is_err());

        let odd_marks = GenerationParams {
            marks: 7,
            ..Default::default()
        };
        assert!(odd_marks.validate().is_err());

        let custom = GenerationParams {
            difficulty: Difficulty::Other("brutal".to_string()),
            ..Default::default()
        };
        assert!(custom.validate().is_err());
    }

    #[test]
    fn test_export_file_name() {
        let req = ExportRequest::new("OS Exam Notes", vec![]);
        assert_eq!(req.file_name(), "OS_Exam_Notes.docx");
    }

    #[test]
    fn test_export_file_name_is_header_safe() {
        let req = ExportRequest::new("OS\nNotes \"v2\"\\draft\t", vec![]);
        let name = req.file_name();
        assert_eq!(name, "OS_Notes__v2__draft_.docx");
        assert!(name.chars().all(|c| !c.is_control() && c != '"' && c != '\\'));

        let unicode = ExportRequest::new("操作系统 笔记", vec![]);
        assert_eq!(unicode.file_name(), "操作系统_笔记.docx");
    }
}
