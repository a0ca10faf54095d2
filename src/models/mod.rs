pub mod notes;

pub use notes::{
    AnswerRecord, Difficulty, ExportRequest, ExportedDocument, GenerationParams, PageExcerpt,
    DEFAULT_TITLE, NOT_FOUND_ANSWER,
};
