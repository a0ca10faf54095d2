pub mod notes_flow;
pub mod session;

pub use notes_flow::{NotesFlow, StepError, DEFAULT_EXPORT_PATH, PREVIEW_CHARS};
pub use session::{NotesSession, Phase, SessionError, MAX_QUESTIONS_PER_REQUEST};
