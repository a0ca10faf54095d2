pub mod answer_synthesizer;
pub mod content_extractor;
pub mod document_exporter;
pub mod question_generator;
pub mod reply_decoder;

pub use answer_synthesizer::AnswerSynthesizer;
pub use content_extractor::ContentExtractor;
pub use document_exporter::DocumentExporter;
pub use question_generator::QuestionGenerator;
