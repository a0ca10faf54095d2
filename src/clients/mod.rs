pub mod backend_client;
pub mod llm_client;
pub mod mock_model;
pub mod page_fetcher;

pub use backend_client::{BackendClient, NotesBackend};
pub use llm_client::{LlmClient, TextModel};
pub use mock_model::MockModel;
pub use page_fetcher::PageFetcher;
