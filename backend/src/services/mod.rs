pub mod blessing_service;
pub mod llm;
pub mod lunar;
pub mod sanitizer;

pub use blessing_service::BlessingService;
pub use llm::{CompletionClient, LLMClient, LLMError};
