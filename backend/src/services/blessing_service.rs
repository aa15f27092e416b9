use std::sync::Arc;

use crate::models::{GenerationRequest, GenerationResult};
use crate::services::llm::{BlessingPrompt, CompletionClient, LLMError};
use crate::services::{lunar, sanitizer};

pub const EMPTY_RESPONSE_MESSAGE: &str = "生成祝福语失败，请重试。";
pub const ERROR_MESSAGE_PREFIX: &str = "生成祝福语时出错: ";

pub struct BlessingService {
    client: Arc<dyn CompletionClient>,
}

impl BlessingService {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    /// Generate a blessing for a validated request.
    ///
    /// Never fails: upstream errors become a readable message in
    /// `blessing_text` so the caller always gets a 200 once validation passed.
    pub async fn generate(&self, request: &GenerationRequest) -> GenerationResult {
        let prompt = BlessingPrompt::new(lunar::year_fact(request.year), request);

        let blessing_text = match self.client.complete(&prompt.render()).await {
            Ok(text) => sanitizer::sanitize(&text, request.category.is_microblog()),
            Err(e) => {
                tracing::warn!("Blessing generation failed: {}", e);
                fallback_message(&e)
            },
        };

        let fact = prompt.fact;
        GenerationResult {
            blessing_text,
            lunar_year_name: fact.lunar_year_name,
            zodiac: fact.zodiac,
        }
    }
}

/// Text shown in place of a blessing when the completion call failed
pub fn fallback_message(err: &LLMError) -> String {
    match err {
        LLMError::EmptyResponse => EMPTY_RESPONSE_MESSAGE.to_string(),
        other => format!("{}{}", ERROR_MESSAGE_PREFIX, other),
    }
}
