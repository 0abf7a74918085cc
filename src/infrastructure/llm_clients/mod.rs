pub mod openai;

use crate::domain::error::Result;
use crate::domain::llm_config::LlmConfig;
use async_trait::async_trait;

pub use openai::OpenAiClient;

/// Chat-completion backend. The pipeline only ever needs a single user-role
/// prompt completed, optionally truncated at a stop sequence.
#[async_trait]
pub trait CompletionClient {
    async fn complete(&self, config: &LlmConfig, prompt: &str, stop: &[&str]) -> Result<String>;
}
