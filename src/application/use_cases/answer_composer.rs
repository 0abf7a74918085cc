use crate::application::use_cases::prompts;
use crate::domain::error::Result;
use crate::domain::llm_config::LlmConfig;
use crate::domain::question::Question;
use crate::infrastructure::llm_clients::CompletionClient;
use std::sync::Arc;

/// Turns a raw query result back into a natural-language answer. No stop
/// sequence here: the model is meant to write prose, not SQL.
pub struct AnswerComposer {
    llm: Arc<dyn CompletionClient + Send + Sync>,
    config: LlmConfig,
}

impl AnswerComposer {
    pub fn new(llm: Arc<dyn CompletionClient + Send + Sync>, config: LlmConfig) -> Self {
        Self { llm, config }
    }

    pub async fn compose(&self, question: &Question, sql: &str, raw_result: &str) -> Result<String> {
        let prompt = prompts::answer(question.as_str(), sql, raw_result);
        let answer = self.llm.complete(&self.config, &prompt, &[]).await?;
        Ok(answer.trim().to_string())
    }
}
