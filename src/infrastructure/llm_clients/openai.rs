use super::CompletionClient;
use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::LlmConfig;
use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;

pub struct OpenAiClient {
    client: reqwest::Client,
}

impl OpenAiClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(120))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }

    fn api_key(config: &LlmConfig) -> Result<String> {
        config
            .api_key
            .clone()
            .ok_or_else(|| AppError::Llm("Missing API key for OpenAI".to_string()))
    }
}

impl Default for OpenAiClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, config: &LlmConfig, prompt: &str, stop: &[&str]) -> Result<String> {
        let api_key = Self::api_key(config)?;
        let url = if config.base_url.ends_with('/') {
            format!("{}chat/completions", config.base_url)
        } else {
            format!("{}/chat/completions", config.base_url)
        };

        let mut body = json!({
            "model": config.model,
            "messages": [
                {
                    "role": "user",
                    "content": prompt
                }
            ],
            "max_tokens": config.max_tokens,
            "temperature": config.temperature,
        });
        if !stop.is_empty() {
            body["stop"] = json!(stop);
        }

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Llm(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            if status.as_u16() == 429 || text.to_lowercase().contains("quota") {
                return Err(AppError::QuotaExceeded(format!(
                    "API error ({}): {}",
                    status, text
                )));
            }
            return Err(AppError::Llm(format!("API error ({}): {}", status, text)));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to parse JSON: {}", e)))?;

        json["choices"][0]["message"]["content"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| AppError::Llm("Invalid response format".to_string()))
    }
}
