//! Multi-stage SQL generation.
//!
//! Three chained completions, each grounded in the previous stage's live
//! database output: find candidate tables, discover the selected table's
//! columns, then write the final query. Any stage error degrades to a
//! single-shot fallback prompt; the caller only ever sees a `Generation`.

use crate::application::use_cases::prompts::{self, STOP_SQL_RESULT};
use crate::domain::error::Result;
use crate::domain::generation::Generation;
use crate::domain::llm_config::LlmConfig;
use crate::domain::question::Question;
use crate::infrastructure::db::QueryExecutor;
use crate::infrastructure::llm_clients::CompletionClient;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Sentinel used when the discovery query does not name a table.
pub const UNKNOWN_TABLE: &str = "unknown_table";

static TABLE_NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)TABLE_NAME\s*=\s*'([^']+)'").unwrap());

pub struct SqlGenerator {
    llm: Arc<dyn CompletionClient + Send + Sync>,
    executor: Arc<dyn QueryExecutor + Send + Sync>,
    config: LlmConfig,
}

impl SqlGenerator {
    pub fn new(
        llm: Arc<dyn CompletionClient + Send + Sync>,
        executor: Arc<dyn QueryExecutor + Send + Sync>,
        config: LlmConfig,
    ) -> Self {
        Self {
            llm,
            executor,
            config,
        }
    }

    /// Generate SQL for the question. Errors never escape: a failed
    /// multi-stage run degrades to the fallback prompt, and a failed
    /// fallback yields `Generation::Failed` carrying both causes.
    pub async fn generate(&self, question: &Question) -> Generation {
        match self.discover_and_generate(question).await {
            Ok(sql) => Generation::Query(sql),
            Err(primary) => {
                warn!(
                    "Multi-stage generation failed, trying single-shot fallback: {}",
                    primary
                );
                match self.fallback_generate(question).await {
                    Ok(sql) => Generation::Query(sql),
                    Err(fallback) => {
                        error!("Fallback generation also failed: {}", fallback);
                        Generation::Failed {
                            reason: format!(
                                "Unable to generate query for: {} ({}; fallback: {})",
                                question, primary, fallback
                            ),
                        }
                    }
                }
            }
        }
    }

    async fn discover_and_generate(&self, question: &Question) -> Result<String> {
        let stop = [STOP_SQL_RESULT];

        let find_prompt = prompts::find_tables(question.as_str());
        let find_query = self.llm.complete(&self.config, &find_prompt, &stop).await?;
        let find_query = find_query.trim();
        debug!("Table search query: {}", find_query);
        let found_tables = self.executor.execute(find_query).await?;

        let discover_prompt = prompts::discover_columns(question.as_str(), &found_tables);
        let discover_query = self
            .llm
            .complete(&self.config, &discover_prompt, &stop)
            .await?;
        let discover_query = discover_query.trim();
        let selected_table =
            extract_table_name(discover_query).unwrap_or_else(|| UNKNOWN_TABLE.to_string());
        debug!("Selected table: {}", selected_table);
        let discovered_columns = self.executor.execute(discover_query).await?;

        let final_prompt =
            prompts::final_query(question.as_str(), &selected_table, &discovered_columns);
        let sql = self.llm.complete(&self.config, &final_prompt, &stop).await?;
        Ok(sql.trim().to_string())
    }

    async fn fallback_generate(&self, question: &Question) -> Result<String> {
        let prompt = prompts::fallback_query(question.as_str());
        let sql = self
            .llm
            .complete(&self.config, &prompt, &[STOP_SQL_RESULT])
            .await?;
        Ok(sql.trim().to_string())
    }
}

/// Pull the table name out of a generated `INFORMATION_SCHEMA.COLUMNS`
/// query, matching `TABLE_NAME = '...'` case-insensitively.
fn extract_table_name(query: &str) -> Option<String> {
    TABLE_NAME_PATTERN
        .captures(query)
        .map(|caps| caps[1].to_string())
}
