//! Question-answering surface.
//!
//! `ChatHandler::handle` is the single entry point: it never returns an
//! error, only displayable Markdown. Failures short-circuit to fixed
//! remediation messages and the underlying causes go to the log.

pub mod messages;

use crate::application::use_cases::answer_composer::AnswerComposer;
use crate::application::use_cases::sql_generator::SqlGenerator;
use crate::domain::error::Result;
use crate::domain::generation::Generation;
use crate::domain::question::Question;
use crate::infrastructure::db::QueryExecutor;
use std::sync::Arc;
use tracing::{info, warn};

pub struct ChatHandler {
    generator: SqlGenerator,
    composer: AnswerComposer,
    executor: Arc<dyn QueryExecutor + Send + Sync>,
}

impl ChatHandler {
    pub fn new(
        generator: SqlGenerator,
        composer: AnswerComposer,
        executor: Arc<dyn QueryExecutor + Send + Sync>,
    ) -> Self {
        Self {
            generator,
            composer,
            executor,
        }
    }

    /// Answer one question. `show_details` appends the generated SQL and the
    /// raw result to successful replies.
    pub async fn handle(&self, raw_question: &str, show_details: bool) -> String {
        let Some(question) = Question::new(raw_question) else {
            return messages::EMPTY_QUESTION.to_string();
        };
        info!("Handling question: {}", question);

        let sql = match self.generator.generate(&question).await {
            Generation::Query(sql) => sql,
            Generation::Failed { reason } => {
                warn!("Query generation failed: {}", reason);
                return messages::GENERATION_FAILED.to_string();
            }
        };
        // Completions that apologize instead of producing SQL are never
        // executed.
        if sql.trim().is_empty() || sql.contains("Error:") {
            return messages::GENERATION_FAILED.to_string();
        }

        match self.run_and_compose(&question, &sql, show_details).await {
            Ok(response) => response,
            Err(error) => {
                warn!("Question handling failed: {}", error);
                messages::for_error(&error)
            }
        }
    }

    async fn run_and_compose(
        &self,
        question: &Question,
        sql: &str,
        show_details: bool,
    ) -> Result<String> {
        let raw_result = self.executor.execute(sql).await?;
        if raw_result.contains("No results found") {
            return Ok(messages::no_data(sql, show_details));
        }
        let answer = self.composer.compose(question, sql, &raw_result).await?;
        Ok(messages::answer(&answer, sql, &raw_result, show_details))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::AppError;
    use crate::domain::llm_config::LlmConfig;
    use crate::infrastructure::db::NO_RESULTS;
    use crate::infrastructure::llm_clients::CompletionClient;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    struct ScriptedLlm {
        responses: Mutex<VecDeque<Result<String>>>,
        calls: Mutex<usize>,
    }

    impl ScriptedLlm {
        fn new(responses: Vec<Result<String>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                calls: Mutex::new(0),
            }
        }

        fn calls(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl CompletionClient for ScriptedLlm {
        async fn complete(
            &self,
            _config: &LlmConfig,
            _prompt: &str,
            _stop: &[&str],
        ) -> Result<String> {
            *self.calls.lock().unwrap() += 1;
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected completion call")
        }
    }

    struct ScriptedDb {
        results: Mutex<VecDeque<Result<String>>>,
        statements: Mutex<Vec<String>>,
    }

    impl ScriptedDb {
        fn new(results: Vec<Result<String>>) -> Self {
            Self {
                results: Mutex::new(results.into()),
                statements: Mutex::new(Vec::new()),
            }
        }

        fn statements(&self) -> Vec<String> {
            self.statements.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl QueryExecutor for ScriptedDb {
        async fn execute(&self, sql: &str) -> Result<String> {
            self.statements.lock().unwrap().push(sql.to_string());
            self.results
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected query")
        }
    }

    fn make_handler(llm: Arc<ScriptedLlm>, db: Arc<ScriptedDb>) -> ChatHandler {
        let config = LlmConfig::default();
        ChatHandler::new(
            SqlGenerator::new(llm.clone(), db.clone(), config.clone()),
            AnswerComposer::new(llm, config),
            db,
        )
    }

    fn happy_llm_script(answer: &str) -> Vec<Result<String>> {
        vec![
            Ok("SELECT TABLE_NAME FROM INFORMATION_SCHEMA.TABLES \
                WHERE TABLE_NAME LIKE 'tbdw_tgt_%loan%'"
                .to_string()),
            Ok("SELECT COLUMN_NAME FROM INFORMATION_SCHEMA.COLUMNS \
                WHERE TABLE_NAME = 'tbdw_tgt_loan_account_summary_fact'"
                .to_string()),
            Ok("SELECT TOP 5 loan_amt FROM dbo.tbdw_tgt_loan_account_summary_fact".to_string()),
            Ok(answer.to_string()),
        ]
    }

    fn happy_db_results(rows: &str) -> Vec<Result<String>> {
        vec![
            Ok("[('tbdw_tgt_loan_account_summary_fact',)]".to_string()),
            Ok("[('loan_amt',)]".to_string()),
            Ok(rows.to_string()),
        ]
    }

    #[tokio::test]
    async fn test_empty_question_short_circuits() {
        let llm = Arc::new(ScriptedLlm::new(vec![]));
        let db = Arc::new(ScriptedDb::new(vec![]));
        let handler = make_handler(llm.clone(), db.clone());

        assert_eq!(handler.handle("   ", false).await, messages::EMPTY_QUESTION);
        assert_eq!(llm.calls(), 0);
        assert!(db.statements().is_empty());
    }

    #[tokio::test]
    async fn test_failed_generation_returns_guidance() {
        let llm = Arc::new(ScriptedLlm::new(vec![
            Err(AppError::Llm("model unavailable".to_string())),
            Err(AppError::Llm("still unavailable".to_string())),
        ]));
        let db = Arc::new(ScriptedDb::new(vec![]));
        let handler = make_handler(llm, db.clone());

        let reply = handler.handle("show me loans", false).await;

        assert_eq!(reply, messages::GENERATION_FAILED);
        assert!(db.statements().is_empty());
    }

    #[tokio::test]
    async fn test_error_marker_in_query_is_not_executed() {
        let llm = Arc::new(ScriptedLlm::new(vec![
            Err(AppError::Llm("model unavailable".to_string())),
            Ok("Error: I cannot answer that".to_string()),
        ]));
        let db = Arc::new(ScriptedDb::new(vec![]));
        let handler = make_handler(llm, db.clone());

        let reply = handler.handle("show me loans", false).await;

        assert_eq!(reply, messages::GENERATION_FAILED);
        assert!(db.statements().is_empty());
    }

    #[tokio::test]
    async fn test_blank_query_is_not_executed() {
        let llm = Arc::new(ScriptedLlm::new(vec![
            Err(AppError::Llm("model unavailable".to_string())),
            Ok("   ".to_string()),
        ]));
        let db = Arc::new(ScriptedDb::new(vec![]));
        let handler = make_handler(llm, db.clone());

        assert_eq!(
            handler.handle("show me loans", false).await,
            messages::GENERATION_FAILED
        );
        assert!(db.statements().is_empty());
    }

    #[tokio::test]
    async fn test_no_results_reply_respects_details_flag() {
        let llm = Arc::new(ScriptedLlm::new(happy_llm_script("unused")));
        let db = Arc::new(ScriptedDb::new(happy_db_results(NO_RESULTS)));
        let handler = make_handler(llm.clone(), db);

        let reply = handler.handle("show me loans", true).await;

        assert!(reply.contains("No data found matching your criteria."));
        assert!(reply.contains("```sql\nSELECT TOP 5 loan_amt"));
        // The answer-composition completion never runs on the no-data path.
        assert_eq!(llm.calls(), 3);

        let llm = Arc::new(ScriptedLlm::new(happy_llm_script("unused")));
        let db = Arc::new(ScriptedDb::new(happy_db_results(NO_RESULTS)));
        let handler = make_handler(llm, db);

        let reply = handler.handle("show me loans", false).await;
        assert!(reply.contains("No data found matching your criteria."));
        assert!(!reply.contains("```sql"));
    }

    #[tokio::test]
    async fn test_successful_round_trip_orders_sections() {
        let llm = Arc::new(ScriptedLlm::new(happy_llm_script("Top loans are listed.")));
        let db = Arc::new(ScriptedDb::new(happy_db_results("[(120000,)]")));
        let handler = make_handler(llm, db.clone());

        let reply = handler.handle("show me loans", true).await;

        let a = reply.find("### 💬 Answer\nTop loans are listed.").unwrap();
        let s = reply.find("### 🔍 Generated SQL Query").unwrap();
        let r = reply.find("### 📋 Raw Database Result").unwrap();
        assert!(a < s && s < r);
        assert!(reply.contains("[(120000,)]"));
        assert_eq!(db.statements().len(), 3);
        assert_eq!(
            db.statements()[2],
            "SELECT TOP 5 loan_amt FROM dbo.tbdw_tgt_loan_account_summary_fact"
        );
    }

    #[tokio::test]
    async fn test_success_without_details_hides_sql_and_raw_result() {
        let llm = Arc::new(ScriptedLlm::new(happy_llm_script("Top loans are listed.")));
        let db = Arc::new(ScriptedDb::new(happy_db_results("[(120000,)]")));
        let handler = make_handler(llm, db);

        let reply = handler.handle("show me loans", false).await;

        assert!(reply.contains("Top loans are listed."));
        assert!(!reply.contains("```sql"));
        assert!(!reply.contains("[(120000,)]"));
    }

    #[tokio::test]
    async fn test_execution_errors_map_to_fixed_replies() {
        let cases = [
            (
                AppError::classify("Invalid object name 'dbo.tbdw_tgt_loans'"),
                messages::TABLE_NOT_FOUND,
            ),
            (
                AppError::classify("Invalid column name 'loan_amount'"),
                messages::COLUMN_NOT_FOUND,
            ),
            (
                AppError::classify("connection refused"),
                messages::CONNECTION_FAILED,
            ),
            (
                AppError::classify("HTTP 429 Too Many Requests"),
                messages::QUOTA_EXCEEDED,
            ),
        ];

        for (error, expected) in cases {
            let llm = Arc::new(ScriptedLlm::new(happy_llm_script("unused")));
            let db = Arc::new(ScriptedDb::new(vec![
                Ok("[('tbdw_tgt_loan_account_summary_fact',)]".to_string()),
                Ok("[('loan_amt',)]".to_string()),
                Err(error),
            ]));
            let handler = make_handler(llm, db);

            assert_eq!(handler.handle("show me loans", false).await, expected);
        }
    }

    #[tokio::test]
    async fn test_compose_failure_maps_to_error_reply() {
        let mut script = happy_llm_script("unused");
        script[3] = Err(AppError::QuotaExceeded("insufficient_quota".to_string()));
        let llm = Arc::new(ScriptedLlm::new(script));
        let db = Arc::new(ScriptedDb::new(happy_db_results("[(120000,)]")));
        let handler = make_handler(llm, db);

        assert_eq!(
            handler.handle("show me loans", false).await,
            messages::QUOTA_EXCEEDED
        );
    }

    #[tokio::test]
    async fn test_generic_database_error_carries_detail() {
        let llm = Arc::new(ScriptedLlm::new(happy_llm_script("unused")));
        let db = Arc::new(ScriptedDb::new(vec![
            Ok("[('tbdw_tgt_loan_account_summary_fact',)]".to_string()),
            Ok("[('loan_amt',)]".to_string()),
            Err(AppError::classify("syntax error at or near \"TOP\"")),
        ]));
        let handler = make_handler(llm, db);

        let reply = handler.handle("show me loans", false).await;
        assert!(reply.contains("❌ **Error:**"));
        assert!(reply.contains("syntax error"));
    }
}
