use crate::application::use_cases::answer_composer::AnswerComposer;
use crate::application::use_cases::sql_generator::SqlGenerator;
use crate::domain::error::{AppError, Result};
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::db::{QueryExecutor, SqlExecutor};
use crate::infrastructure::llm_clients::{CompletionClient, OpenAiClient};
use crate::interfaces::chat::ChatHandler;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Owns the connection pool and the wired pipeline. Built once at startup;
/// everything downstream borrows from here.
pub struct AppContext {
    pub handler: ChatHandler,
}

impl AppContext {
    pub async fn init(config: AppConfig) -> Result<Self> {
        let db = &config.database;

        let pool = PgPoolOptions::new()
            .max_connections(db.max_connections)
            .acquire_timeout(Duration::from_secs(db.connect_timeout_secs))
            .idle_timeout(Duration::from_secs(db.idle_timeout_secs))
            .connect_with(db.pg_options())
            .await
            .map_err(|e| {
                AppError::ConnectionFailed(format!(
                    "Failed to connect to '{}' at {}:{}: {}",
                    db.database, db.host, db.port, e
                ))
            })?;
        info!(
            "Connected to database '{}' at {}:{}",
            db.database, db.host, db.port
        );

        let executor: Arc<dyn QueryExecutor + Send + Sync> = Arc::new(SqlExecutor::with_timeout(
            pool,
            Duration::from_secs(db.query_timeout_secs),
        ));
        let llm: Arc<dyn CompletionClient + Send + Sync> = Arc::new(OpenAiClient::new());

        let generator = SqlGenerator::new(llm.clone(), executor.clone(), config.llm.clone());
        let composer = AnswerComposer::new(llm, config.llm);
        let handler = ChatHandler::new(generator, composer, executor);

        Ok(Self { handler })
    }
}
