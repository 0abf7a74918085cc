use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::LlmConfig;
use figment::providers::{Env, Format, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgConnectOptions;
use std::path::Path;

/// Application configuration, merged from an optional TOML file and
/// `DBCHAT_`-prefixed environment variables. Nested keys use a double
/// underscore, e.g. `DBCHAT_LLM__API_KEY` maps to `llm.api_key`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub llm: LlmConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database server host
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Database name
    pub database: String,
    pub username: String,
    #[serde(default)]
    pub password: Option<String>,
    /// Maximum connections in the pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Connection timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// Query timeout in seconds
    #[serde(default = "default_query_timeout")]
    pub query_timeout_secs: u64,
    /// Idle timeout in seconds
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
}

fn default_port() -> u16 {
    5432
}

fn default_max_connections() -> u32 {
    5
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_query_timeout() -> u64 {
    30
}

fn default_idle_timeout() -> u64 {
    300
}

impl DatabaseConfig {
    pub fn pg_options(&self) -> PgConnectOptions {
        let mut options = PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.database)
            .username(&self.username);
        if let Some(password) = self.password.as_deref() {
            options = options.password(password);
        }
        options
    }
}

impl AppConfig {
    /// Load configuration from the given TOML file, then let environment
    /// variables override it. The file may be absent as long as the
    /// environment supplies the required database fields.
    pub fn load(path: &Path) -> Result<Self> {
        Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed("DBCHAT_").split("__"))
            .extract()
            .map_err(|e| AppError::Config(format!("Invalid configuration: {}", e)))
    }
}
