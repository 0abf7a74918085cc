pub mod executor;

use crate::domain::error::Result;
use async_trait::async_trait;

pub use executor::{SqlExecutor, NO_RESULTS};

/// Executes a single SQL statement and renders the outcome as text for the
/// prompt pipeline. Implementations own connection handling and timeouts.
#[async_trait]
pub trait QueryExecutor {
    async fn execute(&self, sql: &str) -> Result<String>;
}
