//! SQL execution over a PostgreSQL pool.
//!
//! Results are rendered as a textual list of tuples because they are fed
//! straight back into prompts, not consumed programmatically. Driver errors
//! are classified into the typed taxonomy here and nowhere else.

use super::QueryExecutor;
use crate::domain::error::{AppError, Result};
use async_trait::async_trait;
use bigdecimal::BigDecimal;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use std::time::Duration;
use tracing::debug;

/// Sentinel returned for an empty row set.
pub const NO_RESULTS: &str = "No results found.";

const DEFAULT_QUERY_TIMEOUT_SECS: u64 = 30;

pub struct SqlExecutor {
    pool: PgPool,
    query_timeout: Duration,
}

impl SqlExecutor {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            query_timeout: Duration::from_secs(DEFAULT_QUERY_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(pool: PgPool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }

    fn timed_out(&self) -> AppError {
        AppError::ConnectionFailed(format!(
            "Query timed out after {} seconds",
            self.query_timeout.as_secs()
        ))
    }
}

#[async_trait]
impl QueryExecutor for SqlExecutor {
    async fn execute(&self, sql: &str) -> Result<String> {
        debug!("Executing SQL: {}", sql);

        if is_row_returning(sql) {
            let rows = tokio::time::timeout(self.query_timeout, sqlx::query(sql).fetch_all(&self.pool))
                .await
                .map_err(|_| self.timed_out())?
                .map_err(|e| AppError::classify(e.to_string()))?;

            if rows.is_empty() {
                return Ok(NO_RESULTS.to_string());
            }
            Ok(render_rows(&rows))
        } else {
            let done = tokio::time::timeout(self.query_timeout, sqlx::query(sql).execute(&self.pool))
                .await
                .map_err(|_| self.timed_out())?
                .map_err(|e| AppError::classify(e.to_string()))?;

            Ok(format!(
                "Query executed successfully. Rows affected: {}",
                done.rows_affected()
            ))
        }
    }
}

/// Statements that produce rows go through `fetch_all`; everything else is
/// executed for its side effect.
fn is_row_returning(sql: &str) -> bool {
    let upper = sql.trim_start().to_uppercase();
    upper.starts_with("SELECT") || upper.starts_with("WITH")
}

fn render_rows(rows: &[PgRow]) -> String {
    let rendered: Vec<String> = rows
        .iter()
        .map(|row| {
            let values: Vec<String> = (0..row.columns().len())
                .map(|i| render_value(&column_value(row, i)))
                .collect();
            render_row(&values)
        })
        .collect();
    format!("[{}]", rendered.join(", "))
}

/// Single-column rows keep the trailing comma so the shape matches a
/// one-element tuple.
fn render_row(values: &[String]) -> String {
    if values.len() == 1 {
        format!("({},)", values[0])
    } else {
        format!("({})", values.join(", "))
    }
}

fn render_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => "NULL".to_string(),
        serde_json::Value::String(s) => format!("'{}'", s.replace('\'', "''")),
        other => other.to_string(),
    }
}

/// A decimal renders as a bare number, not a quoted string.
fn decimal_value(n: BigDecimal) -> serde_json::Value {
    n.to_string()
        .parse::<f64>()
        .ok()
        .and_then(serde_json::Number::from_f64)
        .map(serde_json::Value::Number)
        .unwrap_or(serde_json::Value::Null)
}

/// Extract a column value from a row as serde_json::Value, trying types in
/// order of likelihood.
fn column_value(row: &PgRow, index: usize) -> serde_json::Value {
    if let Ok(v) = row.try_get::<Option<String>, _>(index) {
        return v
            .map(serde_json::Value::String)
            .unwrap_or(serde_json::Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<i64>, _>(index) {
        return v
            .map(|n| serde_json::Value::Number(n.into()))
            .unwrap_or(serde_json::Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<i32>, _>(index) {
        return v
            .map(|n| serde_json::Value::Number(n.into()))
            .unwrap_or(serde_json::Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<f64>, _>(index) {
        return v
            .and_then(serde_json::Number::from_f64)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null);
    }
    // NUMERIC columns and SUM/AVG aggregates only decode as BigDecimal.
    if let Ok(v) = row.try_get::<Option<BigDecimal>, _>(index) {
        return v.map(decimal_value).unwrap_or(serde_json::Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<bool>, _>(index) {
        return v
            .map(serde_json::Value::Bool)
            .unwrap_or(serde_json::Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(index) {
        return v
            .map(|dt| serde_json::Value::String(dt.to_rfc3339()))
            .unwrap_or(serde_json::Value::Null);
    }
    // TIMESTAMP without time zone does not decode as DateTime<Utc>.
    if let Ok(v) = row.try_get::<Option<chrono::NaiveDateTime>, _>(index) {
        return v
            .map(|dt| serde_json::Value::String(dt.to_string()))
            .unwrap_or(serde_json::Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<chrono::NaiveDate>, _>(index) {
        return v
            .map(|d| serde_json::Value::String(d.to_string()))
            .unwrap_or(serde_json::Value::Null);
    }

    serde_json::Value::Null
}
