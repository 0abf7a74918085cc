use std::fmt;

/// Error taxonomy for the chat pipeline.
///
/// Database and LLM boundary code classifies raw driver/API text into the
/// specific variants once, at the point where the error is caught; everything
/// above the boundary matches on variants instead of searching message text.
#[derive(Debug, Clone)]
pub enum AppError {
    Validation(String),
    Config(String),
    Llm(String),
    QuotaExceeded(String),
    TableNotFound(String),
    ColumnNotFound(String),
    ConnectionFailed(String),
    Database(String),
    Io(String),
}

impl AppError {
    /// Classify a raw driver error message into a typed variant.
    ///
    /// Understands both the warehouse's ODBC vocabulary (`Invalid object
    /// name`, SQLSTATE 42S02/42S22) and the Postgres transport's
    /// (`relation/column ... does not exist`, 42P01/42703). Checks run in
    /// order: quota, table, column, connection, then the generic bucket.
    pub fn classify(detail: impl Into<String>) -> AppError {
        let detail = detail.into();
        let lower = detail.to_lowercase();

        if lower.contains("429") || lower.contains("quota") {
            AppError::QuotaExceeded(detail)
        } else if lower.contains("invalid object name")
            || lower.contains("42s02")
            || lower.contains("42p01")
            || (lower.contains("relation") && lower.contains("does not exist"))
        {
            AppError::TableNotFound(detail)
        } else if lower.contains("invalid column name")
            || lower.contains("42s22")
            || lower.contains("42703")
            || (lower.contains("column") && lower.contains("does not exist"))
        {
            AppError::ColumnNotFound(detail)
        } else if lower.contains("timeout")
            || lower.contains("timed out")
            || lower.contains("connection")
        {
            AppError::ConnectionFailed(detail)
        } else {
            AppError::Database(detail)
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(msg) => write!(f, "Validation error: {}", msg),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Llm(msg) => write!(f, "LLM error: {}", msg),
            AppError::QuotaExceeded(msg) => write!(f, "API quota exceeded: {}", msg),
            AppError::TableNotFound(msg) => write!(f, "Table not found: {}", msg),
            AppError::ColumnNotFound(msg) => write!(f, "Column not found: {}", msg),
            AppError::ConnectionFailed(msg) => write!(f, "Database connection failed: {}", msg),
            AppError::Database(msg) => write!(f, "Database error: {}", msg),
            AppError::Io(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
