/// Outcome of SQL generation.
///
/// The generator never raises: a three-stage failure falls back to
/// single-shot generation, and if that also fails the result is `Failed`
/// with the underlying causes in `reason`. Callers match on the variant
/// instead of scanning the query text for error markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Generation {
    /// A generated SQL statement, trimmed of surrounding whitespace.
    Query(String),
    /// Generation failed outright, including the fallback path.
    Failed { reason: String },
}

impl Generation {
    pub fn is_failed(&self) -> bool {
        matches!(self, Generation::Failed { .. })
    }
}
