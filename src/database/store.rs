//! Data access contract shared by every backend.
//!
//! The service layer only ever sees these two primitives. SQL text is owned by
//! the caller and values travel separately as positional parameters (`$1`,
//! `$2`, ...), so nothing user-supplied is ever spliced into a statement.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// One result row: column name -> scalar value
pub type Row = Map<String, Value>;

/// Outcome of a write statement. Only the row count is reported: the tables
/// are keyed by caller-visible TEXT ids, so backend row ids carry no meaning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WriteResult {
    pub rows_affected: u64,
}

/// Any failure reported by the store. Subtypes exist for logging only;
/// callers treat every variant the same way.
#[derive(Debug, Error)]
pub enum DataError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error("Unsupported database url: {0}")]
    UnsupportedUrl(String),

    #[error("Unsupported parameter at position {position}: {kind}")]
    UnsupportedParam { position: usize, kind: &'static str },

    #[error("Row decode error: {0}")]
    Decode(String),
}

#[async_trait]
pub trait Store: Send + Sync {
    /// Run a parameterized write statement
    async fn execute(&self, sql: &str, params: &[Value]) -> Result<WriteResult, DataError>;

    /// Run a parameterized read statement
    async fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, DataError>;

    /// Cheap connectivity probe
    async fn ping(&self) -> Result<(), DataError> {
        self.query("SELECT 1", &[]).await.map(|_| ())
    }
}

/// Reject params the backends cannot bind as a single scalar
pub(crate) fn check_params(params: &[Value]) -> Result<(), DataError> {
    for (i, p) in params.iter().enumerate() {
        let kind = match p {
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            _ => continue,
        };
        return Err(DataError::UnsupportedParam { position: i + 1, kind });
    }
    Ok(())
}
