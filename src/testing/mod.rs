//! Test doubles for the store seam.

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::database::{DataError, Row, Store, WriteResult};

/// One statement as the service issued it
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub sql: String,
    pub params: Vec<Value>,
}

/// Store that records every statement and answers with canned rows
#[derive(Default)]
pub struct RecordingStore {
    calls: Mutex<Vec<Call>>,
    rows: Vec<Row>,
    failing: bool,
}

impl RecordingStore {
    /// Every query answers with these rows (non-objects are skipped)
    pub fn with_rows(rows: Vec<Value>) -> Self {
        Self {
            rows: rows.into_iter().filter_map(|v| v.as_object().cloned()).collect(),
            ..Default::default()
        }
    }

    /// Every statement fails as if the pool were exhausted
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, sql: &str, params: &[Value]) -> Result<(), DataError> {
        self.calls.lock().unwrap().push(Call {
            sql: sql.to_string(),
            params: params.to_vec(),
        });
        if self.failing {
            return Err(DataError::Sqlx(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl Store for RecordingStore {
    async fn execute(&self, sql: &str, params: &[Value]) -> Result<WriteResult, DataError> {
        self.record(sql, params)?;
        Ok(WriteResult { rows_affected: 1 })
    }

    async fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, DataError> {
        self.record(sql, params)?;
        Ok(self.rows.clone())
    }
}
