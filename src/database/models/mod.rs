pub mod project;
pub mod report;

pub use project::{Project, ProjectPayload};
pub use report::{Report, ReportPayload};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::store::{DataError, Row, WriteResult};

/// A freshly written entity merged with the store's write metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Written<T: Serialize> {
    #[serde(flatten)]
    pub record: T,
    #[serde(flatten)]
    pub result: WriteResult,
}

/// Decode a raw row into a typed model
pub fn from_row<T: DeserializeOwned>(row: Row) -> Result<T, DataError> {
    serde_json::from_value(Value::Object(row)).map_err(|e| DataError::Decode(e.to_string()))
}

pub fn from_rows<T: DeserializeOwned>(rows: Vec<Row>) -> Result<Vec<T>, DataError> {
    rows.into_iter().map(from_row).collect()
}
