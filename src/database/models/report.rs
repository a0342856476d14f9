use serde::{Deserialize, Serialize};

/// Row in the `reports` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub id: String,
    pub text: String,
    pub project_id: String,
}

/// Request body for report create/update. `project_id` is accepted but the
/// route's path parameter always wins.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportPayload {
    pub id: Option<String>,
    pub text: Option<String>,
    pub project_id: Option<String>,
}
