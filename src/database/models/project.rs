use serde::{Deserialize, Serialize};

/// Row in the `projects` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: String,
}

/// Request body for project create/update. Every field is optional here so
/// that a missing field surfaces as a validation error rather than a parse error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectPayload {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
}
