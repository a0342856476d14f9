//! Project and report use cases.
//!
//! Each method validates its input, builds exactly one parameterized
//! statement and hands it to the store. There are no multi-statement
//! transactions: creating a report does not check that its project exists,
//! and a zero-row update or delete is a success.

use std::sync::Arc;

use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use crate::config::IdStrategy;
use crate::database::models::{from_row, from_rows, Project, ProjectPayload, Report, ReportPayload, Written};
use crate::database::{Store, WriteResult};

use super::error::{ServiceError, ValidationError};

const INSERT_PROJECT: &str = "INSERT INTO projects (id, name, description) VALUES ($1, $2, $3)";
const SELECT_PROJECTS: &str = "SELECT id, name, description FROM projects";
const SELECT_PROJECT_BY_ID: &str = "SELECT id, name, description FROM projects WHERE id = $1";
const UPDATE_PROJECT: &str = "UPDATE projects SET name = $1, description = $2 WHERE id = $3";
const DELETE_PROJECT: &str = "DELETE FROM projects WHERE id = $1";

const INSERT_REPORT: &str = "INSERT INTO reports (id, text, project_id) VALUES ($1, $2, $3)";
const SELECT_REPORTS: &str = "SELECT id, text, project_id FROM reports WHERE project_id = $1";
const SELECT_REPORT_BY_ID: &str =
    "SELECT id, text, project_id FROM reports WHERE project_id = $1 AND id = $2";
const UPDATE_REPORT: &str = "UPDATE reports SET text = $1, project_id = $2 WHERE id = $3";
const DELETE_REPORT: &str = "DELETE FROM reports WHERE id = $1 AND project_id = $2";

/// Occurrence count = (len(text) - len(text without keyword)) / len(keyword),
/// i.e. non-overlapping, case-sensitive literal matches.
const SELECT_REPEATED_KEYWORD: &str = "SELECT id, text, project_id FROM reports \
     WHERE (LENGTH(text) - LENGTH(REPLACE(text, $1, ''))) / LENGTH($1) >= 3";

pub struct DbService {
    store: Arc<dyn Store>,
    ids: IdStrategy,
}

impl DbService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            ids: IdStrategy::default(),
        }
    }

    pub fn with_id_strategy(mut self, ids: IdStrategy) -> Self {
        self.ids = ids;
        self
    }

    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    // ---- projects ----

    pub async fn create_project(&self, payload: ProjectPayload) -> Result<Written<Project>, ServiceError> {
        let project = Project {
            id: self.resolve_id(payload.id)?,
            name: required(payload.name, "name")?,
            description: required(payload.description, "description")?,
        };
        debug!("Creating project {}", project.id);

        let result = self
            .store
            .execute(INSERT_PROJECT, &[json!(project.id), json!(project.name), json!(project.description)])
            .await?;
        Ok(Written { record: project, result })
    }

    pub async fn get_projects(&self) -> Result<Vec<Project>, ServiceError> {
        let rows = self.store.query(SELECT_PROJECTS, &[]).await?;
        Ok(from_rows(rows)?)
    }

    /// `None` when no project has this id
    pub async fn get_project_by_id(&self, id: &str) -> Result<Option<Project>, ServiceError> {
        let rows = self.store.query(SELECT_PROJECT_BY_ID, &[json!(id)]).await?;
        first(rows)
    }

    pub async fn update_project(
        &self,
        id: &str,
        payload: ProjectPayload,
    ) -> Result<Written<Project>, ServiceError> {
        let project = Project {
            id: id.to_string(),
            name: required(payload.name, "name")?,
            description: required(payload.description, "description")?,
        };
        debug!("Updating project {}", id);

        let result = self
            .store
            .execute(UPDATE_PROJECT, &[json!(project.name), json!(project.description), json!(id)])
            .await?;
        Ok(Written { record: project, result })
    }

    /// Idempotent: a missing id yields zero rows affected
    pub async fn delete_project(&self, id: &str) -> Result<WriteResult, ServiceError> {
        let result = self.store.execute(DELETE_PROJECT, &[json!(id)]).await?;
        debug!("Deleted project {} ({} rows)", id, result.rows_affected);
        Ok(result)
    }

    // ---- reports ----

    /// `project_id` always comes from the caller's route, never the body
    pub async fn create_report(
        &self,
        project_id: &str,
        payload: ReportPayload,
    ) -> Result<Written<Report>, ServiceError> {
        let report = Report {
            id: self.resolve_id(payload.id)?,
            text: present(payload.text, "text")?,
            project_id: project_id.to_string(),
        };
        debug!("Creating report {} in project {}", report.id, project_id);

        let result = self
            .store
            .execute(INSERT_REPORT, &[json!(report.id), json!(report.text), json!(report.project_id)])
            .await?;
        Ok(Written { record: report, result })
    }

    pub async fn get_reports(&self, project_id: &str) -> Result<Vec<Report>, ServiceError> {
        let rows = self.store.query(SELECT_REPORTS, &[json!(project_id)]).await?;
        Ok(from_rows(rows)?)
    }

    /// Scoped by both ids; a report filed under another project is `None`
    pub async fn get_report_by_id(&self, project_id: &str, id: &str) -> Result<Option<Report>, ServiceError> {
        let rows = self
            .store
            .query(SELECT_REPORT_BY_ID, &[json!(project_id), json!(id)])
            .await?;
        first(rows)
    }

    /// Rewrites the text and (re)assigns the report to `project_id`
    pub async fn update_report(
        &self,
        id: &str,
        project_id: &str,
        payload: ReportPayload,
    ) -> Result<Written<Report>, ServiceError> {
        let report = Report {
            id: id.to_string(),
            text: present(payload.text, "text")?,
            project_id: project_id.to_string(),
        };
        debug!("Updating report {} (project {})", id, project_id);

        let result = self
            .store
            .execute(UPDATE_REPORT, &[json!(report.text), json!(report.project_id), json!(id)])
            .await?;
        Ok(Written { record: report, result })
    }

    pub async fn delete_report(&self, id: &str, project_id: &str) -> Result<WriteResult, ServiceError> {
        let result = self
            .store
            .execute(DELETE_REPORT, &[json!(id), json!(project_id)])
            .await?;
        debug!("Deleted report {} ({} rows)", id, result.rows_affected);
        Ok(result)
    }

    /// Reports whose text contains `keyword` at least three times
    pub async fn find_by_repeated_keyword(&self, keyword: &str) -> Result<Vec<Report>, ServiceError> {
        // an empty keyword would divide by zero in the count
        if keyword.is_empty() {
            return Err(ValidationError::new(Some("keyword"), "keyword must not be empty").into());
        }
        let rows = self
            .store
            .query(SELECT_REPEATED_KEYWORD, &[Value::String(keyword.to_string())])
            .await?;
        Ok(from_rows(rows)?)
    }

    fn resolve_id(&self, id: Option<String>) -> Result<String, ValidationError> {
        match (self.ids, id) {
            (_, Some(id)) if !id.trim().is_empty() => Ok(id),
            (IdStrategy::Uuid, _) => Ok(Uuid::new_v4().to_string()),
            (IdStrategy::Client, _) => Err(ValidationError::required("id")),
        }
    }
}

/// Non-blank string field
fn required(value: Option<String>, field: &'static str) -> Result<String, ValidationError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ValidationError::required(field)),
    }
}

/// Field must be present but may be empty
fn present(value: Option<String>, field: &'static str) -> Result<String, ValidationError> {
    value.ok_or_else(|| ValidationError::required(field))
}

fn first<T: serde::de::DeserializeOwned>(rows: Vec<crate::database::Row>) -> Result<Option<T>, ServiceError> {
    match rows.into_iter().next() {
        Some(row) => Ok(Some(from_row(row)?)),
        None => Ok(None),
    }
}
