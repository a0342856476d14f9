use super::store::{DataError, Store};

/// Bootstrap DDL for the two tables. Idempotent; there is no versioning.
///
/// `reports.project_id` is deliberately not a foreign key: deleting a project
/// leaves its reports in place.
pub const BOOTSTRAP: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS projects (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        description TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS reports (
        id TEXT PRIMARY KEY,
        text TEXT NOT NULL,
        project_id TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS reports_project_id_idx ON reports (project_id)",
];

pub async fn ensure_schema(store: &dyn Store) -> Result<(), DataError> {
    for statement in BOOTSTRAP {
        store.execute(statement, &[]).await?;
    }
    tracing::info!("Schema bootstrap complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::SqliteStore;

    #[tokio::test]
    async fn bootstrap_is_idempotent() {
        let store = SqliteStore::in_memory().await.unwrap();
        ensure_schema(&store).await.unwrap();
        ensure_schema(&store).await.unwrap();

        let rows = store.query("SELECT COUNT(*) AS n FROM projects", &[]).await.unwrap();
        assert_eq!(rows[0]["n"], serde_json::json!(0));
    }
}
