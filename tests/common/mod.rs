#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder};

use projects_api::config::{AppConfig, IdStrategy};
use projects_api::database::{schema, SqliteStore};
use projects_api::services::DbService;
use projects_api::{app, AppState};

pub const TOKEN: &str = "integration-secret";

/// A real server on a free port, backed by its own in-memory SQLite database.
/// It lives as long as the test's runtime.
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    client: Client,
}

impl TestServer {
    pub async fn spawn() -> Result<Self> {
        Self::spawn_with(IdStrategy::Client).await
    }

    pub async fn spawn_with(ids: IdStrategy) -> Result<Self> {
        let store = SqliteStore::in_memory().await.context("failed to open sqlite")?;
        schema::ensure_schema(&store).await.context("failed to bootstrap schema")?;

        let service = DbService::new(Arc::new(store)).with_id_strategy(ids);
        let router = app(AppState::new(service, AppConfig::for_tests(TOKEN)));

        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test listener")?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Ok(Self {
            port,
            base_url: format!("http://127.0.0.1:{}", port),
            client: Client::new(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Request carrying the correct token
    pub fn get(&self, path: &str) -> RequestBuilder {
        self.client.get(self.url(path)).header("Authorization", TOKEN)
    }

    pub fn post(&self, path: &str) -> RequestBuilder {
        self.client.post(self.url(path)).header("Authorization", TOKEN)
    }

    pub fn put(&self, path: &str) -> RequestBuilder {
        self.client.put(self.url(path)).header("Authorization", TOKEN)
    }

    pub fn delete(&self, path: &str) -> RequestBuilder {
        self.client.delete(self.url(path)).header("Authorization", TOKEN)
    }

    /// Request with no Authorization header at all
    pub fn anonymous(&self, method: reqwest::Method, path: &str) -> RequestBuilder {
        self.client.request(method, self.url(path))
    }
}
