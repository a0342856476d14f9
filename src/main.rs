use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use projects_api::config::AppConfig;
use projects_api::database::{self, schema};
use projects_api::services::DbService;
use projects_api::{app, AppState};

#[derive(Parser)]
#[command(name = "projects-api", version, about = "Projects and reports REST API")]
struct Args {
    #[arg(long, help = "Port to listen on (overrides APP_PORT/PORT)")]
    port: Option<u16>,

    #[arg(long, help = "Database URL, postgres:// or sqlite: (overrides DATABASE_URL)")]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, AUTH_TOKEN, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("projects_api=info,tower_http=info")),
        )
        .init();

    let args = Args::parse();

    let mut config = AppConfig::from_env().context("invalid configuration")?;
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(url) = args.database_url {
        config.database.url = Some(url);
    }
    tracing::info!("Starting Projects API in {:?} mode", config.environment);

    let store = database::connect(config.database_url(), &config.store_options())
        .await
        .context("failed to open database")?;
    if config.database.bootstrap_schema {
        schema::ensure_schema(store.as_ref())
            .await
            .context("failed to bootstrap schema")?;
    }

    let service = DbService::new(store).with_id_strategy(config.api.id_strategy);
    let port = config.server.port;
    let app = app(AppState::new(service, config));

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Projects API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutting down");
}
