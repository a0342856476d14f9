use std::any::Any;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{AppConfig, SecurityConfig};
use crate::error::ApiError;
use crate::handlers::{health, projects, reports};
use crate::middleware::require_token;
use crate::services::DbService;

/// Shared, read-only state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<DbService>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(service: DbService, config: AppConfig) -> Self {
        Self {
            service: Arc::new(service),
            config: Arc::new(config),
        }
    }
}

pub fn app(state: AppState) -> Router {
    let config = state.config.clone();

    let mut router = Router::new()
        .route("/health", get(health::get))
        .merge(project_routes())
        .merge(report_routes())
        .fallback(route_not_found)
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes))
        .layer(CatchPanicLayer::custom(handle_panic))
        .with_state(state.clone());

    if config.security.enable_cors {
        router = router.layer(cors_layer(&config.security));
    }
    // Gate wraps CORS and the fallback; only genuine preflights pass without a token
    router = router.layer(middleware::from_fn_with_state(state, require_token));
    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router
}

fn project_routes() -> Router<AppState> {
    Router::new()
        .route("/projects", get(projects::list).post(projects::create))
        .route(
            "/projects/:project_id",
            get(projects::get).put(projects::update).delete(projects::delete),
        )
}

fn report_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/projects/:project_id/reports",
            get(reports::list).post(reports::create),
        )
        .route(
            "/projects/:project_id/reports/:id",
            get(reports::get).put(reports::update).delete(reports::delete),
        )
        .route("/reports/keywords/", get(reports::by_empty_keyword))
        .route("/reports/keywords/:keyword", get(reports::by_keyword))
}

async fn route_not_found() -> ApiError {
    ApiError::not_found("Route not found")
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };
    tracing::error!("Handler panicked: {}", detail);
    ApiError::internal_server_error().into_response()
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    let origins = if security.cors_origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(
            security
                .cors_origins
                .iter()
                .filter_map(|o| HeaderValue::from_str(o).ok()),
        )
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}
