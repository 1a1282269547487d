use std::sync::Arc;
use std::time::Instant;

use axum::extract::Request;
use axum::http::{HeaderValue, Method, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::{
    Json, Router,
    routing::{delete, get, post},
};
use serde_json::json;
use tower_http::cors::{AllowOrigin, CorsLayer};

use super::{commits, projects};
use crate::config::ServerConfig;
use crate::service::ProjectService;
use crate::store::Store;

pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: ServerConfig) -> Self {
        Self { store, config }
    }

    pub fn projects(&self) -> ProjectService<'_> {
        ProjectService::new(self.store.as_ref(), &self.config)
    }
}

async fn health() -> &'static str {
    "OK"
}

async fn info() -> impl IntoResponse {
    Json(json!({
        "name": "cadhub",
        "description": "Version control for CAD files",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
    }))
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;

    let latency = start.elapsed();
    let status = response.status();

    tracing::info!(
        "{} {} {} {}ms",
        method,
        uri.path(),
        status.as_u16(),
        latency.as_millis()
    );

    response
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins = if config.allowed_origins.iter().any(|origin| origin == "*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(config.allowed_origins.iter().filter_map(|origin| {
            match origin.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                    None
                }
            }
        }))
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
}

fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        // Projects
        .route("/projects", get(projects::list_projects))
        .route("/projects", post(projects::create_project))
        .route("/projects/{id}", get(projects::get_project))
        .route("/projects/{id}", delete(projects::delete_project))
        // Branches
        .route("/projects/{id}/branches", get(projects::list_branches))
        .route("/projects/{id}/branches", post(projects::create_branch))
        // Commits
        .route("/projects/{id}/commits", get(commits::list_commits))
        .route("/projects/{id}/commits", post(commits::create_commit))
        .route("/commits/{id}", get(commits::get_commit))
        .route("/commits/{id}/history", get(commits::commit_history))
        .route("/commits/{id}/files", get(commits::commit_files))
}

pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        .route("/", get(info))
        .route("/health", get(health))
        .nest("/api/v1", api_router())
        .layer(middleware::from_fn(log_request))
        .layer(cors)
        .with_state(state)
}
