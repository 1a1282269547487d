use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

use cadhub::config::ServerConfig;
use cadhub::server::{AppState, create_router};
use cadhub::store::{SqliteStore, Store};

/// The full router backed by a throwaway database.
pub struct TestApp {
    _temp_dir: TempDir,
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("create temp dir");
        let config = ServerConfig {
            data_dir: temp_dir.path().to_path_buf(),
            ..ServerConfig::default()
        };

        let store = SqliteStore::new(config.db_path()).expect("open store");
        store.initialize().expect("initialize store");

        let state = Arc::new(AppState::new(Arc::new(store), config));
        Self {
            _temp_dir: temp_dir,
            router: create_router(state),
        }
    }

    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let body = match body {
            Some(json) => Body::from(serde_json::to_vec(&json).expect("encode body")),
            None => Body::empty(),
        };
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body)
            .expect("build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("route request");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");

        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, value)
    }

    /// Sends a CORS preflight and returns the status with the response headers.
    pub async fn preflight(&self, uri: &str, origin: &str) -> (StatusCode, HeaderMap) {
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri(uri)
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
            .body(Body::empty())
            .expect("build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("route request");
        (response.status(), response.headers().clone())
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, None).await
    }

    /// Creates a project and returns its id.
    pub async fn create_project(&self, name: &str) -> String {
        let (status, body) = self
            .post("/api/v1/projects", serde_json::json!({ "name": name }))
            .await;
        assert_eq!(status, StatusCode::CREATED, "create project: {body}");
        body["data"]["id"].as_str().expect("project id").to_string()
    }

    /// Creates a commit and returns its id.
    pub async fn create_commit(&self, project_id: &str, body: Value) -> String {
        let (status, body) = self
            .post(&format!("/api/v1/projects/{project_id}/commits"), body)
            .await;
        assert_eq!(status, StatusCode::CREATED, "create commit: {body}");
        body["data"]["id"].as_str().expect("commit id").to_string()
    }
}
