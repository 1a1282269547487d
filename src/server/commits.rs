use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};

use crate::server::AppState;
use crate::server::response::{ApiError, ApiResponse};
use crate::service::CreateCommit;

pub async fn list_commits(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<String>,
) -> impl IntoResponse {
    let commits = state.projects().list_commits(&project_id)?;

    Ok::<_, ApiError>(Json(ApiResponse::success(commits)))
}

pub async fn create_commit(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<String>,
    payload: Result<Json<CreateCommit>, JsonRejection>,
) -> impl IntoResponse {
    let Json(req) = payload.map_err(ApiError::from)?;
    let commit = state.projects().create_commit(&project_id, req)?;

    Ok::<_, ApiError>((StatusCode::CREATED, Json(ApiResponse::success(commit))))
}

pub async fn get_commit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let commit = state.projects().get_commit(&id)?;

    Ok::<_, ApiError>(Json(ApiResponse::success(commit)))
}

pub async fn commit_history(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let history = state.projects().commit_history(&id)?;

    Ok::<_, ApiError>(Json(ApiResponse::success(history)))
}

pub async fn commit_files(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let files = state.projects().commit_files(&id)?;

    Ok::<_, ApiError>(Json(ApiResponse::success(files)))
}
