use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};

use crate::server::AppState;
use crate::server::response::{ApiError, ApiResponse};
use crate::service::{CreateBranch, CreateProject};

pub async fn list_projects(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let projects = state.projects().list()?;

    Ok::<_, ApiError>(Json(ApiResponse::success(projects)))
}

pub async fn create_project(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateProject>, JsonRejection>,
) -> impl IntoResponse {
    let Json(req) = payload.map_err(ApiError::from)?;
    let project = state.projects().create(req)?;

    Ok::<_, ApiError>((StatusCode::CREATED, Json(ApiResponse::success(project))))
}

pub async fn get_project(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let project = state.projects().get(&id)?;

    Ok::<_, ApiError>(Json(ApiResponse::success(project)))
}

pub async fn delete_project(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    state.projects().delete(&id)?;

    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}

pub async fn list_branches(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let branches = state.projects().list_branches(&id)?;

    Ok::<_, ApiError>(Json(ApiResponse::success(branches)))
}

pub async fn create_branch(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<CreateBranch>, JsonRejection>,
) -> impl IntoResponse {
    let Json(req) = payload.map_err(ApiError::from)?;
    let branch = state.projects().create_branch(&id, req)?;

    Ok::<_, ApiError>((StatusCode::CREATED, Json(ApiResponse::success(branch))))
}
