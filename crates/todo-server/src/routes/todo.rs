use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use todo_core::page::PageLinks;
use todo_core::{PageResponse, Summary, Task, TaskInput, API_PATH};
use tracing::info;

use super::AppState;
use crate::store::StoreError;

type ApiError = (StatusCode, Json<Value>);

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/todo/", get(list_tasks).post(create_task))
        .route("/api/todo/summary/", get(summary))
        .route(
            "/api/todo/{id}/",
            get(get_task).put(update_task).delete(delete_task),
        )
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    page: Option<String>,
    page_size: Option<String>,
}

async fn list_tasks(
    State(state): State<AppState>,
    Query(q): Query<ListQuery>,
) -> Result<Json<PageResponse>, ApiError> {
    let page = match q.page.as_deref() {
        None => 1,
        Some(raw) => raw
            .parse::<u64>()
            .map_err(|_| to_error(StoreError::InvalidPage))?,
    };
    let page_size = q
        .page_size
        .as_deref()
        .and_then(|raw| raw.parse::<u64>().ok())
        .filter(|&n| n > 0)
        .unwrap_or(state.page_size);

    let slice = state.store.list_page(page, page_size).map_err(to_error)?;
    let links = PageLinks {
        next: slice
            .has_next
            .then(|| format!("{API_PATH}?page={}", page + 1)),
        previous: slice
            .has_previous
            .then(|| format!("{API_PATH}?page={}", page - 1)),
    };
    Ok(Json(PageResponse {
        count: slice.count,
        page_size: Some(page_size),
        results: slice.tasks,
        links: Some(links),
    }))
}

async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Task>, ApiError> {
    let id = parse_id(&id)?;
    state.store.get(id).map(Json).map_err(to_error)
}

async fn create_task(
    State(state): State<AppState>,
    payload: Result<Json<TaskInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let Json(input) = payload.map_err(bad_body)?;
    let task = state.store.create(&input).map_err(to_error)?;
    info!(id = task.id, "task created");
    Ok((StatusCode::CREATED, Json(task)))
}

async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<TaskInput>, JsonRejection>,
) -> Result<Json<Task>, ApiError> {
    let id = parse_id(&id)?;
    let Json(input) = payload.map_err(bad_body)?;
    let task = state.store.update(id, &input).map_err(to_error)?;
    info!(id, "task updated");
    Ok(Json(task))
}

async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    state.store.delete(id).map_err(to_error)?;
    info!(id, "task deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn summary(State(state): State<AppState>) -> Json<Summary> {
    Json(state.store.summary())
}

// Non-numeric ids never match a task.
fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse().map_err(|_| to_error(StoreError::NotFound))
}

fn bad_body(rejection: JsonRejection) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "detail": rejection.body_text() })),
    )
}

fn to_error(e: StoreError) -> ApiError {
    match e {
        StoreError::NotFound | StoreError::InvalidPage => {
            (StatusCode::NOT_FOUND, Json(json!({ "detail": e.to_string() })))
        }
        StoreError::Invalid { field, message } => {
            (StatusCode::BAD_REQUEST, Json(json!({ field: [message] })))
        }
    }
}
