//! Todo handlers.

use super::{parse_bool, parse_id, parse_page};
use crate::error::AppError;
use crate::extractors::ApiJson;
use crate::model::{Todo, TodoCreate, TodoUpdate};
use crate::response::{created, listed, ok};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::collections::HashMap;

#[utoipa::path(
    post,
    path = "/todos",
    tag = "todos",
    request_body = TodoCreate,
    responses(
        (status = 201, description = "Created todo in the `data` envelope", body = Todo),
        (status = 422, description = "Validation failed"),
    )
)]
pub async fn create(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<TodoCreate>,
) -> Result<impl IntoResponse, AppError> {
    body.validate()?;
    let todo = state.todos.create(body).await?;
    Ok(created(todo))
}

#[utoipa::path(
    get,
    path = "/todos",
    tag = "todos",
    params(
        ("skip" = Option<u32>, Query, description = "Rows to skip (default 0)"),
        ("limit" = Option<u32>, Query, description = "Maximum rows, 1 to 100 (default 100)"),
        ("completed" = Option<bool>, Query, description = "Only todos with this completion state"),
    ),
    responses(
        (status = 200, description = "Todos in the `data` envelope, newest first", body = [Todo]),
        (status = 422, description = "Invalid query parameters"),
    )
)]
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let page = parse_page(&params)?;
    let completed = parse_bool(&params, "completed")?;
    let rows = state.todos.list(page, completed).await?;
    Ok(listed(rows, page))
}

#[utoipa::path(
    get,
    path = "/todos/{id}",
    tag = "todos",
    params(("id" = i64, Path, description = "Todo id")),
    responses(
        (status = 200, description = "Todo in the `data` envelope", body = Todo),
        (status = 404, description = "No such todo"),
    )
)]
pub async fn read(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let todo = state.todos.get_by_id(id).await?;
    Ok(ok(todo))
}

#[utoipa::path(
    patch,
    path = "/todos/{id}",
    tag = "todos",
    params(("id" = i64, Path, description = "Todo id")),
    request_body = TodoUpdate,
    responses(
        (status = 200, description = "Updated todo in the `data` envelope", body = Todo),
        (status = 404, description = "No such todo"),
        (status = 422, description = "Validation failed"),
    )
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    ApiJson(body): ApiJson<TodoUpdate>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    body.validate()?;
    let todo = state.todos.update(id, body).await?;
    Ok(ok(todo))
}

#[utoipa::path(
    delete,
    path = "/todos/{id}",
    tag = "todos",
    params(("id" = i64, Path, description = "Todo id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "No such todo"),
    )
)]
pub async fn delete(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    state.todos.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
