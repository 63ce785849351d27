//! Profile handlers: create, search, read (by id or username), update, delete.

use super::{parse_id, parse_page};
use crate::error::AppError;
use crate::extractors::ApiJson;
use crate::model::{Profile, ProfileCreate, ProfileUpdate};
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
    path = "/profiles",
    tag = "profiles",
    request_body = ProfileCreate,
    responses(
        (status = 201, description = "Created profile in the `data` envelope", body = Profile),
        (status = 409, description = "Username already taken"),
        (status = 422, description = "Validation failed"),
    )
)]
pub async fn create(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<ProfileCreate>,
) -> Result<impl IntoResponse, AppError> {
    body.validate()?;
    let profile = state.profiles.create(body).await?;
    Ok(created(profile))
}

#[utoipa::path(
    get,
    path = "/profiles",
    tag = "profiles",
    params(
        ("skip" = Option<u32>, Query, description = "Rows to skip (default 0)"),
        ("limit" = Option<u32>, Query, description = "Maximum rows, 1 to 100 (default 100)"),
        ("username" = Option<String>, Query, description = "Case-insensitive username substring"),
    ),
    responses(
        (status = 200, description = "Profiles in the `data` envelope", body = [Profile]),
        (status = 422, description = "Invalid paging parameters"),
    )
)]
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let page = parse_page(&params)?;
    let rows = state
        .profiles
        .search(params.get("username").map(String::as_str), page)
        .await?;
    Ok(listed(rows, page))
}

#[utoipa::path(
    get,
    path = "/profiles/{id}",
    tag = "profiles",
    params(("id" = i64, Path, description = "Profile id")),
    responses(
        (status = 200, description = "Profile in the `data` envelope", body = Profile),
        (status = 404, description = "No such profile"),
    )
)]
pub async fn read(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let profile = state.profiles.get_by_id(id).await?;
    Ok(ok(profile))
}

#[utoipa::path(
    get,
    path = "/profiles/by-username/{username}",
    tag = "profiles",
    params(("username" = String, Path, description = "Exact username")),
    responses(
        (status = 200, description = "Profile in the `data` envelope", body = Profile),
        (status = 404, description = "No such profile"),
    )
)]
pub async fn read_by_username(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let profile = state.profiles.get_by_username(&username).await?;
    Ok(ok(profile))
}

#[utoipa::path(
    patch,
    path = "/profiles/{id}",
    tag = "profiles",
    params(("id" = i64, Path, description = "Profile id")),
    request_body = ProfileUpdate,
    responses(
        (status = 200, description = "Updated profile in the `data` envelope", body = Profile),
        (status = 404, description = "No such profile"),
        (status = 409, description = "Username already taken"),
        (status = 422, description = "Validation failed"),
    )
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    ApiJson(body): ApiJson<ProfileUpdate>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    body.validate()?;
    let profile = state.profiles.update(id, body).await?;
    Ok(ok(profile))
}

#[utoipa::path(
    delete,
    path = "/profiles/{id}",
    tag = "profiles",
    params(("id" = i64, Path, description = "Profile id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "No such profile"),
    )
)]
pub async fn delete(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    state.profiles.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
