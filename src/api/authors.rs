//! Author management endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::author::{Author, AuthorQuery, CreateAuthor, UpdateAuthor},
};

use super::{books::Pagination, ApiResponse, AuthenticatedUser, ValidatedJson, ValidatedQuery};

/// Author listing payload
#[derive(Serialize, ToSchema)]
pub struct AuthorListData {
    pub authors: Vec<Author>,
    pub pagination: Pagination,
}

/// List authors with pagination
#[utoipa::path(
    get,
    path = "/authors",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(AuthorQuery),
    responses(
        (status = 200, description = "Paginated list of authors", body = AuthorListData),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_authors(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ValidatedQuery(query): ValidatedQuery<AuthorQuery>,
) -> AppResult<Json<ApiResponse<AuthorListData>>> {
    claims.require_admin()?;

    let (authors, total) = state.services.authors.list(&query).await?;
    let pagination = Pagination::new(query.page(), query.limit(), total);

    Ok(Json(ApiResponse::new(AuthorListData { authors, pagination })))
}

/// Get author details by ID
#[utoipa::path(
    get,
    path = "/authors/{id}",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Author ID")
    ),
    responses(
        (status = 200, description = "Author details", body = Author),
        (status = 404, description = "Author not found")
    )
)]
pub async fn get_author(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Author>>> {
    claims.require_admin()?;

    let author = state.services.authors.get_by_id(id).await?;
    Ok(Json(ApiResponse::new(author)))
}

/// Create a new author
#[utoipa::path(
    post,
    path = "/authors",
    tag = "authors",
    security(("bearer_auth" = [])),
    request_body = CreateAuthor,
    responses(
        (status = 201, description = "Author created", body = Author),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn create_author(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ValidatedJson(author): ValidatedJson<CreateAuthor>,
) -> AppResult<(StatusCode, Json<ApiResponse<Author>>)> {
    claims.require_admin()?;

    let created = state.services.authors.create(author).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(created, "Author created successfully")),
    ))
}

/// Update an existing author
#[utoipa::path(
    put,
    path = "/authors/{id}",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Author ID")
    ),
    request_body = UpdateAuthor,
    responses(
        (status = 200, description = "Author updated", body = Author),
        (status = 404, description = "Author not found")
    )
)]
pub async fn update_author(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    ValidatedJson(author): ValidatedJson<UpdateAuthor>,
) -> AppResult<Json<ApiResponse<Author>>> {
    claims.require_admin()?;

    let updated = state.services.authors.update(id, author).await?;
    Ok(Json(ApiResponse::with_message(
        updated,
        "Author updated successfully",
    )))
}

/// Delete an author
#[utoipa::path(
    delete,
    path = "/authors/{id}",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Author ID")
    ),
    responses(
        (status = 200, description = "Author deleted"),
        (status = 404, description = "Author not found")
    )
)]
pub async fn delete_author(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    claims.require_admin()?;

    state.services.authors.delete(id).await?;
    Ok(Json(ApiResponse::with_message(
        serde_json::Value::Null,
        "Author deleted successfully",
    )))
}
