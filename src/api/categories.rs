//! Category management endpoints

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
    models::category::{Category, CategoryQuery, CreateCategory, UpdateCategory},
};

use super::{books::Pagination, ApiResponse, AuthenticatedUser, ValidatedJson, ValidatedQuery};

/// Category listing payload
#[derive(Serialize, ToSchema)]
pub struct CategoryListData {
    pub categories: Vec<Category>,
    pub pagination: Pagination,
}

/// List categories with pagination
#[utoipa::path(
    get,
    path = "/categories",
    tag = "categories",
    security(("bearer_auth" = [])),
    params(CategoryQuery),
    responses(
        (status = 200, description = "Paginated list of categories", body = CategoryListData),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_categories(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ValidatedQuery(query): ValidatedQuery<CategoryQuery>,
) -> AppResult<Json<ApiResponse<CategoryListData>>> {
    claims.require_admin()?;

    let (categories, total) = state.services.categories.list(&query).await?;
    let pagination = Pagination::new(query.page(), query.limit(), total);

    Ok(Json(ApiResponse::new(CategoryListData {
        categories,
        pagination,
    })))
}

/// Get category details by ID
#[utoipa::path(
    get,
    path = "/categories/{id}",
    tag = "categories",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Category details", body = Category),
        (status = 404, description = "Category not found")
    )
)]
pub async fn get_category(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Category>>> {
    claims.require_admin()?;

    let category = state.services.categories.get_by_id(id).await?;
    Ok(Json(ApiResponse::new(category)))
}

/// Create a new category
#[utoipa::path(
    post,
    path = "/categories",
    tag = "categories",
    security(("bearer_auth" = [])),
    request_body = CreateCategory,
    responses(
        (status = 201, description = "Category created", body = Category),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Name or slug already in use")
    )
)]
pub async fn create_category(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ValidatedJson(category): ValidatedJson<CreateCategory>,
) -> AppResult<(StatusCode, Json<ApiResponse<Category>>)> {
    claims.require_admin()?;

    let created = state.services.categories.create(category).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(created, "Category created successfully")),
    ))
}

/// Update an existing category
#[utoipa::path(
    put,
    path = "/categories/{id}",
    tag = "categories",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    request_body = UpdateCategory,
    responses(
        (status = 200, description = "Category updated", body = Category),
        (status = 404, description = "Category not found"),
        (status = 409, description = "Name or slug already in use")
    )
)]
pub async fn update_category(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    ValidatedJson(category): ValidatedJson<UpdateCategory>,
) -> AppResult<Json<ApiResponse<Category>>> {
    claims.require_admin()?;

    let updated = state.services.categories.update(id, category).await?;
    Ok(Json(ApiResponse::with_message(
        updated,
        "Category updated successfully",
    )))
}

/// Delete a category; its children are detached, not deleted
#[utoipa::path(
    delete,
    path = "/categories/{id}",
    tag = "categories",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Category deleted"),
        (status = 404, description = "Category not found")
    )
)]
pub async fn delete_category(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    claims.require_admin()?;

    state.services.categories.delete(id).await?;
    Ok(Json(ApiResponse::with_message(
        serde_json::Value::Null,
        "Category deleted successfully",
    )))
}
