//! Authentication endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::user::{LoginUser, RegisterUser, User},
};

use super::{ApiResponse, AuthenticatedUser, ValidatedJson};

/// Login/registration response payload
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthData {
    pub token: String,
    pub token_type: String,
    pub user: User,
}

/// Authenticate with email and password
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginUser,
    responses(
        (status = 200, description = "Authenticated", body = AuthData),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<crate::AppState>,
    ValidatedJson(login): ValidatedJson<LoginUser>,
) -> AppResult<Json<ApiResponse<AuthData>>> {
    let (user, token) = state.services.auth.login(login).await?;

    Ok(Json(ApiResponse::new(AuthData {
        token,
        token_type: "Bearer".to_string(),
        user,
    })))
}

/// Register a new customer account
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = RegisterUser,
    responses(
        (status = 201, description = "Account created", body = AuthData),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Email already in use")
    )
)]
pub async fn register(
    State(state): State<crate::AppState>,
    ValidatedJson(register): ValidatedJson<RegisterUser>,
) -> AppResult<(StatusCode, Json<ApiResponse<AuthData>>)> {
    let (user, token) = state.services.auth.register(register).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            AuthData {
                token,
                token_type: "Bearer".to_string(),
                user,
            },
            "Account created successfully",
        )),
    ))
}

/// Get the currently authenticated user
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn me(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<ApiResponse<User>>> {
    let user = state.services.auth.current_user(&claims).await?;
    Ok(Json(ApiResponse::new(user)))
}
