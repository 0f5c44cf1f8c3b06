//! User management endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        book::BorrowedBook,
        user::{CreateUser, DeleteUserParams, UpdateUser, User, UserSummary},
    },
};

use super::AuthenticatedUser;

/// List all users
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List of users", body = Vec<UserSummary>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_users(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<UserSummary>>> {
    let users = state.services.users.list_users().await?;
    Ok(Json(users))
}

/// Create a new user account (signup, unauthenticated)
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    request_body = CreateUser,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn create_user(
    State(state): State<crate::AppState>,
    Json(user): Json<CreateUser>,
) -> AppResult<(StatusCode, Json<User>)> {
    let created = state.services.users.create_user(user).await?;

    tracing::info!(user_id = created.id, "user created");

    Ok((StatusCode::CREATED, Json(created)))
}

/// Get user details by ID
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User details", body = User),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<User>> {
    let user = state.services.users.get_by_id(id).await?;
    Ok(Json(user))
}

/// Look up a user by email (entry-point lookup, unauthenticated)
#[utoipa::path(
    get,
    path = "/users/email/{email}",
    tag = "users",
    params(
        ("email" = String, Path, description = "Email address")
    ),
    responses(
        (status = 200, description = "User details", body = User),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user_by_email(
    State(state): State<crate::AppState>,
    Path(email): Path<String>,
) -> AppResult<Json<User>> {
    let user = state.services.users.get_by_email(&email).await?;
    Ok(Json(user))
}

/// Update an existing user
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "users",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "User updated", body = User),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_user(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(user): Json<UpdateUser>,
) -> AppResult<Json<User>> {
    let updated = state.services.users.update_user(id, user).await?;
    Ok(Json(updated))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "users",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "User ID"),
        ("force" = Option<bool>, Query, description = "Delete even with open borrows")
    ),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "User not found"),
        (status = 409, description = "User has open borrows")
    )
)]
pub async fn delete_user(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Query(params): Query<DeleteUserParams>,
) -> AppResult<StatusCode> {
    state
        .services
        .users
        .delete_user(id, params.force.unwrap_or(false))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List a user's open borrows
#[utoipa::path(
    get,
    path = "/users/{id}/borrows",
    tag = "borrows",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User's open borrows", body = Vec<BorrowedBook>),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user_borrows(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<BorrowedBook>>> {
    let borrows = state.services.lending.list_user_borrows(id).await?;
    Ok(Json(borrows))
}
