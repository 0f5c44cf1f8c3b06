//! Authentication endpoints

use axum::{extract::State, Json};

use crate::{
    error::AppResult,
    models::user::{Login, TokenResponse, User},
};

use super::AuthenticatedUser;

/// Authenticate and obtain a bearer token
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = Login,
    responses(
        (status = 200, description = "Authenticated", body = TokenResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<crate::AppState>,
    Json(login): Json<Login>,
) -> AppResult<Json<TokenResponse>> {
    let (token, user) = state
        .services
        .auth
        .authenticate(&login.email, &login.password)
        .await?;

    tracing::info!(user_id = user.id, "user logged in");

    Ok(Json(TokenResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
    }))
}

/// Get the authenticated user's own record
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
) -> AppResult<Json<User>> {
    let user = state.services.auth.me(claims.user_id).await?;
    Ok(Json(user))
}
