// HTTP handlers for authentication endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde_json::json;
use validator::Validate;

use crate::auth::{
    error::AuthError,
    middleware::AuthenticatedUser,
    models::{
        AuthResponse, LoginRequest, ProfileResponse, RefreshRequest, RegisterRequest, Role,
        TokenPairResponse, UserResponse,
    },
};
use crate::businesses::repository::BusinessRepository;
use crate::error::ApiError;
use crate::AppState;

/// Register a new user (auto-login: the response carries a token pair)
/// POST /api/auth/register
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = AuthResponse),
        (status = 400, description = "Validation failure or duplicate email")
    ),
    tag = "auth"
)]
pub async fn register_handler(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AuthError> {
    tracing::debug!("Registering new user: {}", request.email);

    let response = state.auth_service.register(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Login with email and password
/// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials or inactive account")
    ),
    tag = "auth"
)]
pub async fn login_handler(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AuthError> {
    request
        .validate()
        .map_err(|e| AuthError::ValidationError(e.to_string()))?;

    let response = state
        .auth_service
        .login(&request.email, &request.password)
        .await?;
    Ok(Json(response))
}

/// Rotate a refresh token into a fresh token pair
/// POST /api/auth/refresh-token
#[utoipa::path(
    post,
    path = "/api/auth/refresh-token",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "Tokens rotated", body = TokenPairResponse),
        (status = 400, description = "Missing refresh token"),
        (status = 401, description = "Invalid, expired or replayed refresh token"),
        (status = 404, description = "User no longer exists")
    ),
    tag = "auth"
)]
pub async fn refresh_handler(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<TokenPairResponse>, AuthError> {
    if request.refresh_token.trim().is_empty() {
        return Err(AuthError::ValidationError(
            "Refresh token is required".to_string(),
        ));
    }

    let response = state.auth_service.refresh(&request.refresh_token).await?;
    Ok(Json(response))
}

/// Current user's profile; business owners get their business attached
/// GET /api/auth/profile
pub async fn profile_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<ProfileResponse>, ApiError> {
    let business = if user.role == Role::Business {
        BusinessRepository::new(state.db.clone())
            .find_first_by_owner(user.user_id)
            .await?
    } else {
        None
    };

    Ok(Json(ProfileResponse {
        user: UserResponse {
            id: user.user_id,
            full_name: user.full_name,
            email: user.email,
            role: user.role,
        },
        business,
    }))
}

/// Partially update the caller's profile
/// PUT /api/auth/profile
pub async fn update_profile_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(patch): Json<crate::auth::models::UpdateProfileRequest>,
) -> Result<Json<UserResponse>, AuthError> {
    let updated = state
        .auth_service
        .update_profile(user.user_id, patch)
        .await?;
    Ok(Json(updated))
}

/// Delete the caller's account (cascades to businesses and products)
/// DELETE /api/auth/delete
pub async fn delete_account_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<serde_json::Value>, AuthError> {
    state.auth_service.delete_account(user.user_id).await?;
    Ok(Json(json!({ "message": "Account deleted" })))
}
