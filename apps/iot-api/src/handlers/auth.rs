//! 认证 handlers
//!
//! - POST /auth/register - 注册新用户
//! - POST /auth/login - 登录并签发 access/refresh token
//! - POST /auth/refresh-token - 用 refresh token 换取新 token（jti 轮换）

use crate::AppState;
use crate::utils::response::{auth_error, bad_request_error, internal_auth_error, user_to_dto};
use crate::utils::validation::normalize_required;
use api_contract::{
    ApiResponse, LoginRequest, LoginResponse, RefreshTokenRequest, RefreshTokenResponse,
    RegisterRequest,
};
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use iot_auth::AuthError;

/// 注册新用户
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Response {
    let email = match normalize_required(req.email, "email") {
        Ok(value) => value,
        Err(response) => return response,
    };
    if req.password.trim().is_empty() {
        return bad_request_error("password required");
    }
    match state
        .auth
        .register(&email, &req.password, req.organization_id, req.group_id)
        .await
    {
        Ok(user) => (
            StatusCode::OK,
            Json(ApiResponse::success(user_to_dto(user))),
        )
            .into_response(),
        Err(AuthError::EmailTaken) => bad_request_error("Email must be unique."),
        Err(err) => internal_auth_error(err),
    }
}

/// 登录并签发 token
pub async fn login(State(state): State<AppState>, Json(req): Json<LoginRequest>) -> Response {
    match state.auth.login(&req.email, &req.password).await {
        Ok((user, tokens)) => {
            let response = LoginResponse {
                access_token: tokens.access_token,
                refresh_token: tokens.refresh_token,
                expires: tokens.expires_at.saturating_mul(1000),
                user: user_to_dto(user),
            };
            (StatusCode::OK, Json(ApiResponse::success(response))).into_response()
        }
        Err(AuthError::InvalidCredentials) => auth_error(StatusCode::UNAUTHORIZED),
        Err(err) => internal_auth_error(err),
    }
}

/// 用 refresh token 换取新 token
pub async fn refresh_token(
    State(state): State<AppState>,
    Json(req): Json<RefreshTokenRequest>,
) -> Response {
    match state.auth.refresh(&req.refresh_token).await {
        Ok(tokens) => {
            let response = RefreshTokenResponse {
                access_token: tokens.access_token,
                refresh_token: tokens.refresh_token,
                expires: tokens.expires_at.saturating_mul(1000),
            };
            (StatusCode::OK, Json(ApiResponse::success(response))).into_response()
        }
        Err(AuthError::TokenInvalid | AuthError::TokenExpired) => {
            auth_error(StatusCode::UNAUTHORIZED)
        }
        Err(err) => internal_auth_error(err),
    }
}
