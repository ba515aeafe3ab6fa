//! Auth handlers: login, register, verify, logout.

use axum::Json;
use axum::extract::State;

use crate::dto::request::{LoginRequest, RegisterRequest, TokenRequest};
use crate::dto::response::{LoginResponse, LogoutResponse, RegisterResponse, VerifyResponse};
use crate::error::ApiError;
use crate::extractors::ValidatedJson;
use crate::state::AppState;

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let outcome = state.auth.login(&req.username, &req.password).await?;
    Ok(Json(outcome.into()))
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<Json<RegisterResponse>, ApiError> {
    let outcome = state
        .auth
        .register(&req.username, &req.email, &req.password)
        .await?;
    Ok(Json(outcome.into()))
}

/// POST /api/auth/verify
pub async fn verify(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<TokenRequest>,
) -> Result<Json<VerifyResponse>, ApiError> {
    let outcome = state.auth.verify(&req.token).await?;
    Ok(Json(outcome.into()))
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<TokenRequest>,
) -> Result<Json<LogoutResponse>, ApiError> {
    let outcome = state.auth.logout(&req.token).await?;
    Ok(Json(LogoutResponse {
        revoked: outcome.revoked,
    }))
}
