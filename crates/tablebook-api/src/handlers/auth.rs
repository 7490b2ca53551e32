//! Auth handlers: register, login, refresh, me.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use tablebook_entity::user::User;
use tablebook_service::user::NewAccount;

use crate::dto::request::{LoginRequest, RefreshRequest, RegisterRequest};
use crate::dto::response::{ApiResponse, LoginResponse};
use crate::error::ApiResult;
use crate::extractors::{AuthUser, ValidatedJson};
use crate::state::AppState;

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<User>>)> {
    let user = state
        .account_service
        .register(&NewAccount::from(req))
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(user))))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<ApiResponse<LoginResponse>>> {
    let (user, tokens) = state
        .account_service
        .login(&req.username, &req.password)
        .await?;
    Ok(Json(ApiResponse::ok(LoginResponse::new(tokens, Some(user)))))
}

/// POST /api/auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RefreshRequest>,
) -> ApiResult<Json<ApiResponse<LoginResponse>>> {
    let tokens = state.account_service.refresh(&req.refresh_token).await?;
    Ok(Json(ApiResponse::ok(LoginResponse::new(tokens, None))))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<User>>> {
    let user = state.account_service.me(&auth).await?;
    Ok(Json(ApiResponse::ok(user)))
}
