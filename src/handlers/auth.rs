//! 认证处理器：登录、刷新、受保护示例接口

use axum::{extract::State, http::HeaderMap, Json};
use std::sync::Arc;

use super::ValidatedJson;
use crate::{
    auth::{extract_token, CurrentUser, TokenPair},
    error::{AppError, AuthErrorCode},
    middleware::AppState,
    models::auth::{LoginRequest, ProtectedResponse},
};

/// 登录，为 `tokenId` 签发令牌对
pub async fn login<R>(
    State(state): State<Arc<AppState<R>>>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<TokenPair>, AppError>
where
    R: ?Sized + Send + Sync,
{
    let pair = state.tokens.issue_token_pair(&req.token_id)?;

    tracing::info!(subject_id = %req.token_id, "Token pair issued");
    Ok(Json(pair))
}

/// 用 Bearer 刷新令牌换取新的令牌对
pub async fn refresh<R>(
    State(state): State<Arc<AppState<R>>>,
    headers: HeaderMap,
) -> Result<Json<TokenPair>, AppError>
where
    R: ?Sized + Send + Sync,
{
    let token = extract_token(&headers).map_err(|e| match e {
        AppError::Auth {
            code: AuthErrorCode::MissingAuthorization,
            ..
        } => AppError::Unauthorized("No refresh token provided".to_string()),
        _ => AppError::Unauthorized("Invalid token".to_string()),
    })?;

    let pair = state.tokens.refresh(token).map_err(|e| {
        tracing::debug!(error = %e, "Refresh rejected");
        AppError::from(e)
    })?;

    Ok(Json(pair))
}

pub async fn protected(CurrentUser(claims): CurrentUser) -> Json<ProtectedResponse> {
    Json(ProtectedResponse {
        message: "This is protected".to_string(),
        user: claims,
    })
}
