//! 统一错误模型
//! 定义所有错误类型和错误响应格式
//!
//! 响应体统一为 `{"detail": "..."}` 或 `{"detail": {"code": "...", "message": "..."}}`，
//! 内部错误只返回固定文案，不暴露底层细节。

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::auth::TokenError;

/// 内部错误的固定对外文案
pub const INTERNAL_ERROR_MESSAGE: &str = "An internal server error occurred";

/// 认证失败的机器可读错误码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthErrorCode {
    MissingAuthorization,
    InvalidAuthorizationFormat,
    /// 访问令牌过期，可用刷新令牌恢复
    TokenExpired,
    InvalidOrExpiredToken,
    /// 刷新令牌也已过期，需要重新登录
    RefreshTokenExpired,
}

impl AuthErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            AuthErrorCode::MissingAuthorization => "missing_authorization",
            AuthErrorCode::InvalidAuthorizationFormat => "invalid_authorization_format",
            AuthErrorCode::TokenExpired => "token_expired",
            AuthErrorCode::InvalidOrExpiredToken => "invalid_or_expired_token",
            AuthErrorCode::RefreshTokenExpired => "refresh_token_expired",
        }
    }
}

/// 应用错误类型
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// 带错误码的认证失败
    #[error("Authentication failed ({}): {message}", code.as_str())]
    Auth { code: AuthErrorCode, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn auth(code: AuthErrorCode, message: impl Into<String>) -> Self {
        AppError::Auth {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound(message.into())
    }

    /// 获取 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) | AppError::Auth { .. } => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Database(_) | AppError::Config(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// 获取用户友好的错误消息（不包含敏感信息）
    pub fn user_message(&self) -> String {
        match self {
            AppError::Unauthorized(msg) => msg.clone(),
            AppError::Auth { message, .. } => message.clone(),
            AppError::NotFound(msg) => msg.clone(),
            AppError::BadRequest(msg) => msg.clone(),
            AppError::Validation(msg) => msg.clone(),
            AppError::Database(_) => "Database error occurred".to_string(),
            AppError::Config(_) | AppError::Internal(_) => INTERNAL_ERROR_MESSAGE.to_string(),
        }
    }

    /// 获取响应体
    pub fn to_error_response(&self) -> ErrorResponse {
        let detail = match self {
            AppError::Auth { code, message } => ErrorDetail::Coded {
                code: *code,
                message: message.clone(),
            },
            other => ErrorDetail::Message(other.user_message()),
        };

        ErrorResponse { detail }
    }
}

/// 错误响应 DTO
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: ErrorDetail,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ErrorDetail {
    Message(String),
    Coded { code: AuthErrorCode, message: String },
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // 记录错误日志
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "Application error");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "Request rejected");
        }

        (status, Json(self.to_error_response())).into_response()
    }
}

/// 令牌错误的默认映射（刷新接口与当前用户提取器使用）
impl From<TokenError> for AppError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::Encoding(msg) => AppError::Internal(msg),
            TokenError::Invalid => AppError::Unauthorized("Invalid token".to_string()),
            TokenError::TypeMismatch { .. } => {
                AppError::Unauthorized("Invalid token type".to_string())
            }
            TokenError::Expired { .. } => {
                AppError::auth(AuthErrorCode::TokenExpired, "Token has expired")
            }
            TokenError::SessionExpired => AppError::auth(
                AuthErrorCode::RefreshTokenExpired,
                "Refresh token expired, please login again",
            ),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::Validation(e.to_string())
    }
}

/// 从 config::ConfigError 转换
impl From<config::ConfigError> for AppError {
    fn from(e: config::ConfigError) -> Self {
        AppError::Config(e.to_string())
    }
}
