//! JWT 认证中间件
//! 校验 Bearer 访问令牌，排除路径直接放行

use crate::{
    auth::jwt::{Claims, TokenKind, TokenManager},
    auth::TokenError,
    error::{AppError, AuthErrorCode},
    middleware::AppState,
};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

const BEARER_PREFIX: &str = "Bearer ";

/// 认证闸门：持有令牌管理器和排除路径前缀（构造后不可变）
#[derive(Debug)]
pub struct AuthGate {
    tokens: Arc<TokenManager>,
    excluded_paths: Vec<String>,
}

impl AuthGate {
    pub fn new(tokens: Arc<TokenManager>, excluded_paths: Vec<String>) -> Self {
        Self {
            tokens,
            excluded_paths,
        }
    }

    pub fn excluded_paths(&self) -> &[String] {
        &self.excluded_paths
    }

    /// 路径是否以任一排除前缀开头
    pub fn is_excluded(&self, path: &str) -> bool {
        self.excluded_paths
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
    }

    /// 校验请求头中的访问令牌
    pub fn authorize(&self, headers: &HeaderMap) -> Result<Claims, AppError> {
        let token = extract_token(headers)?;

        self.tokens
            .verify(token, TokenKind::Access)
            .map_err(reject_access_token)
    }
}

/// 从 Authorization 头提取令牌
pub fn extract_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let value = headers.get(AUTHORIZATION).ok_or_else(|| {
        AppError::auth(
            AuthErrorCode::MissingAuthorization,
            "Authorization header is missing",
        )
    })?;

    value
        .to_str()
        .ok()
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .ok_or_else(|| {
            AppError::auth(
                AuthErrorCode::InvalidAuthorizationFormat,
                "Invalid Authorization header format",
            )
        })
}

/// 访问令牌校验失败 -> 401。过期单独区分，客户端可用刷新令牌恢复
fn reject_access_token(err: TokenError) -> AppError {
    match err {
        TokenError::Expired { .. } => AppError::auth(
            AuthErrorCode::TokenExpired,
            "Access token has expired, use your refresh token to obtain a new one",
        ),
        other => {
            tracing::debug!(error = %other, "Access token rejected");
            AppError::auth(AuthErrorCode::InvalidOrExpiredToken, "Invalid or expired token")
        }
    }
}

/// JWT 认证中间件
///
/// 校验通过后将 [`Claims`] 附加到请求扩展
pub async fn auth_gate_middleware(
    State(gate): State<Arc<AuthGate>>,
    mut req: Request,
    next: Next,
) -> Response {
    if gate.is_excluded(req.uri().path()) {
        return next.run(req).await;
    }

    match gate.authorize(req.headers()) {
        Ok(claims) => {
            tracing::debug!(subject_id = %claims.subject_id, "Request authorized");
            req.extensions_mut().insert(claims);
            next.run(req).await
        }
        Err(e) => e.into_response(),
    }
}

/// 当前用户（handler 参数）
///
/// 优先使用中间件附加的 claims；中间件未启用或路径被排除时自行校验，
/// 因此使用它的接口始终受保护。
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Claims);

impl<R> FromRequestParts<Arc<AppState<R>>> for CurrentUser
where
    R: ?Sized + Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState<R>>,
    ) -> Result<Self, Self::Rejection> {
        if let Some(claims) = parts.extensions.get::<Claims>() {
            return Ok(CurrentUser(claims.clone()));
        }

        state.gate.authorize(&parts.headers).map(CurrentUser)
    }
}
