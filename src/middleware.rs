//! HTTP 中间件
//! 请求日志与关联 ID、跨域、panic 兜底

use axum::{
    extract::{FromRequestParts, Request},
    http::{request::Parts, HeaderMap, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{self, AllowHeaders, AllowMethods, CorsLayer};
use tracing::Instrument;
use uuid::Uuid;

use crate::{
    auth::{AuthGate, TokenManager},
    config::AppConfig,
    error::AppError,
};

/// 关联 ID 请求/响应头
pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";

/// 应用状态
///
/// 两个服务共用同一结构，`R` 为各自的仓储 trait 对象。
/// 外层用 Arc 包装，Clone 成本低廉。
pub struct AppState<R: ?Sized> {
    pub config: AppConfig,
    pub tokens: Arc<TokenManager>,
    pub gate: Arc<AuthGate>,
    pub repo: Arc<R>,
}

impl<R: ?Sized> AppState<R> {
    pub fn new(config: AppConfig, tokens: Arc<TokenManager>, repo: Arc<R>) -> Self {
        let gate = Arc::new(AuthGate::new(
            tokens.clone(),
            config.security.excluded_paths.clone(),
        ));

        Self {
            config,
            tokens,
            gate,
            repo,
        }
    }
}

/// 单个请求的关联 ID（由请求日志中间件写入请求扩展）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrelationId(pub String);

impl CorrelationId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<S> FromRequestParts<S> for CorrelationId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CorrelationId>()
            .cloned()
            .ok_or_else(|| AppError::Internal("request logging middleware not installed".to_string()))
    }
}

/// 请求日志中间件
/// 读取或生成关联 ID，记录请求开始/结束与耗时，并写回响应头
pub async fn request_logging_middleware(mut req: Request, next: Next) -> Response {
    let correlation_id = extract_or_generate_correlation_id(req.headers());
    req.extensions_mut().insert(correlation_id.clone());

    let method = req.method().clone();
    let uri = req.uri().to_string();

    let span = tracing::info_span!(
        "http_request",
        correlation_id = %correlation_id,
        method = %method,
    );

    async move {
        tracing::info!(
            method = %method,
            url = %uri,
            correlation_id = %correlation_id,
            "Request started"
        );

        let start = Instant::now();

        let mut response = next.run(req).await;

        let elapsed = start.elapsed();
        let status = response.status().as_u16();

        metrics::counter!(
            "http_requests_total",
            "method" => method.as_str().to_owned(),
            "status" => status.to_string()
        )
        .increment(1);
        metrics::histogram!("http_request_duration_seconds").record(elapsed.as_secs_f64());

        tracing::info!(
            elapsed_secs = %format!("{:.4}", elapsed.as_secs_f64()),
            status = status,
            correlation_id = %correlation_id,
            "Request completed"
        );

        match HeaderValue::from_str(correlation_id.as_str()) {
            Ok(value) => {
                response.headers_mut().insert(CORRELATION_ID_HEADER, value);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Correlation id is not a valid header value");
            }
        }

        response
    }
    .instrument(span)
    .await
}

/// 从请求头中提取或生成关联 ID
fn extract_or_generate_correlation_id(headers: &HeaderMap) -> CorrelationId {
    let id = headers
        .get(CORRELATION_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    CorrelationId(id)
}

/// 跨域配置
/// 含 "*" 时放开任意来源（不带凭证），否则仅允许列出的来源并允许凭证
pub fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        tracing::warn!("CORS is configured to allow any origin");
        return CorsLayer::new()
            .allow_origin(cors::Any)
            .allow_methods(cors::Any)
            .allow_headers(cors::Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

/// handler panic -> 500，响应体不包含 panic 内容
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");

    tracing::error!(panic = %detail, "Handler panicked");

    AppError::Internal("handler panicked".to_string()).into_response()
}
