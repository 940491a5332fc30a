//! 健康检查处理器
//! 提供 /health 和 /ready 端点

use axum::{extract::State, http::StatusCode, Json};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

use crate::{db::HealthStatus, middleware::AppState, repository::Repository};

/// 对外暴露的失败信息，底层错误只写日志
const UNAVAILABLE: &str = "unavailable";

static START_TIME: Lazy<Instant> = Lazy::new(Instant::now);

/// 存活探针响应
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

/// 就绪探针响应
#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub checks: Vec<HealthCheck>,
}

/// 健康检查项
#[derive(Debug, Serialize)]
pub struct HealthCheck {
    pub name: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl HealthCheck {
    fn from_status(name: &str, status: HealthStatus) -> Self {
        match status {
            HealthStatus::Healthy => Self {
                name: name.to_string(),
                status: "healthy".to_string(),
                message: None,
            },
            HealthStatus::Unhealthy(detail) => {
                tracing::warn!(check = name, %detail, "Readiness check failed");
                Self {
                    name: name.to_string(),
                    status: "unhealthy".to_string(),
                    message: Some(UNAVAILABLE.to_string()),
                }
            }
        }
    }
}

/// 记录启动时间，服务启动时调用
pub fn mark_started() {
    Lazy::force(&START_TIME);
}

/// 存活探针
/// 快速响应，不检查依赖
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: START_TIME.elapsed().as_secs(),
    })
}

/// 就绪探针
/// 检查数据库，未就绪时返回 503
pub async fn readiness_check<R>(
    State(state): State<Arc<AppState<R>>>,
) -> (StatusCode, Json<ReadinessResponse>)
where
    R: Repository + ?Sized,
{
    let checks = vec![HealthCheck::from_status(
        "database",
        state.repo.health_check().await,
    )];

    let ready = checks.iter().all(|c| c.status == "healthy");
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(ReadinessResponse { ready, checks }))
}
