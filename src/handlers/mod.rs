//! HTTP 处理器模块

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        FromRequest, FromRequestParts, Path, Query, Request,
    },
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use validator::Validate;

use crate::{
    error::AppError,
    middleware::AppState,
    repository::{MessageRepository, PetRepository},
};

pub mod auth;
pub mod health;
pub mod messages;
pub mod pets;

pub type PetState = Arc<AppState<dyn PetRepository>>;
pub type MessageState = Arc<AppState<dyn MessageRepository>>;

/// 反序列化并校验的 JSON 请求体
///
/// 字段缺失、类型不符或校验失败返回 422；JSON 语法错误或缺少
/// `Content-Type: application/json` 返回 400
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| match rejection {
                JsonRejection::JsonDataError(_) => AppError::Validation(rejection.body_text()),
                _ => AppError::BadRequest(rejection.body_text()),
            })?;

        value.validate()?;

        Ok(Self(value))
    }
}

/// 路径参数，解析失败以 `{detail}` 返回 422
#[derive(Debug, Clone)]
pub struct ApiPath<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| match rejection {
                PathRejection::FailedToDeserializePathParams(_) => {
                    AppError::Validation(rejection.body_text())
                }
                _ => AppError::BadRequest(rejection.body_text()),
            })?;

        Ok(Self(value))
    }
}

/// 查询参数，解析失败以 `{detail}` 返回 422
#[derive(Debug, Clone)]
pub struct ApiQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection: QueryRejection| AppError::Validation(rejection.body_text()))?;

        Ok(Self(value))
    }
}
