//! 消息接口

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use super::{ApiPath, MessageState, ValidatedJson};
use crate::{
    error::AppError,
    models::message::{Message, MessageIn, MessageUpdate},
};

const MESSAGE_NOT_FOUND: &str = "Message not found";

pub async fn create_message(
    State(state): State<MessageState>,
    ValidatedJson(req): ValidatedJson<MessageIn>,
) -> Result<(StatusCode, Json<Message>), AppError> {
    let message = state.repo.create(&req).await?;

    tracing::info!(
        message_id = message.id,
        customer_id = message.customer_id,
        breeder_id = message.breeder_id,
        "Message created"
    );

    Ok((StatusCode::CREATED, Json(message)))
}

pub async fn list_messages(State(state): State<MessageState>) -> Result<Json<Vec<Message>>, AppError> {
    Ok(Json(state.repo.list().await?))
}

pub async fn get_message(
    State(state): State<MessageState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Message>, AppError> {
    let message = state
        .repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::not_found(MESSAGE_NOT_FOUND))?;

    Ok(Json(message))
}

/// 部分更新
pub async fn update_message(
    State(state): State<MessageState>,
    ApiPath(id): ApiPath<i64>,
    ValidatedJson(update): ValidatedJson<MessageUpdate>,
) -> Result<Json<Message>, AppError> {
    let message = state
        .repo
        .update(id, &update)
        .await?
        .ok_or_else(|| AppError::not_found(MESSAGE_NOT_FOUND))?;

    Ok(Json(message))
}

pub async fn delete_message(
    State(state): State<MessageState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, AppError> {
    if !state.repo.delete(id).await? {
        return Err(AppError::not_found(MESSAGE_NOT_FOUND));
    }

    tracing::info!(message_id = id, "Message deleted");
    Ok(StatusCode::OK)
}
