//! 宠物接口

use axum::{
    extract::State,
    http::{header, HeaderValue, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use uuid::Uuid;

use super::{ApiPath, ApiQuery, PetState, ValidatedJson};
use crate::{
    error::AppError,
    models::pet::{
        pet_href, PetFilterParams, PetIn, PetListResponse, PetOut, PetUpdate,
        PETS_COLLECTION_HREF,
    },
};

const PET_NOT_FOUND: &str = "Pet not found";

/// 创建宠物，id 由服务端生成
pub async fn create_pet(
    State(state): State<PetState>,
    ValidatedJson(req): ValidatedJson<PetIn>,
) -> Result<impl IntoResponse, AppError> {
    let id = Uuid::new_v4().to_string();
    let pet = state.repo.create(&id, &req).await?;

    tracing::info!(pet_id = %pet.id, breeder_id = %pet.breeder_id, "Pet created");

    let href = pet_href(&pet.id);
    let location = HeaderValue::from_str(&href)
        .map_err(|e| AppError::Internal(format!("invalid location header: {e}")))?;
    let link = HeaderValue::from_str(&format!(
        r#"<{href}>; rel="self", <{PETS_COLLECTION_HREF}>; rel="collection""#
    ))
    .map_err(|e| AppError::Internal(format!("invalid link header: {e}")))?;

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location), (header::LINK, link)],
        Json(PetOut::from(pet)),
    ))
}

/// 列出宠物，支持 `type` 过滤和 limit/offset 分页
pub async fn list_pets(
    State(state): State<PetState>,
    ApiQuery(params): ApiQuery<PetFilterParams>,
) -> Result<Json<PetListResponse>, AppError> {
    let pets = state.repo.list(&params).await?;

    Ok(Json(PetListResponse {
        data: pets.into_iter().map(PetOut::from).collect(),
        links: params.links(),
    }))
}

pub async fn get_pet(
    State(state): State<PetState>,
    ApiPath(id): ApiPath<String>,
) -> Result<Json<PetOut>, AppError> {
    let pet = state
        .repo
        .get(&id)
        .await?
        .ok_or_else(|| AppError::not_found(PET_NOT_FOUND))?;

    Ok(Json(PetOut::from(pet)))
}

/// 部分更新
pub async fn update_pet(
    State(state): State<PetState>,
    ApiPath(id): ApiPath<String>,
    ValidatedJson(update): ValidatedJson<PetUpdate>,
) -> Result<Json<PetOut>, AppError> {
    let pet = state
        .repo
        .update(&id, &update)
        .await?
        .ok_or_else(|| AppError::not_found(PET_NOT_FOUND))?;

    Ok(Json(PetOut::from(pet)))
}

pub async fn delete_pet(
    State(state): State<PetState>,
    ApiPath(id): ApiPath<String>,
) -> Result<StatusCode, AppError> {
    if !state.repo.delete(&id).await? {
        return Err(AppError::not_found(PET_NOT_FOUND));
    }

    tracing::info!(pet_id = %id, "Pet deleted");
    Ok(StatusCode::OK)
}

pub async fn delete_all_pets(State(state): State<PetState>) -> Result<impl IntoResponse, AppError> {
    state.repo.delete_all().await?;

    Ok(Json(json!({ "message": "All pets have been deleted." })))
}

pub async fn list_pets_by_breeder(
    State(state): State<PetState>,
    ApiPath(breeder_id): ApiPath<String>,
) -> Result<Json<Vec<PetOut>>, AppError> {
    let pets = state.repo.list_by_breeder(&breeder_id).await?;

    Ok(Json(pets.into_iter().map(PetOut::from).collect()))
}
