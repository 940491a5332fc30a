//! Pet repository (宠物数据访问)

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::{PetRepository, Repository};
use crate::{
    db::{self, HealthStatus},
    error::AppError,
    models::pet::{Pet, PetFilterParams, PetIn, PetUpdate},
};

const PET_COLUMNS: &str = "id, name, type, price, breeder_id";

pub struct PgPetRepository {
    db: PgPool,
}

impl PgPetRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Repository for PgPetRepository {
    async fn health_check(&self) -> HealthStatus {
        db::health_check(&self.db).await
    }
}

#[async_trait]
impl PetRepository for PgPetRepository {
    async fn create(&self, id: &str, pet: &PetIn) -> Result<Pet, AppError> {
        let pet = sqlx::query_as::<_, Pet>(&format!(
            r#"
            INSERT INTO pets (id, name, type, price, breeder_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {PET_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&pet.name)
        .bind(&pet.pet_type)
        .bind(pet.price)
        .bind(&pet.breeder_id)
        .fetch_one(&self.db)
        .await?;

        Ok(pet)
    }

    async fn list(&self, filter: &PetFilterParams) -> Result<Vec<Pet>, AppError> {
        let mut query = QueryBuilder::<Postgres>::new(format!("SELECT {PET_COLUMNS} FROM pets"));

        if let Some(pet_type) = &filter.pet_type {
            query.push(" WHERE type = ").push_bind(pet_type);
        }

        query.push(" ORDER BY name, id");

        if let Some(limit) = filter.limit {
            query.push(" LIMIT ").push_bind(i64::from(limit));
        }
        if let Some(offset) = filter.offset {
            query.push(" OFFSET ").push_bind(i64::from(offset));
        }

        let pets = query.build_query_as::<Pet>().fetch_all(&self.db).await?;

        Ok(pets)
    }

    async fn get(&self, id: &str) -> Result<Option<Pet>, AppError> {
        let pet = sqlx::query_as::<_, Pet>(&format!("SELECT {PET_COLUMNS} FROM pets WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(pet)
    }

    async fn update(&self, id: &str, update: &PetUpdate) -> Result<Option<Pet>, AppError> {
        let pet = sqlx::query_as::<_, Pet>(&format!(
            r#"
            UPDATE pets
            SET
                name = COALESCE($2, name),
                type = COALESCE($3, type),
                price = COALESCE($4, price),
                breeder_id = COALESCE($5, breeder_id)
            WHERE id = $1
            RETURNING {PET_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&update.name)
        .bind(&update.pet_type)
        .bind(update.price)
        .bind(&update.breeder_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(pet)
    }

    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM pets WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_all(&self) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM pets").execute(&self.db).await?;

        tracing::info!(deleted = result.rows_affected(), "All pets deleted");
        Ok(result.rows_affected())
    }

    async fn list_by_breeder(&self, breeder_id: &str) -> Result<Vec<Pet>, AppError> {
        let pets = sqlx::query_as::<_, Pet>(&format!(
            "SELECT {PET_COLUMNS} FROM pets WHERE breeder_id = $1 ORDER BY name, id"
        ))
        .bind(breeder_id)
        .fetch_all(&self.db)
        .await?;

        Ok(pets)
    }
}
