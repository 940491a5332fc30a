//! Message repository (消息数据访问)

use async_trait::async_trait;
use sqlx::PgPool;

use super::{MessageRepository, Repository};
use crate::{
    db::{self, HealthStatus},
    error::AppError,
    models::message::{Message, MessageIn, MessageUpdate},
};

pub struct PgMessageRepository {
    db: PgPool,
}

impl PgMessageRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Repository for PgMessageRepository {
    async fn health_check(&self) -> HealthStatus {
        db::health_check(&self.db).await
    }
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    async fn create(&self, message: &MessageIn) -> Result<Message, AppError> {
        let message = sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO messages (customer_id, breeder_id, message_body)
            VALUES ($1, $2, $3)
            RETURNING id, customer_id, breeder_id, message_body
            "#,
        )
        .bind(message.customer_id)
        .bind(message.breeder_id)
        .bind(&message.message_body)
        .fetch_one(&self.db)
        .await?;

        Ok(message)
    }

    async fn list(&self) -> Result<Vec<Message>, AppError> {
        let messages = sqlx::query_as::<_, Message>(
            "SELECT id, customer_id, breeder_id, message_body FROM messages ORDER BY id",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(messages)
    }

    async fn get(&self, id: i64) -> Result<Option<Message>, AppError> {
        let message = sqlx::query_as::<_, Message>(
            "SELECT id, customer_id, breeder_id, message_body FROM messages WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(message)
    }

    async fn update(&self, id: i64, update: &MessageUpdate) -> Result<Option<Message>, AppError> {
        let message = sqlx::query_as::<_, Message>(
            r#"
            UPDATE messages
            SET
                customer_id = COALESCE($2, customer_id),
                breeder_id = COALESCE($3, breeder_id),
                message_body = COALESCE($4, message_body)
            WHERE id = $1
            RETURNING id, customer_id, breeder_id, message_body
            "#,
        )
        .bind(id)
        .bind(update.customer_id)
        .bind(update.breeder_id)
        .bind(&update.message_body)
        .fetch_optional(&self.db)
        .await?;

        Ok(message)
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM messages WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
