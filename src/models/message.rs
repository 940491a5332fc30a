//! Message domain models

use serde::{Deserialize, Serialize};

/// Message between a customer and a breeder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Message {
    pub id: i64,
    pub customer_id: i64,
    pub breeder_id: i64,
    pub message_body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, validator::Validate)]
pub struct MessageIn {
    #[validate(length(min = 1))]
    pub message_body: String,
    pub customer_id: i64,
    pub breeder_id: i64,
}

#[derive(Debug, Clone, Default, Deserialize, validator::Validate)]
pub struct MessageUpdate {
    #[validate(length(min = 1))]
    pub message_body: Option<String>,
    pub customer_id: Option<i64>,
    pub breeder_id: Option<i64>,
}
