//! Database repository layer
//!
//! 每个服务一个仓储 trait，生产环境用 PostgreSQL 实现，测试中可替换为内存实现。

use async_trait::async_trait;

use crate::{
    db::HealthStatus,
    error::AppError,
    models::{
        message::{Message, MessageIn, MessageUpdate},
        pet::{Pet, PetFilterParams, PetIn, PetUpdate},
    },
};

pub mod message_repo;
pub mod pet_repo;

pub use message_repo::PgMessageRepository;
pub use pet_repo::PgPetRepository;

/// 存储后端的公共能力
#[async_trait]
pub trait Repository: Send + Sync {
    /// 就绪检查
    async fn health_check(&self) -> HealthStatus;
}

#[async_trait]
pub trait PetRepository: Repository {
    async fn create(&self, id: &str, pet: &PetIn) -> Result<Pet, AppError>;

    /// 按名称排序，可按类型过滤并分页
    async fn list(&self, filter: &PetFilterParams) -> Result<Vec<Pet>, AppError>;

    async fn get(&self, id: &str) -> Result<Option<Pet>, AppError>;

    /// 部分更新，未提供的字段保持不变
    async fn update(&self, id: &str, update: &PetUpdate) -> Result<Option<Pet>, AppError>;

    async fn delete(&self, id: &str) -> Result<bool, AppError>;

    /// 返回删除的行数
    async fn delete_all(&self) -> Result<u64, AppError>;

    async fn list_by_breeder(&self, breeder_id: &str) -> Result<Vec<Pet>, AppError>;
}

#[async_trait]
pub trait MessageRepository: Repository {
    async fn create(&self, message: &MessageIn) -> Result<Message, AppError>;

    async fn list(&self) -> Result<Vec<Message>, AppError>;

    async fn get(&self, id: i64) -> Result<Option<Message>, AppError>;

    async fn update(&self, id: i64, update: &MessageUpdate) -> Result<Option<Message>, AppError>;

    async fn delete(&self, id: i64) -> Result<bool, AppError>;
}
