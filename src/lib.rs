//! 宠物与消息服务共享库
//! 令牌生命周期、中间件管线与两个 CRUD 服务

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod routes;
pub mod server;
pub mod telemetry;
