//! 数据模型模块

use serde::{Deserialize, Serialize};

pub mod auth;
pub mod message;
pub mod pet;

/// 超媒体链接
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub rel: String,
    pub href: String,
}

impl Link {
    pub fn new(rel: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            rel: rel.into(),
            href: href.into(),
        }
    }
}
