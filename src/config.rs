//! 配置系统
//! 从环境变量加载所有配置，使用 Secret 包装敏感信息

use config::{Config, ConfigError, Environment};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::fmt;

use crate::auth::{
    codec,
    jwt::{ACCESS_TOKEN_EXP_RANGE, REFRESH_TOKEN_EXP_RANGE},
};

/// 由同一套代码构建的两个服务
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Pets,
    Messages,
}

impl Service {
    pub fn name(self) -> &'static str {
        match self {
            Service::Pets => "pet-service",
            Service::Messages => "message-service",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址，例如 "0.0.0.0:8000"
    pub addr: String,
    /// 优雅关闭超时时间（秒）
    pub graceful_shutdown_timeout_secs: u64,
    /// 允许跨域的来源，"*" 表示任意来源
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// 数据库连接 URL（使用 Secret 包装，防止日志泄露）
    pub url: Secret<String>,
    /// 最大连接数
    pub max_connections: u32,
    /// 最小连接数
    pub min_connections: u32,
    /// 获取连接超时时间（秒）
    pub acquire_timeout_secs: u64,
    /// 空闲连接超时时间（秒）
    pub idle_timeout_secs: u64,
    /// 连接最大生命周期（秒）
    pub max_lifetime_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别: trace, debug, info, warn, error
    pub level: String,
    /// 日志格式: json, pretty
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    /// 访问令牌密钥
    pub jwt_secret: Secret<String>,
    /// 刷新令牌密钥（必须与访问令牌密钥不同）
    pub jwt_refresh_secret: Secret<String>,
    /// 签名算法: HS256, HS384, HS512
    pub jwt_algorithm: String,
    /// 访问令牌过期时间（秒）
    pub access_token_exp_secs: u64,
    /// 刷新令牌过期时间（秒）
    pub refresh_token_exp_secs: u64,
    /// 是否启用 Bearer 认证中间件
    pub auth_enabled: bool,
    /// 无需认证的路径前缀
    pub excluded_paths: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub security: SecurityConfig,
}

impl AppConfig {
    /// 从环境变量加载配置
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut settings = Config::builder();

        // 添加默认配置
        settings = settings
            .set_default("server.addr", "0.0.0.0:8000")?
            .set_default("server.graceful_shutdown_timeout_secs", 30)?
            .set_default(
                "server.cors_allowed_origins",
                vec!["http://localhost", "http://localhost:3000"],
            )?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 1)?
            .set_default("database.acquire_timeout_secs", 30)?
            .set_default("database.idle_timeout_secs", 600)?
            .set_default("database.max_lifetime_secs", 1800)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "json")?
            .set_default("security.jwt_secret", "change-this-access-secret-in-production!")?
            .set_default("security.jwt_refresh_secret", "change-this-refresh-secret-in-production!")?
            .set_default("security.jwt_algorithm", "HS256")?
            .set_default("security.access_token_exp_secs", 3600)?
            .set_default("security.refresh_token_exp_secs", 2_592_000)?
            .set_default("security.auth_enabled", true)?
            .set_default(
                "security.excluded_paths",
                vec!["/health", "/ready", "/login", "/refresh"],
            )?;

        // 从环境变量加载配置（前缀为 APP_）
        settings = settings.add_source(
            Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("server.cors_allowed_origins")
                .with_list_parse_key("security.excluded_paths")
                .try_parsing(true),
        );

        let config: AppConfig = settings.build()?.try_deserialize()?;

        // 验证配置
        config.validate()?;

        Ok(config)
    }

    /// 验证配置合法性
    pub fn validate(&self) -> Result<(), ConfigError> {
        // 验证端口范围
        if let Some(port_str) = self.server.addr.split(':').next_back() {
            if let Ok(port) = port_str.parse::<u16>() {
                if port != 0 && port < 1024 {
                    return Err(ConfigError::Message("Server port should be >= 1024".to_string()));
                }
            }
        }

        // 验证日志级别
        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::Message(format!(
                    "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                    self.logging.level
                )))
            }
        }

        // 验证日志格式
        match self.logging.format.to_lowercase().as_str() {
            "json" | "pretty" => {}
            _ => {
                return Err(ConfigError::Message(format!(
                    "Invalid log format: {}. Must be one of: json, pretty",
                    self.logging.format
                )))
            }
        }

        // 验证数据库连接池配置
        if self.database.max_connections < self.database.min_connections {
            return Err(ConfigError::Message(
                "max_connections must be >= min_connections".to_string(),
            ));
        }

        // 验证 JWT 密钥长度（至少 32 字符）且两把密钥不同
        let access_secret = self.security.jwt_secret.expose_secret();
        let refresh_secret = self.security.jwt_refresh_secret.expose_secret();
        if access_secret.len() < 32 || refresh_secret.len() < 32 {
            return Err(ConfigError::Message(
                "JWT secrets must be at least 32 characters long".to_string(),
            ));
        }
        if access_secret == refresh_secret {
            return Err(ConfigError::Message(
                "jwt_secret and jwt_refresh_secret must differ".to_string(),
            ));
        }

        // 验证签名算法
        codec::parse_algorithm(&self.security.jwt_algorithm)
            .map_err(|e| ConfigError::Message(e.to_string()))?;

        // 验证令牌过期时间
        if !ACCESS_TOKEN_EXP_RANGE.contains(&self.security.access_token_exp_secs) {
            return Err(ConfigError::Message(
                "access_token_exp_secs must be between 60 and 86400 (1 minute to 24 hours)"
                    .to_string(),
            ));
        }

        if !REFRESH_TOKEN_EXP_RANGE.contains(&self.security.refresh_token_exp_secs) {
            return Err(ConfigError::Message(
                "refresh_token_exp_secs must be between 3600 and 2592000 (1 hour to 30 days)"
                    .to_string(),
            ));
        }

        Ok(())
    }
}
