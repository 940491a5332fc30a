//! 服务启动
//! 两个二进制共用：命令行参数、.env 加载、配置、日志、数据库、路由、优雅关闭

use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;

use crate::{
    auth::TokenManager,
    config::{AppConfig, Service},
    db,
    handlers::health,
    middleware::AppState,
    repository::{MessageRepository, PetRepository, PgMessageRepository, PgPetRepository},
    routes, telemetry,
};

/// 命令行解析结果
#[derive(Debug, PartialEq, Eq)]
enum CliAction {
    Serve,
    Exit,
}

fn parse_args(service: Service, args: &[String]) -> anyhow::Result<CliAction> {
    match args.get(1).map(String::as_str) {
        None => Ok(CliAction::Serve),
        Some("--version") => {
            println!("{} {}", service, env!("CARGO_PKG_VERSION"));
            Ok(CliAction::Exit)
        }
        Some("--help") => {
            print_help(service);
            Ok(CliAction::Exit)
        }
        Some(other) => {
            print_help(service);
            anyhow::bail!("unknown argument: {other}")
        }
    }
}

/// 加载 .env 文件
/// 设置了 APP_ENV 时只加载 .env.$APP_ENV，否则依次尝试 .env.local、.env.development、.env
fn load_dotenv() {
    if let Ok(env) = std::env::var("APP_ENV") {
        dotenv::from_filename(format!(".env.{env}")).ok();
    } else {
        dotenv::from_filename(".env.local").ok();
        dotenv::from_filename(".env.development").ok();
        dotenv::dotenv().ok();
    }
}

/// 运行指定服务直到收到关闭信号
pub async fn run(service: Service) -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if parse_args(service, &args)? == CliAction::Exit {
        return Ok(());
    }

    load_dotenv();
    health::mark_started();

    let config = AppConfig::from_env().map_err(|e| {
        eprintln!("Configuration error: {e}");
        anyhow::anyhow!("Failed to load configuration: {e}")
    })?;

    telemetry::init_telemetry(&config, service);
    tracing::info!(service = %service, version = env!("CARGO_PKG_VERSION"), "Starting");

    let tokens = Arc::new(
        TokenManager::from_config(&config.security).context("Failed to build token manager")?,
    );

    let pool = db::create_pool(&config.database).await?;
    db::run_migrations(&pool, service).await?;
    tracing::info!("Database initialized");

    let app = match service {
        Service::Pets => {
            let repo: Arc<dyn PetRepository> = Arc::new(PgPetRepository::new(pool));
            routes::pet_router(Arc::new(AppState::new(config.clone(), tokens, repo)))
        }
        Service::Messages => {
            let repo: Arc<dyn MessageRepository> = Arc::new(PgMessageRepository::new(pool));
            routes::message_router(Arc::new(AppState::new(config.clone(), tokens, repo)))
        }
    };

    let addr = &config.server.addr;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    tracing::info!(service = %service, addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(Duration::from_secs(
            config.server.graceful_shutdown_timeout_secs,
        )))
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// 等待 Ctrl+C / SIGTERM
///
/// 收到信号后开始优雅关闭；超过 `timeout` 仍未结束则强制退出
async fn shutdown_signal(timeout: Duration) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Ctrl+C received, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Terminate signal received, starting graceful shutdown");
        },
    }

    tokio::spawn(async move {
        tokio::time::sleep(timeout).await;
        tracing::warn!("Graceful shutdown timeout reached, forcing exit");
        std::process::exit(1);
    });
}

fn print_help(service: Service) {
    println!("{} {}", service, env!("CARGO_PKG_VERSION"));
    println!();
    println!("用法: {service} [选项]");
    println!();
    println!("选项:");
    println!("  --version     打印版本信息并退出");
    println!("  --help        打印此帮助信息并退出");
    println!();
    println!("环境变量:");
    println!("  配置通过 APP_ 前缀的环境变量完成，例如 APP_SECURITY__JWT_SECRET");
    println!("  APP_ENV 指定要加载的 .env.<APP_ENV> 文件");
}
