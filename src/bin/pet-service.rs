//! pet-service 入口

use breeder_services::{config::Service, server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    server::run(Service::Pets).await
}
