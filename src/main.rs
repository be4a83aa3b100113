use anyhow::Context;
use std::net::SocketAddr;
use estate_crm::api::{self, AppState};
use estate_crm::{AppConfig, EstateCrm};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let config = AppConfig::load().context("loading configuration")?;
    info!(backend = ?config.database.backend, "starting estate-crm");

    let crm = EstateCrm::connect(config)
        .await
        .context("connecting the store backend")?;

    let addr: SocketAddr = crm
        .config()
        .server
        .bind_address()
        .parse()
        .context("parsing the bind address")?;
    let app = api::create_app(AppState::from(&crm), &crm.config().server.cors_origins);

    api::run_server(app, addr).await
}
