//! Insert the example rows into every empty table

use anyhow::Context;
use chrono::Utc;
use estate_crm::entities::{Client, Contract, Entity, Property, Transaction};
use estate_crm::{AppConfig, EstateCrm, Stores};
use tracing::info;
use tracing_subscriber::EnvFilter;

async fn seed<E: Entity>(stores: &Stores) -> anyhow::Result<()> {
    let inserted = E::store(stores)
        .ensure_seed(E::seed_records(Utc::now()))
        .await
        .with_context(|| format!("seeding {}", E::RESOURCE))?;
    info!(resource = E::RESOURCE, inserted, "seed complete");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .compact()
        .init();

    let config = AppConfig::load().context("loading configuration")?;
    let crm = EstateCrm::connect(config)
        .await
        .context("connecting the store backend")?;
    if !crm.config().database.auto_migrate {
        crm.migrate_all().await?;
    }

    let stores = crm.stores();
    seed::<Client>(stores).await?;
    seed::<Property>(stores).await?;
    seed::<Transaction>(stores).await?;
    seed::<Contract>(stores).await?;
    Ok(())
}
