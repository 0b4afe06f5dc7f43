mod core;
mod features;
mod modules;
mod shared;

use std::sync::Arc;

use crate::core::config::Config;
use crate::features::reports::SeedRunner;
use crate::modules::dynamodb::{DynamoDbClient, TableStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Steps run one after another; a single thread is all the run needs
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async_main())
}

async fn async_main() -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;
    tracing::info!("Configuration loaded successfully");

    let store: Arc<dyn TableStore> = Arc::new(DynamoDbClient::new(&config.dynamodb).await);

    let summary = SeedRunner::new(store, config.seed).run().await;
    if let Some(reconcile) = &summary.reconcile {
        tracing::info!(
            "Statuses reconciled: {} of {} reports updated",
            reconcile.updated,
            reconcile.scanned
        );
    }
    if let Some(matrix) = &summary.matrix {
        tracing::info!("{} reports in table", matrix.total());
    }
    if summary.failed_steps > 0 {
        tracing::warn!(
            "{} step(s) failed; see errors above",
            summary.failed_steps
        );
    }

    Ok(())
}
