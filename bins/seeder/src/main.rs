//! Loads the bakery chart of accounts.
//!
//! Safe to run repeatedly: accounts whose code already exists are skipped.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use obrador_db::seed::{BAKERY_CHART, seed_chart};
use obrador_shared::AppConfig;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "obrador=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("failed to load configuration")?;
    let db = obrador_db::connect(&config.database.url, 1, 1)
        .await
        .context("failed to connect to database")?;

    let report = seed_chart(&db, BAKERY_CHART)
        .await
        .context("failed to seed chart of accounts")?;

    info!(
        created = report.created,
        skipped = report.skipped,
        total = BAKERY_CHART.len(),
        "Seeding complete"
    );

    Ok(())
}
