use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use buildline_seed::fixtures;

#[derive(Parser, Debug)]
#[command(
    name = "buildline-seed",
    about = "Load catalog, client and user fixtures into the Buildline database",
    version
)]
struct Cli {
    /// Directory holding materials.json, assemblies.json and friends
    #[arg(long, default_value = "fixtures")]
    fixtures: PathBuf,

    /// Postgres connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    /// Emit JSON log lines
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "buildline_seed=info".into());
    if cli.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    let pool = buildline_db::create_pool(&cli.database_url)
        .await
        .context("Failed to connect to database")?;
    buildline_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!(dir = %cli.fixtures.display(), "Loading fixtures");

    let reports = fixtures::load_all(&pool, &cli.fixtures).await?;
    let inserted: usize = reports.iter().map(|r| r.inserted).sum();
    let skipped: usize = reports.iter().map(|r| r.skipped).sum();
    tracing::info!(inserted, skipped, "Seed complete");

    pool.close().await;
    Ok(())
}
