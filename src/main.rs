use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use coinfeed::{save_json, CoinStore, Config, Countdown, ListingsClient, RateLimitedClient};

/// Fetch the latest coin listings, dump the raw JSON, optionally load MySQL.
#[derive(Debug, Parser)]
#[command(name = "coinfeed", version, about)]
struct Cli {
    /// Number of listings to fetch.
    #[arg(long, default_value_t = 100)]
    limit: u32,

    /// Output file for the raw JSON payload.
    #[arg(long, default_value = "listings.json")]
    out: PathBuf,

    /// Also upsert the coins into MySQL.
    #[arg(long)]
    db: bool,

    /// Override the listings API base URL.
    #[arg(long)]
    base_url: Option<String>,

    /// Suppress the rate-limit countdown display.
    #[arg(long)]
    quiet: bool,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(err) = run(Cli::parse()).await {
        tracing::error!("ingest failed: {err:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::from_env();

    let mut client = ListingsClient::from_config(&config);
    if let Some(base_url) = cli.base_url {
        client = client.with_base_url(base_url);
    }
    if cli.quiet {
        client = client.with_client(RateLimitedClient::new().with_countdown(Countdown::disabled()));
    }

    let page = client.fetch(cli.limit).await?;
    tracing::info!(coins = page.coins.len(), "fetched listings");

    save_json(&page.raw, &cli.out)?;

    if cli.db {
        let store = CoinStore::connect(&config).await?;
        store.ensure_schema().await?;
        store.upsert_coins(&page.coins).await?;
    }

    Ok(())
}
