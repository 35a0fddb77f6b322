use sqlx::mysql::{MySqlPool, MySqlPoolOptions};

use crate::{Coin, Config, Result};

const CREATE_TABLE_SQL: &str = "\
CREATE TABLE IF NOT EXISTS coins (
    id BIGINT UNSIGNED PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    symbol VARCHAR(32) NOT NULL,
    slug VARCHAR(255) NOT NULL,
    cmc_rank INT UNSIGNED NULL,
    price_usd DOUBLE NULL,
    market_cap_usd DOUBLE NULL,
    volume_24h_usd DOUBLE NULL,
    last_updated VARCHAR(64) NULL
)";

const UPSERT_SQL: &str = "\
INSERT INTO coins (id, name, symbol, slug, cmc_rank, price_usd, market_cap_usd, volume_24h_usd, last_updated)
VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
ON DUPLICATE KEY UPDATE
    name = VALUES(name),
    symbol = VALUES(symbol),
    slug = VALUES(slug),
    cmc_rank = VALUES(cmc_rank),
    price_usd = VALUES(price_usd),
    market_cap_usd = VALUES(market_cap_usd),
    volume_24h_usd = VALUES(volume_24h_usd),
    last_updated = VALUES(last_updated)";

/// MySQL sink for fetched coins.
pub struct CoinStore {
    pool: MySqlPool,
}

impl CoinStore {
    /// Connects using the host/database/user/password/port credentials.
    pub async fn connect(config: &Config) -> Result<Self> {
        let pool = MySqlPoolOptions::new()
            .max_connections(2)
            .connect(&config.database_url())
            .await?;
        tracing::info!(
            host = %config.host,
            database = %config.database,
            "connected to MySQL"
        );
        Ok(Self { pool })
    }

    /// Creates the `coins` table if it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(CREATE_TABLE_SQL).execute(&self.pool).await?;
        Ok(())
    }

    /// Upserts the coins in one transaction, returning the affected-row
    /// count. Any statement failure drops the transaction, which rolls it
    /// back before the error surfaces.
    pub async fn upsert_coins(&self, coins: &[Coin]) -> Result<u64> {
        let mut tx = self.pool.begin().await?;
        let mut affected = 0u64;

        for coin in coins {
            let usd = coin.quote_in("USD").copied().unwrap_or_default();
            let result = sqlx::query(UPSERT_SQL)
                .bind(coin.id)
                .bind(&coin.name)
                .bind(&coin.symbol)
                .bind(&coin.slug)
                .bind(coin.cmc_rank)
                .bind(usd.price)
                .bind(usd.market_cap)
                .bind(usd.volume_24h)
                .bind(coin.last_updated.as_deref())
                .execute(&mut *tx)
                .await?;
            affected += result.rows_affected();
        }

        tx.commit().await?;
        tracing::info!(coins = coins.len(), affected, "upserted coins");
        Ok(affected)
    }
}
