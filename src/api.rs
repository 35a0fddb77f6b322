use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::{CoinfeedError, Config, RateLimitedClient, RequestSpec, Result};

/// Client for the cryptocurrency listings endpoint.
///
/// Authenticates with a static API key header; rate limiting is handled by
/// the underlying [`RateLimitedClient`].
#[derive(Clone)]
pub struct ListingsClient {
    client: RateLimitedClient,
    base_url: String,
    api_key: String,
    convert: String,
}

impl fmt::Debug for ListingsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListingsClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("convert", &self.convert)
            .finish()
    }
}

impl ListingsClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://pro-api.coinmarketcap.com";

    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: RateLimitedClient::new(),
            base_url: Self::DEFAULT_BASE_URL.to_owned(),
            api_key: api_key.into(),
            convert: "USD".to_owned(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.api_key.clone())
    }

    /// Overrides the API base URL, e.g. for a sandbox endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Replaces the underlying HTTP client.
    pub fn with_client(mut self, client: RateLimitedClient) -> Self {
        self.client = client;
        self
    }

    /// Sets the quote conversion currency (default `USD`).
    pub fn with_convert(mut self, convert: impl Into<String>) -> Self {
        self.convert = convert.into();
        self
    }

    /// Fetches the latest listings page, keeping the raw payload for
    /// file persistence alongside the decoded coins.
    pub async fn fetch(&self, limit: u32) -> Result<ListingsPage> {
        let url = format!(
            "{}/v1/cryptocurrency/listings/latest",
            self.base_url.trim_end_matches('/')
        );
        let spec = RequestSpec::get(url)
            .header("X-CMC_PRO_API_KEY", &self.api_key)
            .header("Accept", "application/json")
            .query("start", "1")
            .query("limit", limit.to_string())
            .query("convert", &self.convert);

        let response = self.client.send(&spec).await?;
        let raw: JsonValue = response.json()?;
        let envelope: ListingsEnvelope = serde_json::from_value(raw.clone())
            .map_err(|err| CoinfeedError::Decode(format!("invalid listings payload: {err}")))?;

        Ok(ListingsPage {
            raw,
            status: envelope.status,
            coins: envelope.data,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ListingsEnvelope {
    status: ApiStatus,
    #[serde(default)]
    data: Vec<Coin>,
}

/// Upstream call metadata attached to every listings payload.
#[derive(Clone, Debug, Deserialize)]
pub struct ApiStatus {
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub error_code: i64,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub credit_count: Option<u64>,
}

/// One listed coin, the subset of the upstream schema the sink stores.
#[derive(Clone, Debug, Deserialize)]
pub struct Coin {
    pub id: u64,
    pub name: String,
    pub symbol: String,
    pub slug: String,
    #[serde(default)]
    pub cmc_rank: Option<u32>,
    #[serde(default)]
    pub last_updated: Option<String>,
    #[serde(default)]
    pub quote: HashMap<String, Quote>,
}

impl Coin {
    /// Quote in the given conversion currency, if present.
    pub fn quote_in(&self, currency: &str) -> Option<&Quote> {
        self.quote.get(currency)
    }
}

/// Price data for one conversion currency.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
pub struct Quote {
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub volume_24h: Option<f64>,
    #[serde(default)]
    pub market_cap: Option<f64>,
}

/// One fetched listings page.
#[derive(Debug)]
pub struct ListingsPage {
    /// Full upstream payload, persisted verbatim to disk.
    pub raw: JsonValue,
    pub status: ApiStatus,
    pub coins: Vec<Coin>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::ListingsEnvelope;

    #[test]
    fn listings_payload_decodes_into_coins() {
        let payload = json!({
            "status": {
                "timestamp": "2026-08-26T00:00:00.000Z",
                "error_code": 0,
                "error_message": null,
                "credit_count": 1
            },
            "data": [
                {
                    "id": 1,
                    "name": "Bitcoin",
                    "symbol": "BTC",
                    "slug": "bitcoin",
                    "cmc_rank": 1,
                    "last_updated": "2026-08-26T00:00:00.000Z",
                    "quote": {
                        "USD": {
                            "price": 61234.5,
                            "volume_24h": 3.2e10,
                            "market_cap": 1.2e12
                        }
                    }
                }
            ]
        });

        let envelope: ListingsEnvelope =
            serde_json::from_value(payload).expect("payload must decode");
        assert_eq!(envelope.status.error_code, 0);
        assert_eq!(envelope.data.len(), 1);

        let coin = &envelope.data[0];
        assert_eq!(coin.symbol, "BTC");
        let usd = coin.quote_in("USD").expect("USD quote must be present");
        assert_eq!(usd.price, Some(61234.5));
    }

    #[test]
    fn missing_optional_fields_default() {
        let payload = json!({
            "status": { "error_code": 0 },
            "data": [
                { "id": 2, "name": "Litecoin", "symbol": "LTC", "slug": "litecoin" }
            ]
        });

        let envelope: ListingsEnvelope =
            serde_json::from_value(payload).expect("payload must decode");
        let coin = &envelope.data[0];
        assert!(coin.cmc_rank.is_none());
        assert!(coin.quote.is_empty());
    }
}
