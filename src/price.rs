use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PriceError {
    #[error("no price source configured")]
    NoSource,
    #[error("price request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("no USD price for `{0}` in response")]
    Missing(String),
}

/// Capability to look up a USD rate by price-source key
#[allow(async_fn_in_trait)]
pub trait PriceOracle {
    async fn usd_price(&self, source: &str) -> Result<f64, PriceError>;
}

/// CoinGecko-style `simple/price` lookup
#[derive(Debug, Clone)]
pub struct SimplePriceOracle {
    client: Client,
    base_url: String,
}

impl SimplePriceOracle {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, PriceError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

impl PriceOracle for SimplePriceOracle {
    async fn usd_price(&self, source: &str) -> Result<f64, PriceError> {
        if source.is_empty() {
            return Err(PriceError::NoSource);
        }

        let url = format!("{}/simple/price", self.base_url.trim_end_matches('/'));
        let prices: HashMap<String, HashMap<String, f64>> = self
            .client
            .get(url)
            .query(&[("ids", source), ("vs_currencies", "usd")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        prices
            .get(source)
            .and_then(|quotes| quotes.get("usd"))
            .copied()
            .ok_or_else(|| PriceError::Missing(source.to_string()))
    }
}
