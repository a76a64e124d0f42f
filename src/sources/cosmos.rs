use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use super::{Coin, FetchError, Reading};
use crate::config::{Network, Wallet};

const MAX_PAGES: usize = 10;

#[derive(Debug, Deserialize)]
struct BalancesResponse {
    balances: Vec<Coin>,
    #[serde(default)]
    pagination: Option<Pagination>,
}

#[derive(Debug, Deserialize)]
struct Pagination {
    next_key: Option<String>,
}

/// Fetches bank balances from a Cosmos SDK REST endpoint
#[derive(Debug, Clone)]
pub struct CosmosSource {
    client: Client,
    timeout: Duration,
}

impl CosmosSource {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        Ok(Self { client, timeout })
    }

    pub async fn fetch(&self, network: &Network, wallet: &Wallet) -> Result<Reading, FetchError> {
        let url = format!(
            "{}/cosmos/bank/v1beta1/balances/{}",
            network.endpoint.trim_end_matches('/'),
            wallet.address
        );

        let mut coins = Vec::new();
        let mut pages = Vec::new();
        let mut next_key: Option<String> = None;

        for _ in 0..MAX_PAGES {
            let mut request = self.client.get(&url);
            if let Some(key) = &next_key {
                request = request.query(&[("pagination.key", key)]);
            }

            let response = request.send().await.map_err(|e| self.classify(e))?;
            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::Status(status.as_u16()));
            }
            let body = response.text().await.map_err(|e| self.classify(e))?;

            let page: BalancesResponse = serde_json::from_str(&body).map_err(|e| {
                tracing::debug!(network = %network.identifier, raw = %body, "unparsable balances response");
                FetchError::Decode(e.to_string())
            })?;
            coins.extend(page.balances);
            pages.push(body);

            next_key = page
                .pagination
                .and_then(|p| p.next_key)
                .filter(|key| !key.is_empty());
            if next_key.is_none() {
                break;
            }
        }

        if next_key.is_some() {
            return Err(FetchError::Decode(format!(
                "pagination exceeded {} pages",
                MAX_PAGES
            )));
        }

        Ok(Reading {
            coins,
            raw: pages.join("\n"),
        })
    }

    fn classify(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout(self.timeout)
        } else if let Some(status) = err.status() {
            FetchError::Status(status.as_u16())
        } else {
            FetchError::Transport(err.to_string())
        }
    }
}
