mod cosmos;
mod ethereum;

pub use cosmos::CosmosSource;
pub use ethereum::{hex_to_decimal, EthereumSource};

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::config::{Network, NetworkKind, Wallet};

/// Reasons a balance could not be fetched
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("endpoint returned status {0}")]
    Status(u16),
    #[error("unparsable response: {0}")]
    Decode(String),
    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("unsupported blockchain kind: {0}")]
    UnsupportedKind(String),
}

/// One (denom, amount) pair as reported by a chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    /// Base-10 integer string
    pub amount: String,
}

impl Coin {
    pub fn new(denom: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            denom: denom.into(),
            amount: amount.into(),
        }
    }
}

/// Balances returned by a successful fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reading {
    pub coins: Vec<Coin>,
    /// Raw response body, kept for diagnosing extraction failures
    pub raw: String,
}

/// Result of polling one wallet once
#[derive(Debug)]
pub enum PollOutcome {
    Fetched(Reading),
    Failed(FetchError),
}

impl From<Result<Reading, FetchError>> for PollOutcome {
    fn from(result: Result<Reading, FetchError>) -> Self {
        match result {
            Ok(reading) => Self::Fetched(reading),
            Err(e) => Self::Failed(e),
        }
    }
}

/// Capability to fetch a wallet's balance on a network
#[allow(async_fn_in_trait)]
pub trait BalanceFetcher {
    async fn fetch(&self, network: &Network, wallet: &Wallet) -> PollOutcome;
}

/// Dispatches fetches to the source matching each network's kind
#[derive(Debug, Clone)]
pub struct ChainSources {
    ethereum: EthereumSource,
    cosmos: CosmosSource,
}

impl ChainSources {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        Ok(Self {
            ethereum: EthereumSource::new(timeout),
            cosmos: CosmosSource::new(timeout)?,
        })
    }
}

impl BalanceFetcher for ChainSources {
    async fn fetch(&self, network: &Network, wallet: &Wallet) -> PollOutcome {
        let result = match &network.kind {
            NetworkKind::Ethereum => self.ethereum.fetch(network, wallet).await,
            NetworkKind::Cosmos => self.cosmos.fetch(network, wallet).await,
            NetworkKind::Other(kind) => Err(FetchError::UnsupportedKind(kind.clone())),
        };
        result.into()
    }
}
