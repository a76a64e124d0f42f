use alloy::{
    primitives::U256,
    providers::{Provider, ProviderBuilder},
    rpc::client::RpcClient,
    transports::{
        http::{reqwest::Url, Http},
        RpcError, TransportError, TransportErrorKind,
    },
};
use std::time::Duration;

use super::{Coin, FetchError, Reading};
use crate::config::{Network, Wallet};

/// Fetches native balances over JSON-RPC `eth_getBalance`
#[derive(Debug, Clone)]
pub struct EthereumSource {
    timeout: Duration,
}

impl EthereumSource {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub async fn fetch(&self, network: &Network, wallet: &Wallet) -> Result<Reading, FetchError> {
        let url = Url::parse(&network.endpoint)
            .map_err(|e| FetchError::Transport(format!("invalid URL {}: {}", network.endpoint, e)))?;

        let client = RpcClient::builder().transport(Http::new(url), false);
        let provider = ProviderBuilder::new().connect_client(client);

        let request = provider.raw_request::<_, String>(
            "eth_getBalance".into(),
            (wallet.address.clone(), "latest"),
        );
        let hex = tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| FetchError::Timeout(self.timeout))?
            .map_err(classify)?;

        let amount = hex_to_decimal(&hex)?;
        Ok(Reading {
            coins: vec![Coin::new(network.currency_unit.clone(), amount)],
            raw: hex,
        })
    }
}

fn classify(err: TransportError) -> FetchError {
    match err {
        RpcError::ErrorResp(payload) => FetchError::Rpc {
            code: payload.code,
            message: payload.message.to_string(),
        },
        RpcError::DeserError { err, text } => FetchError::Decode(format!("{}: {}", err, text)),
        RpcError::Transport(TransportErrorKind::HttpError(http)) => FetchError::Status(http.status),
        other => FetchError::Transport(other.to_string()),
    }
}

/// Convert a `0x`-prefixed hex quantity into a base-10 integer string
pub fn hex_to_decimal(hex: &str) -> Result<String, FetchError> {
    let digits = hex
        .strip_prefix("0x")
        .or_else(|| hex.strip_prefix("0X"))
        .unwrap_or(hex);
    if digits.is_empty() {
        return Err(FetchError::Decode(format!("empty hex quantity `{}`", hex)));
    }
    U256::from_str_radix(digits, 16)
        .map(|value| value.to_string())
        .map_err(|e| FetchError::Decode(format!("invalid hex quantity `{}`: {}", hex, e)))
}
