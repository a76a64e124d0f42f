#![allow(dead_code)]

use balance_watch::{
    BalanceFetcher, Coin, ConfigError, DefinitionSource, FetchError, Network, NetworkKind,
    NotificationError, NotificationGateway, PollOutcome, PriceError, PriceOracle, Reading, Wallet,
};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// One scripted poll result
#[derive(Debug, Clone)]
pub enum Step {
    Balance(&'static str),
    Fail,
    WrongDenom,
}

/// Fetcher replaying a per-wallet script; an exhausted script fails
#[derive(Default)]
pub struct ScriptedFetcher {
    scripts: Mutex<HashMap<String, VecDeque<Step>>>,
}

impl ScriptedFetcher {
    pub fn with(mut self, address: &str, steps: Vec<Step>) -> Self {
        self.scripts
            .get_mut()
            .unwrap()
            .insert(address.to_string(), steps.into());
        self
    }
}

impl BalanceFetcher for ScriptedFetcher {
    async fn fetch(&self, network: &Network, wallet: &Wallet) -> PollOutcome {
        let step = self
            .scripts
            .lock()
            .unwrap()
            .get_mut(&wallet.address)
            .and_then(|s| s.pop_front())
            .unwrap_or(Step::Fail);

        match step {
            Step::Balance(amount) => PollOutcome::Fetched(Reading {
                coins: vec![Coin::new(network.currency_unit.clone(), amount)],
                raw: amount.to_string(),
            }),
            Step::WrongDenom => PollOutcome::Fetched(Reading {
                coins: vec![Coin::new("uother", "1")],
                raw: r#"{"balances":[{"denom":"uother","amount":"1"}]}"#.to_string(),
            }),
            Step::Fail => PollOutcome::Failed(FetchError::Status(502)),
        }
    }
}

pub struct FixedPrice(pub Option<f64>);

impl PriceOracle for FixedPrice {
    async fn usd_price(&self, source: &str) -> Result<f64, PriceError> {
        self.0.ok_or_else(|| PriceError::Missing(source.to_string()))
    }
}

/// Records every delivery; optionally fails them all
#[derive(Default)]
pub struct RecordingGateway {
    pub sent: Mutex<Vec<(String, String)>>,
    pub fail: bool,
}

impl RecordingGateway {
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn messages(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

impl NotificationGateway for RecordingGateway {
    async fn send(&self, destination: &str, message: &str) -> Result<(), NotificationError> {
        if self.fail {
            return Err(NotificationError::Status(500));
        }
        self.sent
            .lock()
            .unwrap()
            .push((destination.to_string(), message.to_string()));
        Ok(())
    }
}

/// Definitions the test can swap between cycles; `None` simulates an unreadable source
#[derive(Clone, Default)]
pub struct SharedDefinitions(pub Arc<Mutex<Option<Vec<Network>>>>);

impl SharedDefinitions {
    pub fn new(networks: Vec<Network>) -> Self {
        Self(Arc::new(Mutex::new(Some(networks))))
    }

    pub fn set(&self, networks: Option<Vec<Network>>) {
        *self.0.lock().unwrap() = networks;
    }
}

impl DefinitionSource for SharedDefinitions {
    fn load_networks(&self) -> Result<Vec<Network>, ConfigError> {
        self.0
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| ConfigError::Invalid("definitions unavailable".to_string()))
    }
}

pub fn cosmos_network(identifier: &str, failure_threshold: f64, wallets: Vec<Wallet>) -> Network {
    Network {
        identifier: identifier.to_string(),
        kind: NetworkKind::Cosmos,
        endpoint: format!("https://rest.example/{}", identifier),
        currency_unit: "uatom".to_string(),
        conversion_factor: 1_000_000.0,
        failure_threshold,
        price_source: "cosmos".to_string(),
        wallets,
    }
}
