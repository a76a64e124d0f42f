mod balance;
mod health;

pub use balance::{BalanceMonitor, BalanceTransition};
pub use health::{HealthMonitor, HealthStatus};

use crate::config::{Network, Wallet};
use crate::extract::Amount;

/// Which destination an alert is routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Balance,
    Rpc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    LowFunds,
    Replenished,
    RpcIssue,
}

impl AlertKind {
    pub fn channel(&self) -> Channel {
        match self {
            AlertKind::LowFunds | AlertKind::Replenished => Channel::Balance,
            AlertKind::RpcIssue => Channel::Rpc,
        }
    }
}

/// Outbound alert with rendered text
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub kind: AlertKind,
    pub network: String,
    pub address: String,
    pub message: String,
}

/// USD annotation for alert text
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UsdValue {
    Known(f64),
    Unavailable,
}

impl UsdValue {
    pub fn from_rate(display_amount: f64, rate: Option<f64>) -> Self {
        match rate {
            Some(rate) if rate.is_finite() => Self::Known(display_amount * rate),
            _ => Self::Unavailable,
        }
    }
}

impl std::fmt::Display for UsdValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UsdValue::Known(value) => write!(f, "{:.2} USD", value),
            UsdValue::Unavailable => write!(f, "N/A USD"),
        }
    }
}

impl Alert {
    pub fn low_funds(network: &Network, wallet: &Wallet, amount: Amount, usd: UsdValue) -> Self {
        let message = format!(
            "💔 [ALERT] Wallet {} in {} is low on funds. Balance: {:.2} ({} {}), {}",
            wallet.use_case,
            network.identifier,
            amount.to_display(network.conversion_factor),
            amount,
            network.currency_unit,
            usd
        );
        Self::for_wallet(AlertKind::LowFunds, network, wallet, message)
    }

    pub fn replenished(network: &Network, wallet: &Wallet, amount: Amount, usd: UsdValue) -> Self {
        let message = format!(
            "💚 [INFO] Wallet {} in {} has been replenished. New balance: {:.2} ({} {}), {}",
            wallet.use_case,
            network.identifier,
            amount.to_display(network.conversion_factor),
            amount,
            network.currency_unit,
            usd
        );
        Self::for_wallet(AlertKind::Replenished, network, wallet, message)
    }

    pub fn rpc_issue(network: &Network, wallet: &Wallet, failures: u64) -> Self {
        let message = format!(
            "[ALERT] RPC endpoint for {} has issues. Endpoint: {}, Wallet: {}, Failures: {}",
            network.identifier, network.endpoint, wallet.address, failures
        );
        Self::for_wallet(AlertKind::RpcIssue, network, wallet, message)
    }

    fn for_wallet(kind: AlertKind, network: &Network, wallet: &Wallet, message: String) -> Self {
        Self {
            kind,
            network: network.identifier.clone(),
            address: wallet.address.clone(),
            message,
        }
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NetworkKind;
    use alloy::primitives::U256;

    fn hub() -> Network {
        Network {
            identifier: "cosmoshub".to_string(),
            kind: NetworkKind::Cosmos,
            endpoint: "https://rest.example/cosmoshub".to_string(),
            currency_unit: "uatom".to_string(),
            conversion_factor: 1_000_000.0,
            failure_threshold: 2.0,
            price_source: "cosmos".to_string(),
            wallets: vec![Wallet::new("cosmos1xyz", "relayer", 2_000_000.0)],
        }
    }

    #[test]
    fn low_funds_text_includes_usd() {
        let network = hub();
        let alert = Alert::low_funds(
            &network,
            &network.wallets[0],
            Amount(U256::from(1_500_000u64)),
            UsdValue::from_rate(1.5, Some(10.0)),
        );
        assert_eq!(alert.kind.channel(), Channel::Balance);
        assert_eq!(
            alert.message,
            "💔 [ALERT] Wallet relayer in cosmoshub is low on funds. Balance: 1.50 (1500000 uatom), 15.00 USD"
        );
    }

    #[test]
    fn each_constructor_carries_its_own_kind() {
        let network = hub();
        let wallet = &network.wallets[0];
        let amount = Amount(U256::from(2_500_000u64));

        let replenished = Alert::replenished(&network, wallet, amount, UsdValue::Unavailable);
        assert_eq!(replenished.kind, AlertKind::Replenished);
        assert!(replenished.message.starts_with("💚 [INFO]"));
        assert!(replenished.message.contains("has been replenished"));

        let low = Alert::low_funds(&network, wallet, amount, UsdValue::Unavailable);
        assert_eq!(low.kind, AlertKind::LowFunds);
        assert!(!low.message.contains("replenished"));

        let rpc = Alert::rpc_issue(&network, wallet, 3);
        assert_eq!(rpc.kind, AlertKind::RpcIssue);
        assert!(!rpc.message.contains("low on funds"));
    }

    #[test]
    fn missing_price_degrades_to_na() {
        assert_eq!(UsdValue::from_rate(3.0, None).to_string(), "N/A USD");
        assert_eq!(UsdValue::from_rate(3.0, Some(f64::NAN)).to_string(), "N/A USD");
    }

    #[test]
    fn rpc_issue_text() {
        let network = hub();
        let alert = Alert::rpc_issue(&network, &network.wallets[0], 6);
        assert_eq!(alert.kind.channel(), Channel::Rpc);
        assert!(alert.message.contains("Endpoint: https://rest.example/cosmoshub"));
        assert!(alert.message.ends_with("Failures: 6"));
    }
}
