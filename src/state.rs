use std::collections::HashMap;

use crate::config::{MergeStrategy, Network};

/// Runtime monitoring state for one wallet, kept only in memory
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalletState {
    /// Failed polls since the last fully successful one
    pub consecutive_failures: u64,
    /// Whether a low-funds alert is outstanding
    pub below_threshold: bool,
}

/// Holds the authoritative networks snapshot together with wallet state
#[derive(Debug, Default)]
pub struct StateStore {
    networks: Vec<Network>,
    strategy: MergeStrategy,
}

impl StateStore {
    pub fn new(strategy: MergeStrategy) -> Self {
        Self {
            networks: Vec::new(),
            strategy,
        }
    }

    pub fn networks(&self) -> &[Network] {
        &self.networks
    }

    pub fn networks_mut(&mut self) -> &mut [Network] {
        &mut self.networks
    }

    /// Replace the snapshot with freshly loaded definitions, carrying state over
    pub fn reload(&mut self, incoming: Vec<Network>) {
        let previous = std::mem::take(&mut self.networks);
        self.networks = merge(&previous, incoming, self.strategy);
    }
}

/// Copy runtime state from `previous` into `incoming`; every other field of
/// `incoming` wins.
pub fn merge(previous: &[Network], incoming: Vec<Network>, strategy: MergeStrategy) -> Vec<Network> {
    match strategy {
        MergeStrategy::Positional => merge_positional(previous, incoming),
        MergeStrategy::Keyed => merge_keyed(previous, incoming),
    }
}

fn merge_positional(previous: &[Network], mut incoming: Vec<Network>) -> Vec<Network> {
    for (network, old_network) in incoming.iter_mut().zip(previous) {
        for (wallet, old_wallet) in network.wallets.iter_mut().zip(&old_network.wallets) {
            wallet.state = old_wallet.state;
        }
    }
    incoming
}

fn merge_keyed(previous: &[Network], mut incoming: Vec<Network>) -> Vec<Network> {
    // Repeated (network, address) pairs are told apart by their occurrence order
    let mut seen: HashMap<(&str, &str), usize> = HashMap::new();
    let mut known: HashMap<(&str, &str, usize), WalletState> = HashMap::new();
    for network in previous {
        for wallet in &network.wallets {
            let key = (network.identifier.as_str(), wallet.address.as_str());
            let occurrence = seen.entry(key).or_insert(0);
            known.insert((key.0, key.1, *occurrence), wallet.state);
            *occurrence += 1;
        }
    }

    let mut seen: HashMap<(String, String), usize> = HashMap::new();
    for network in &mut incoming {
        for wallet in &mut network.wallets {
            let occurrence = seen
                .entry((network.identifier.clone(), wallet.address.clone()))
                .or_insert(0);
            let key = (network.identifier.as_str(), wallet.address.as_str(), *occurrence);
            if let Some(state) = known.get(&key) {
                wallet.state = *state;
            }
            *occurrence += 1;
        }
    }
    incoming
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{NetworkKind, Wallet};

    fn network(identifier: &str, wallets: Vec<Wallet>) -> Network {
        Network {
            identifier: identifier.to_string(),
            kind: NetworkKind::Cosmos,
            endpoint: String::new(),
            currency_unit: "uatom".to_string(),
            conversion_factor: 1_000_000.0,
            failure_threshold: 2.0,
            price_source: String::new(),
            wallets,
        }
    }

    fn degraded(mut wallet: Wallet, failures: u64, below: bool) -> Wallet {
        wallet.state = WalletState {
            consecutive_failures: failures,
            below_threshold: below,
        };
        wallet
    }

    #[test]
    fn positional_merge_keeps_state_and_takes_new_fields() {
        let previous = vec![network("hub", vec![degraded(Wallet::new("a", "ops", 10.0), 3, true)])];
        let incoming = vec![network("hub", vec![Wallet::new("a", "ops", 99.0)])];

        let merged = merge(&previous, incoming, MergeStrategy::Positional);
        assert_eq!(merged[0].wallets[0].min_balance, 99.0);
        assert_eq!(merged[0].wallets[0].state.consecutive_failures, 3);
        assert!(merged[0].wallets[0].state.below_threshold);
    }

    #[test]
    fn positional_merge_misattaches_on_reorder() {
        let previous = vec![network(
            "hub",
            vec![degraded(Wallet::new("a", "ops", 1.0), 5, false), Wallet::new("b", "ops", 1.0)],
        )];
        let incoming = vec![network(
            "hub",
            vec![Wallet::new("b", "ops", 1.0), Wallet::new("a", "ops", 1.0)],
        )];

        let merged = merge(&previous, incoming, MergeStrategy::Positional);
        assert_eq!(merged[0].wallets[0].address, "b");
        assert_eq!(merged[0].wallets[0].state.consecutive_failures, 5);
    }

    #[test]
    fn keyed_merge_follows_wallet_across_reorder() {
        let previous = vec![network(
            "hub",
            vec![degraded(Wallet::new("a", "ops", 1.0), 5, true), Wallet::new("b", "ops", 1.0)],
        )];
        let incoming = vec![
            network("new", vec![Wallet::new("a", "ops", 1.0)]),
            network("hub", vec![Wallet::new("b", "ops", 1.0), Wallet::new("a", "ops", 7.0)]),
        ];

        let merged = merge(&previous, incoming, MergeStrategy::Keyed);
        assert_eq!(merged[0].wallets[0].state, WalletState::default());
        assert_eq!(merged[1].wallets[0].state, WalletState::default());
        assert_eq!(merged[1].wallets[1].state.consecutive_failures, 5);
        assert_eq!(merged[1].wallets[1].min_balance, 7.0);
    }

    #[test]
    fn extra_incoming_wallets_start_fresh() {
        let previous = vec![network("hub", vec![degraded(Wallet::new("a", "ops", 1.0), 2, false)])];
        let incoming = vec![network(
            "hub",
            vec![Wallet::new("a", "ops", 1.0), Wallet::new("c", "ops", 1.0)],
        )];

        for strategy in [MergeStrategy::Positional, MergeStrategy::Keyed] {
            let merged = merge(&previous, incoming.clone(), strategy);
            assert_eq!(merged[0].wallets[0].state.consecutive_failures, 2);
            assert_eq!(merged[0].wallets[1].state, WalletState::default());
        }
    }

    #[test]
    fn keyed_merge_separates_repeated_addresses() {
        let previous = vec![network(
            "hub",
            vec![
                degraded(Wallet::new("same", "warn", 100.0), 0, true),
                degraded(Wallet::new("same", "critical", 10.0), 2, false),
            ],
        )];
        let incoming = vec![network(
            "hub",
            vec![Wallet::new("same", "warn", 100.0), Wallet::new("same", "critical", 10.0)],
        )];

        let merged = merge(&previous, incoming, MergeStrategy::Keyed);
        assert!(merged[0].wallets[0].state.below_threshold);
        assert_eq!(merged[0].wallets[0].state.consecutive_failures, 0);
        assert!(!merged[0].wallets[1].state.below_threshold);
        assert_eq!(merged[0].wallets[1].state.consecutive_failures, 2);
    }

    #[test]
    fn store_reload_replaces_snapshot() {
        let mut store = StateStore::new(MergeStrategy::Keyed);
        store.reload(vec![network("hub", vec![Wallet::new("a", "ops", 1.0)])]);
        store.networks_mut()[0].wallets[0].state.consecutive_failures = 4;

        store.reload(vec![network("hub", vec![Wallet::new("a", "treasury", 2.0)])]);
        let wallet = &store.networks()[0].wallets[0];
        assert_eq!(wallet.use_case, "treasury");
        assert_eq!(wallet.state.consecutive_failures, 4);
    }
}
