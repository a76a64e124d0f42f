use std::time::Duration;

use crate::config::{DefinitionSource, MergeStrategy, Network, Wallet};
use crate::extract::{extract, Amount};
use crate::logger::{log_cycle_summary, shorten_address};
use crate::monitoring::{Alert, AlertKind, BalanceMonitor, BalanceTransition, HealthMonitor, UsdValue};
use crate::notify::{AlertRouter, NotificationGateway};
use crate::price::PriceOracle;
use crate::sources::{BalanceFetcher, PollOutcome};
use crate::state::{StateStore, WalletState};

/// Summary of one monitoring cycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub wallets_checked: usize,
    pub failures: usize,
    pub alerts: Vec<AlertKind>,
    pub delivered: usize,
    /// The definitions could not be reloaded; the previous snapshot was used
    pub config_error: bool,
}

impl CycleReport {
    pub fn has_issues(&self) -> bool {
        self.failures > 0 || self.config_error
    }
}

#[derive(Debug, Default)]
struct WalletReport {
    ok: bool,
    alerts: Vec<AlertKind>,
    delivered: usize,
}

/// Fixed-interval loop driving the fetch, extract, and alert pipeline
pub struct Scheduler<D, F, P, G> {
    definitions: D,
    store: StateStore,
    fetcher: F,
    prices: P,
    router: AlertRouter<G>,
    interval: Duration,
}

impl<D, F, P, G> Scheduler<D, F, P, G>
where
    D: DefinitionSource,
    F: BalanceFetcher,
    P: PriceOracle,
    G: NotificationGateway,
{
    pub fn new(
        definitions: D,
        fetcher: F,
        prices: P,
        router: AlertRouter<G>,
        strategy: MergeStrategy,
        interval: Duration,
    ) -> Self {
        Self {
            definitions,
            store: StateStore::new(strategy),
            fetcher,
            prices,
            router,
            interval,
        }
    }

    pub fn networks(&self) -> &[Network] {
        self.store.networks()
    }

    pub fn router(&self) -> &AlertRouter<G> {
        &self.router
    }

    /// Run forever
    pub async fn run(&mut self) {
        loop {
            let report = self.run_cycle().await;
            log_cycle_summary(&report);
            tokio::time::sleep(self.interval).await;
        }
    }

    /// Reload definitions, then poll every wallet of every network once
    pub async fn run_cycle(&mut self) -> CycleReport {
        let mut report = CycleReport::default();

        match self.definitions.load_networks() {
            Ok(networks) => self.store.reload(networks),
            Err(e) => {
                tracing::error!(error = %e, "failed to reload network definitions, keeping previous");
                report.config_error = true;
            }
        }

        for n in 0..self.store.networks().len() {
            let network = &self.store.networks()[n];
            let health = HealthMonitor::new(network.rpc_error_threshold(self.interval));
            tracing::debug!(
                network = %network.identifier,
                rpc_error_threshold = health.rpc_error_threshold(),
                "checking network"
            );

            for w in 0..self.store.networks()[n].wallets.len() {
                let network = &self.store.networks()[n];
                let (state, outcome) = self.poll_wallet(network, &network.wallets[w], health).await;
                self.store.networks_mut()[n].wallets[w].state = state;

                report.wallets_checked += 1;
                if !outcome.ok {
                    report.failures += 1;
                }
                report.alerts.extend(outcome.alerts);
                report.delivered += outcome.delivered;
            }
        }

        report
    }

    async fn poll_wallet(
        &self,
        network: &Network,
        wallet: &Wallet,
        health: HealthMonitor,
    ) -> (WalletState, WalletReport) {
        let mut state = wallet.state;
        let mut report = WalletReport::default();
        let short = shorten_address(&wallet.address);

        let amount = match self.fetcher.fetch(network, wallet).await {
            PollOutcome::Failed(e) => {
                tracing::warn!(network = %network.identifier, wallet = %short, error = %e, "balance fetch failed");
                None
            }
            PollOutcome::Fetched(reading) => match extract(&reading, network) {
                Ok(amount) => Some(amount),
                Err(e) => {
                    tracing::warn!(
                        network = %network.identifier,
                        wallet = %short,
                        error = %e,
                        raw = %reading.raw,
                        "unusable balance response"
                    );
                    None
                }
            },
        };

        let Some(amount) = amount else {
            if let Some(failures) = health.record_failure(&mut state) {
                self.emit(Alert::rpc_issue(network, wallet, failures), &mut report).await;
            }
            return (state, report);
        };

        report.ok = true;
        match BalanceMonitor::observe(&mut state, amount, wallet.min_balance) {
            BalanceTransition::WentLow => {
                let usd = self.usd_value(network, amount).await;
                self.emit(Alert::low_funds(network, wallet, amount, usd), &mut report)
                    .await;
            }
            BalanceTransition::Replenished => {
                let usd = self.usd_value(network, amount).await;
                self.emit(Alert::replenished(network, wallet, amount, usd), &mut report)
                    .await;
            }
            BalanceTransition::StillLow => {
                tracing::info!(
                    network = %network.identifier,
                    wallet = %wallet.use_case,
                    balance = %amount,
                    unit = %network.currency_unit,
                    "wallet remains low on funds"
                );
            }
            BalanceTransition::Steady => {
                tracing::debug!(network = %network.identifier, wallet = %short, balance = %amount, "balance ok");
            }
        }

        if let Some(ended) = health.record_success(&mut state) {
            tracing::info!(network = %network.identifier, wallet = %short, failures = ended, "endpoint recovered");
        }

        (state, report)
    }

    async fn emit(&self, alert: Alert, report: &mut WalletReport) {
        if self.router.dispatch(&alert).await {
            report.delivered += 1;
        }
        report.alerts.push(alert.kind);
    }

    async fn usd_value(&self, network: &Network, amount: Amount) -> UsdValue {
        let rate = match self.prices.usd_price(&network.price_source).await {
            Ok(rate) => Some(rate),
            Err(e) => {
                tracing::warn!(network = %network.identifier, error = %e, "price lookup failed");
                None
            }
        };
        UsdValue::from_rate(amount.to_display(network.conversion_factor), rate)
    }
}
