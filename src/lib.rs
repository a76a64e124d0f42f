pub mod config;
pub mod extract;
pub mod logger;
pub mod monitoring;
pub mod notify;
pub mod price;
pub mod scheduler;
pub mod sources;
pub mod state;

pub use config::{
    Config, ConfigError, DefinitionSource, MergeStrategy, Network, NetworkKind, NetworkLoader,
    NotificationConfig, TelegramConfig, Wallet,
};
pub use extract::{extract, Amount, ExtractError};
pub use logger::{init_tracing, log_cycle_summary};
pub use monitoring::{Alert, AlertKind, BalanceMonitor, BalanceTransition, HealthMonitor, HealthStatus};
pub use notify::{AlertRouter, Gateway, NotificationError, NotificationGateway};
pub use price::{PriceError, PriceOracle, SimplePriceOracle};
pub use scheduler::{CycleReport, Scheduler};
pub use sources::{BalanceFetcher, ChainSources, Coin, FetchError, PollOutcome, Reading};
pub use state::{StateStore, WalletState};
