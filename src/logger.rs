use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::scheduler::CycleReport;

/// Install the fmt subscriber, filtered by `RUST_LOG` (default `info`)
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Single summary line at the end of every cycle
pub fn log_cycle_summary(report: &CycleReport) {
    if report.has_issues() {
        tracing::warn!(
            wallets = report.wallets_checked,
            failures = report.failures,
            alerts = report.alerts.len(),
            delivered = report.delivered,
            config_error = report.config_error,
            "Run completed with issues in one or more networks."
        );
    } else {
        tracing::info!(
            wallets = report.wallets_checked,
            alerts = report.alerts.len(),
            delivered = report.delivered,
            "Run completed successfully with all networks checked."
        );
    }
}

/// Shorten address for display (0xabcd...1234)
pub fn shorten_address(address: &str) -> String {
    if address.len() > 10 && address.is_char_boundary(6) && address.is_char_boundary(address.len() - 4) {
        format!("{}...{}", &address[..6], &address[address.len() - 4..])
    } else {
        address.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shortens_long_addresses() {
        assert_eq!(
            shorten_address("0x28C6c06298d514Db089934071355E5743bf21d60"),
            "0x28C6...1d60"
        );
        assert_eq!(shorten_address("cosmos1"), "cosmos1");
    }

    #[test]
    fn issues_flag() {
        let mut report = CycleReport::default();
        assert!(!report.has_issues());
        report.failures = 1;
        assert!(report.has_issues());
    }
}
