//! Failure-streak tracking for a wallet's query endpoint.
//!
//! ```text
//! Healthy     --failure--> Degraded(1)
//! Degraded(n) --failure--> Degraded(n + 1)   alerts when n + 1 is a multiple of the threshold
//! Degraded(n) --success--> Healthy           silent
//! ```
//!
//! Unlike the balance alert this repeats: a persistent outage alerts once
//! per threshold period.

use crate::state::WalletState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    Healthy,
    Degraded(u64),
}

/// Per-network health policy, rebuilt each cycle from the network definition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthMonitor {
    rpc_error_threshold: u64,
}

impl HealthMonitor {
    pub fn new(rpc_error_threshold: u64) -> Self {
        Self {
            rpc_error_threshold,
        }
    }

    pub fn rpc_error_threshold(&self) -> u64 {
        self.rpc_error_threshold
    }

    pub fn status(state: &WalletState) -> HealthStatus {
        match state.consecutive_failures {
            0 => HealthStatus::Healthy,
            n => HealthStatus::Degraded(n),
        }
    }

    /// Whether a streak of `failures` warrants an RPC alert
    pub fn should_alert(&self, failures: u64) -> bool {
        if failures == 0 {
            return false;
        }
        match self.rpc_error_threshold {
            0 => true,
            k => failures % k == 0,
        }
    }

    /// Count a failed poll. Returns the streak length when an alert is due.
    pub fn record_failure(&self, state: &mut WalletState) -> Option<u64> {
        state.consecutive_failures = state.consecutive_failures.saturating_add(1);
        self.should_alert(state.consecutive_failures)
            .then_some(state.consecutive_failures)
    }

    /// Reset the streak after a successful poll. Returns the length of the
    /// streak that just ended, if any.
    pub fn record_success(&self, state: &mut WalletState) -> Option<u64> {
        let ended = std::mem::take(&mut state.consecutive_failures);
        (ended > 0).then_some(ended)
    }
}
