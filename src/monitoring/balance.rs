use crate::extract::Amount;
use crate::state::WalletState;

/// Outcome of comparing a fresh balance against the wallet's threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceTransition {
    /// Crossed below the threshold; alert
    WentLow,
    /// Crossed back to or above the threshold; alert
    Replenished,
    /// Still below; log only
    StillLow,
    /// Above and was above
    Steady,
}

impl BalanceTransition {
    pub fn is_alert(&self) -> bool {
        matches!(self, BalanceTransition::WentLow | BalanceTransition::Replenished)
    }
}

/// Edge-triggered low-balance detection
#[derive(Debug, Clone, Copy, Default)]
pub struct BalanceMonitor;

impl BalanceMonitor {
    /// Apply a validated balance to the wallet state.
    ///
    /// Equality with the threshold counts as replenished.
    pub fn observe(state: &mut WalletState, balance: Amount, min_balance: f64) -> BalanceTransition {
        let below = balance.is_below(min_balance);
        match (state.below_threshold, below) {
            (false, true) => {
                state.below_threshold = true;
                BalanceTransition::WentLow
            }
            (true, false) => {
                state.below_threshold = false;
                BalanceTransition::Replenished
            }
            (true, true) => BalanceTransition::StillLow,
            (false, false) => BalanceTransition::Steady,
        }
    }
}
