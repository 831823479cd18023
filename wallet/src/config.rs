//! Settlement configuration.

/// External policy inputs for settlement. No hidden globals: the values are
/// injected by whoever constructs the service.
#[derive(Clone, Copy, Debug)]
pub struct SettlementConfig {
    /// Seconds between unbonding and withdrawability of the unbonded stake.
    pub unbonding_period_secs: u64,
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self {
            // One week, matching common mainnet configurations.
            unbonding_period_secs: 7 * 24 * 60 * 60,
        }
    }
}
