//! Removal policy knobs consumed by the engine.

use std::time::Duration;

use culler_torrent_core::StrikeCondition;

/// Default strike threshold.
pub const DEFAULT_THRESHOLD: u64 = 5;
/// Default bound applied to every backend call made during a cycle.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(10);

/// Thresholds and unconditional-removal switches.
///
/// A single threshold applies to both conditions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvictionPolicy {
    /// Strikes required before a condition can trigger removal.
    pub threshold: u64,
    /// Remove finished torrents without consulting the remove predicate.
    pub remove_finished: bool,
    /// Remove stalled torrents without consulting the remove predicate.
    pub remove_stalled: bool,
    /// Upper bound on each fetch or removal call.
    pub call_timeout: Duration,
}

impl Default for EvictionPolicy {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            remove_finished: false,
            remove_stalled: false,
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }
}

impl EvictionPolicy {
    /// Whether removal for `condition` is authorized without a predicate.
    #[must_use]
    pub const fn is_unconditional(&self, condition: StrikeCondition) -> bool {
        match condition {
            StrikeCondition::Finished => self.remove_finished,
            StrikeCondition::Stalled => self.remove_stalled,
        }
    }

    /// Whether `strikes` reaches the threshold.
    #[must_use]
    pub const fn threshold_reached(&self, strikes: u64) -> bool {
        strikes >= self.threshold
    }
}
