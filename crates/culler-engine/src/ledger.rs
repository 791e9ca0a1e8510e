//! Per-torrent strike counters kept for the lifetime of the daemon.

use std::collections::{HashMap, HashSet};

use culler_torrent_core::{StrikeCondition, TorrentId};

/// Strike counters for a single torrent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StrikeEntry {
    finished: u64,
    stalled: u64,
}

impl StrikeEntry {
    /// Current count for `condition`.
    #[must_use]
    pub const fn get(&self, condition: StrikeCondition) -> u64 {
        match condition {
            StrikeCondition::Finished => self.finished,
            StrikeCondition::Stalled => self.stalled,
        }
    }

    fn counter_mut(&mut self, condition: StrikeCondition) -> &mut u64 {
        match condition {
            StrikeCondition::Finished => &mut self.finished,
            StrikeCondition::Stalled => &mut self.stalled,
        }
    }
}

/// Mapping from torrent id to strike counters.
///
/// Entries only disappear through [`StrikeLedger::retain_only`]; counters are
/// never reset individually.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StrikeLedger {
    entries: HashMap<TorrentId, StrikeEntry>,
}

impl StrikeLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a zeroed entry for `id` unless one already exists.
    pub fn ensure(&mut self, id: TorrentId) {
        self.entries.entry(id).or_default();
    }

    /// Add one strike for `condition` and return the new count.
    ///
    /// An absent entry is created first, so calling [`Self::ensure`] beforehand
    /// is only required for torrents that might not strike this cycle.
    pub fn increment(&mut self, id: TorrentId, condition: StrikeCondition) -> u64 {
        let counter = self.entries.entry(id).or_default().counter_mut(condition);
        *counter = counter.saturating_add(1);
        *counter
    }

    /// Current count for `condition`, zero when the torrent is untracked.
    #[must_use]
    pub fn get(&self, id: TorrentId, condition: StrikeCondition) -> u64 {
        self.entries
            .get(&id)
            .map_or(0, |entry| entry.get(condition))
    }

    /// Entry for `id`, if tracked.
    #[must_use]
    pub fn entry(&self, id: TorrentId) -> Option<&StrikeEntry> {
        self.entries.get(&id)
    }

    /// Whether `id` is tracked.
    #[must_use]
    pub fn contains(&self, id: TorrentId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Drop every entry whose id is not in `observed` and return how many were dropped.
    pub fn retain_only(&mut self, observed: &HashSet<TorrentId>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|id, _| observed.contains(id));
        before - self.entries.len()
    }

    /// Number of tracked torrents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no torrent is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: TorrentId = TorrentId(7);

    #[test]
    fn ensure_is_idempotent_and_keeps_counts() {
        let mut ledger = StrikeLedger::new();
        ledger.ensure(ID);
        assert_eq!(ledger.entry(ID), Some(&StrikeEntry::default()));

        ledger.increment(ID, StrikeCondition::Stalled);
        ledger.ensure(ID);
        assert_eq!(ledger.get(ID, StrikeCondition::Stalled), 1);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn counters_are_independent() {
        let mut ledger = StrikeLedger::new();
        ledger.ensure(ID);
        assert_eq!(ledger.increment(ID, StrikeCondition::Finished), 1);
        assert_eq!(ledger.increment(ID, StrikeCondition::Finished), 2);
        assert_eq!(ledger.increment(ID, StrikeCondition::Stalled), 1);
        assert_eq!(ledger.get(ID, StrikeCondition::Finished), 2);
        assert_eq!(ledger.get(ID, StrikeCondition::Stalled), 1);
    }

    #[test]
    fn get_defaults_to_zero_for_unknown_torrents() {
        let ledger = StrikeLedger::new();
        assert_eq!(ledger.get(ID, StrikeCondition::Finished), 0);
        assert!(ledger.entry(ID).is_none());
        assert!(ledger.is_empty());
    }

    #[test]
    fn retain_only_matches_observed_set() {
        let mut ledger = StrikeLedger::new();
        for raw in 1..=4 {
            ledger.ensure(TorrentId(raw));
        }
        let observed: HashSet<TorrentId> = [TorrentId(2), TorrentId(4), TorrentId(9)]
            .into_iter()
            .collect();

        assert_eq!(ledger.retain_only(&observed), 2);
        assert!(ledger.contains(TorrentId(2)));
        assert!(ledger.contains(TorrentId(4)));
        assert!(!ledger.contains(TorrentId(1)));
        assert!(!ledger.contains(TorrentId(9)), "gc never creates entries");
    }

    #[test]
    fn increment_saturates() {
        let mut ledger = StrikeLedger::new();
        ledger
            .entries
            .insert(ID, StrikeEntry { finished: u64::MAX, stalled: 0 });
        assert_eq!(ledger.increment(ID, StrikeCondition::Finished), u64::MAX);
    }
}
