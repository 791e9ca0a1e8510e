//! Strike-based eviction: one fetch, decide, remove, collect pass per call.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use anyhow::anyhow;
use culler_telemetry::Metrics;
use culler_torrent_core::{
    RemovalCommand, StrikeCondition, TorrentPredicate, TorrentRecord, TorrentRemover,
    TorrentSource,
};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::error::{EngineError, EngineResult};
use crate::ledger::StrikeLedger;
use crate::policy::EvictionPolicy;

/// Result of a single removal command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovalOutcome {
    /// Command handed to the removal sink.
    pub command: RemovalCommand,
    /// Whether the sink accepted the command.
    pub succeeded: bool,
}

/// Summary of one completed cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Torrents returned by the observation source.
    pub observed: usize,
    /// Torrents skipped because the ignore predicate matched.
    pub ignored: usize,
    /// Ledger entries dropped by garbage collection.
    pub collected: usize,
    /// Removal commands in the order they were issued.
    pub removals: Vec<RemovalOutcome>,
}

impl CycleReport {
    /// Commands issued this cycle, regardless of outcome.
    #[must_use]
    pub fn commands(&self) -> Vec<&RemovalCommand> {
        self.removals.iter().map(|outcome| &outcome.command).collect()
    }

    /// Number of commands the sink rejected.
    #[must_use]
    pub fn failed_removals(&self) -> usize {
        self.removals
            .iter()
            .filter(|outcome| !outcome.succeeded)
            .count()
    }
}

/// Converts per-cycle observations into debounced removal decisions.
///
/// The engine holds configuration only; strike state lives in the
/// [`StrikeLedger`] handed to [`EvictionEngine::run_cycle`].
pub struct EvictionEngine {
    policy: EvictionPolicy,
    remove_predicate: Option<Arc<dyn TorrentPredicate>>,
    ignore_predicate: Option<Arc<dyn TorrentPredicate>>,
    metrics: Metrics,
}

impl EvictionEngine {
    /// Construct an engine without predicates.
    #[must_use]
    pub fn new(policy: EvictionPolicy, metrics: Metrics) -> Self {
        Self {
            policy,
            remove_predicate: None,
            ignore_predicate: None,
            metrics,
        }
    }

    /// Attach the predicate that authorizes removal once a threshold is reached.
    #[must_use]
    pub fn with_remove_predicate(mut self, predicate: Arc<dyn TorrentPredicate>) -> Self {
        self.remove_predicate = Some(predicate);
        self
    }

    /// Attach the predicate that excludes matching torrents from a cycle.
    #[must_use]
    pub fn with_ignore_predicate(mut self, predicate: Arc<dyn TorrentPredicate>) -> Self {
        self.ignore_predicate = Some(predicate);
        self
    }

    /// Run one cycle against `ledger`.
    ///
    /// Torrents are processed in source order. Garbage collection runs once,
    /// after every per-torrent decision, under the full seen set.
    ///
    /// # Errors
    ///
    /// Returns an error when the observation fetch fails or times out. The
    /// ledger is left untouched in that case.
    pub async fn run_cycle(
        &self,
        ledger: &mut StrikeLedger,
        source: &dyn TorrentSource,
        remover: &dyn TorrentRemover,
    ) -> EngineResult<CycleReport> {
        let started = Instant::now();
        let torrents = match timeout(self.policy.call_timeout, source.fetch_all()).await {
            Ok(Ok(torrents)) => torrents,
            Ok(Err(err)) => {
                self.metrics.inc_cycle_aborted();
                return Err(EngineError::fetch(err));
            }
            Err(_) => {
                self.metrics.inc_cycle_aborted();
                return Err(EngineError::FetchTimedOut {
                    timeout: self.policy.call_timeout,
                });
            }
        };

        info!(
            ledger_entries = ledger.len(),
            torrents = torrents.len(),
            "running a cycle"
        );
        self.metrics.set_torrents_observed(torrents.len());

        let mut report = CycleReport {
            observed: torrents.len(),
            ..CycleReport::default()
        };
        let mut seen = HashSet::with_capacity(torrents.len());

        for torrent in &torrents {
            if self.is_ignored(torrent) {
                report.ignored += 1;
                continue;
            }
            seen.insert(torrent.id);
            self.record_strikes(ledger, torrent);

            for condition in StrikeCondition::ALL {
                let strikes = ledger.get(torrent.id, condition);
                if !self.removal_authorized(torrent, condition, strikes) {
                    continue;
                }
                info!(
                    torrent = %torrent.name,
                    torrent_id = %torrent.id,
                    condition = condition.as_str(),
                    strikes,
                    "torrent has been {} for {} cycles and will be removed",
                    condition,
                    strikes
                );
                let outcome = self.remove(remover, torrent, condition).await;
                report.removals.push(outcome);
            }
        }

        report.collected = ledger.retain_only(&seen);
        if report.collected > 0 {
            debug!(
                collected = report.collected,
                "dropped strikes for torrents no longer observed"
            );
        }
        self.metrics.set_ledger_entries(ledger.len());
        self.metrics.observe_cycle_completed(started.elapsed());
        Ok(report)
    }

    fn is_ignored(&self, torrent: &TorrentRecord) -> bool {
        let Some(predicate) = self.ignore_predicate.as_deref() else {
            return false;
        };
        let ignored = self.evaluate(predicate, torrent);
        if ignored {
            debug!(
                torrent = %torrent.name,
                torrent_id = %torrent.id,
                predicate = predicate.label(),
                "torrent matched the ignore predicate"
            );
            self.metrics.inc_ignored();
        }
        ignored
    }

    fn record_strikes(&self, ledger: &mut StrikeLedger, torrent: &TorrentRecord) {
        ledger.ensure(torrent.id);
        for condition in StrikeCondition::ALL {
            if condition.holds_for(torrent) {
                ledger.increment(torrent.id, condition);
                self.metrics.inc_strike(condition.as_str());
            }
        }
    }

    fn removal_authorized(
        &self,
        torrent: &TorrentRecord,
        condition: StrikeCondition,
        strikes: u64,
    ) -> bool {
        if !self.policy.threshold_reached(strikes) {
            return false;
        }
        if self.policy.is_unconditional(condition) {
            return true;
        }
        let Some(predicate) = self.remove_predicate.as_deref() else {
            return false;
        };
        let matched = self.evaluate(predicate, torrent);
        if matched {
            info!(
                torrent = %torrent.name,
                predicate = predicate.label(),
                "remove predicate evaluated to true"
            );
        }
        matched
    }

    fn evaluate(&self, predicate: &dyn TorrentPredicate, torrent: &TorrentRecord) -> bool {
        match predicate.evaluate(torrent) {
            Ok(matched) => matched,
            Err(err) => {
                warn!(
                    error = %err,
                    torrent = %torrent.name,
                    torrent_id = %torrent.id,
                    predicate = predicate.label(),
                    "predicate evaluation failed; treating as non-matching"
                );
                self.metrics.inc_predicate_failure(predicate.label());
                false
            }
        }
    }

    async fn remove(
        &self,
        remover: &dyn TorrentRemover,
        torrent: &TorrentRecord,
        condition: StrikeCondition,
    ) -> RemovalOutcome {
        let command = RemovalCommand::for_condition(torrent, condition);
        let call_timeout = self.policy.call_timeout;
        let result = match timeout(call_timeout, remover.remove(command.id, command.delete_data))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(anyhow!("removal timed out after {call_timeout:?}")),
        };

        let succeeded = match result {
            Ok(()) => true,
            Err(err) => {
                warn!(
                    error = %err,
                    torrent = %torrent.name,
                    torrent_id = %torrent.id,
                    condition = condition.as_str(),
                    "failed to remove torrent"
                );
                false
            }
        };
        self.metrics.inc_removal(condition.as_str(), succeeded);
        RemovalOutcome { command, succeeded }
    }
}
