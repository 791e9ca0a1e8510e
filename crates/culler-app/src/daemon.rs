//! Periodic task that owns the strike ledger and feeds it through the engine.

use std::sync::Arc;

use async_trait::async_trait;
use culler_engine::{EvictionEngine, StrikeLedger};
use culler_torrent_core::{TorrentRemover, TorrentSource};
use tracing::{Instrument, error, info, info_span};
use uuid::Uuid;

use crate::scheduler::PeriodicTask;

/// Eviction engine bound to a backend and the ledger it mutates.
pub struct EvictionDaemon {
    engine: EvictionEngine,
    ledger: StrikeLedger,
    source: Arc<dyn TorrentSource>,
    remover: Arc<dyn TorrentRemover>,
}

impl EvictionDaemon {
    /// Bind `engine` to a source and removal sink, starting from an empty ledger.
    #[must_use]
    pub fn new(
        engine: EvictionEngine,
        source: Arc<dyn TorrentSource>,
        remover: Arc<dyn TorrentRemover>,
    ) -> Self {
        Self {
            engine,
            ledger: StrikeLedger::new(),
            source,
            remover,
        }
    }

    /// Current strike state.
    #[must_use]
    pub const fn ledger(&self) -> &StrikeLedger {
        &self.ledger
    }
}

#[async_trait]
impl PeriodicTask for EvictionDaemon {
    async fn run_once(&mut self) {
        let Self {
            engine,
            ledger,
            source,
            remover,
        } = self;
        let span = info_span!("cycle", cycle_id = %Uuid::new_v4());

        async {
            match engine
                .run_cycle(ledger, source.as_ref(), remover.as_ref())
                .await
            {
                Ok(report) => info!(
                    observed = report.observed,
                    ignored = report.ignored,
                    collected = report.collected,
                    removals = report.removals.len(),
                    failed_removals = report.failed_removals(),
                    "cycle completed"
                ),
                Err(err) => error!(error = %err, detail = ?err, "cycle aborted; strikes unchanged"),
            }
        }
        .instrument(span)
        .await;
    }
}
