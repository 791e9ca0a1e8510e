//! Prometheus-backed metrics registry and snapshot helpers.
//!
//! # Design
//! - Encapsulates collector registration to keep the public API small.
//! - Exposes the counters and gauges the eviction loop updates once per cycle.

use std::convert::TryFrom;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use prometheus::core::Collector;
use prometheus::{IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};
use serde::Serialize;

use crate::error::{Result, TelemetryError};

const OUTCOME_COMPLETED: &str = "completed";
const OUTCOME_ABORTED: &str = "aborted";
const OUTCOME_SUCCEEDED: &str = "succeeded";
const OUTCOME_FAILED: &str = "failed";

/// Prometheus-backed metrics registry shared across services.
#[derive(Clone)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

struct MetricsInner {
    registry: Registry,
    cycles_total: IntCounterVec,
    torrents_observed: IntGauge,
    ledger_entries: IntGauge,
    strikes_total: IntCounterVec,
    removals_total: IntCounterVec,
    predicate_failures_total: IntCounterVec,
    torrents_ignored_total: IntCounter,
    last_cycle_timestamp_seconds: IntGauge,
    last_cycle_duration_ms: IntGauge,
}

/// Snapshot of selected gauges and counters for health reporting.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    /// Cycles that ran to completion.
    pub cycles_completed: u64,
    /// Cycles aborted because the observation fetch failed.
    pub cycles_aborted: u64,
    /// Torrents reported by the backend in the latest completed cycle.
    pub torrents_observed: i64,
    /// Strike ledger entries retained after the latest garbage collection.
    pub ledger_entries: i64,
    /// Removal commands accepted by the backend.
    pub removals_succeeded: u64,
    /// Removal commands rejected by the backend.
    pub removals_failed: u64,
    /// Unix timestamp of the latest completed cycle, zero before the first.
    pub last_cycle_timestamp_seconds: i64,
    /// Wall time spent in the latest completed cycle (ms).
    pub last_cycle_duration_ms: i64,
}

impl Metrics {
    /// Construct a new metrics registry with the standard collectors registered.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the Prometheus collectors cannot be
    /// built or registered.
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let cycles_total = register(
            &registry,
            "cycles_total",
            IntCounterVec::new(
                Opts::new("cycles_total", "Eviction cycles executed by outcome"),
                &["outcome"],
            ),
        )?;
        let torrents_observed = register(
            &registry,
            "torrents_observed",
            IntGauge::with_opts(Opts::new(
                "torrents_observed",
                "Torrents reported by the backend in the latest cycle",
            )),
        )?;
        let ledger_entries = register(
            &registry,
            "ledger_entries",
            IntGauge::with_opts(Opts::new(
                "ledger_entries",
                "Torrents currently tracked by the strike ledger",
            )),
        )?;
        let strikes_total = register(
            &registry,
            "strikes_total",
            IntCounterVec::new(
                Opts::new("strikes_total", "Strikes recorded by condition"),
                &["condition"],
            ),
        )?;
        let removals_total = register(
            &registry,
            "removals_total",
            IntCounterVec::new(
                Opts::new("removals_total", "Removal commands issued by condition and outcome"),
                &["condition", "outcome"],
            ),
        )?;
        let predicate_failures_total = register(
            &registry,
            "predicate_failures_total",
            IntCounterVec::new(
                Opts::new(
                    "predicate_failures_total",
                    "Predicate evaluations that failed and were treated as non-matching",
                ),
                &["predicate"],
            ),
        )?;
        let torrents_ignored_total = register(
            &registry,
            "torrents_ignored_total",
            IntCounter::with_opts(Opts::new(
                "torrents_ignored_total",
                "Torrents skipped because the ignore predicate matched",
            )),
        )?;
        let last_cycle_timestamp_seconds = register(
            &registry,
            "last_cycle_timestamp_seconds",
            IntGauge::with_opts(Opts::new(
                "last_cycle_timestamp_seconds",
                "Unix timestamp of the latest completed cycle",
            )),
        )?;
        let last_cycle_duration_ms = register(
            &registry,
            "last_cycle_duration_ms",
            IntGauge::with_opts(Opts::new(
                "last_cycle_duration_ms",
                "Time spent in the latest completed cycle (ms)",
            )),
        )?;

        Ok(Self {
            inner: Arc::new(MetricsInner {
                registry,
                cycles_total,
                torrents_observed,
                ledger_entries,
                strikes_total,
                removals_total,
                predicate_failures_total,
                torrents_ignored_total,
                last_cycle_timestamp_seconds,
                last_cycle_duration_ms,
            }),
        })
    }

    /// Record a completed cycle along with its wall time.
    pub fn observe_cycle_completed(&self, duration: Duration) {
        self.inner
            .cycles_total
            .with_label_values(&[OUTCOME_COMPLETED])
            .inc();
        self.inner
            .last_cycle_timestamp_seconds
            .set(Utc::now().timestamp());
        self.inner
            .last_cycle_duration_ms
            .set(Self::duration_to_ms(duration));
    }

    /// Record a cycle aborted before any ledger mutation.
    pub fn inc_cycle_aborted(&self) {
        self.inner
            .cycles_total
            .with_label_values(&[OUTCOME_ABORTED])
            .inc();
    }

    /// Set the observed torrent gauge.
    pub fn set_torrents_observed(&self, count: usize) {
        self.inner.torrents_observed.set(Self::count_to_i64(count));
    }

    /// Set the strike ledger size gauge.
    pub fn set_ledger_entries(&self, count: usize) {
        self.inner.ledger_entries.set(Self::count_to_i64(count));
    }

    /// Increment the strike counter for a condition.
    pub fn inc_strike(&self, condition: &str) {
        self.inner
            .strikes_total
            .with_label_values(&[condition])
            .inc();
    }

    /// Record the outcome of a removal command.
    pub fn inc_removal(&self, condition: &str, succeeded: bool) {
        let outcome = if succeeded {
            OUTCOME_SUCCEEDED
        } else {
            OUTCOME_FAILED
        };
        self.inner
            .removals_total
            .with_label_values(&[condition, outcome])
            .inc();
    }

    /// Increment the predicate failure counter.
    pub fn inc_predicate_failure(&self, predicate: &str) {
        self.inner
            .predicate_failures_total
            .with_label_values(&[predicate])
            .inc();
    }

    /// Increment the ignored torrent counter.
    pub fn inc_ignored(&self) {
        self.inner.torrents_ignored_total.inc();
    }

    /// Render the metrics registry using the Prometheus text exposition format.
    ///
    /// # Errors
    ///
    /// Returns an error if the metrics cannot be encoded.
    pub fn render(&self) -> Result<String> {
        let families = self.inner.registry.gather();
        TextEncoder::new()
            .encode_to_string(&families)
            .map_err(|source| TelemetryError::Render {
                families: families.len(),
                source,
            })
    }

    /// Take a point-in-time snapshot of the most relevant gauges and counters.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        let removals = |outcome: &str| -> u64 {
            ["finished", "stalled"]
                .into_iter()
                .map(|condition| {
                    self.inner
                        .removals_total
                        .with_label_values(&[condition, outcome])
                        .get()
                })
                .sum()
        };
        MetricsSnapshot {
            cycles_completed: self
                .inner
                .cycles_total
                .with_label_values(&[OUTCOME_COMPLETED])
                .get(),
            cycles_aborted: self
                .inner
                .cycles_total
                .with_label_values(&[OUTCOME_ABORTED])
                .get(),
            torrents_observed: self.inner.torrents_observed.get(),
            ledger_entries: self.inner.ledger_entries.get(),
            removals_succeeded: removals(OUTCOME_SUCCEEDED),
            removals_failed: removals(OUTCOME_FAILED),
            last_cycle_timestamp_seconds: self.inner.last_cycle_timestamp_seconds.get(),
            last_cycle_duration_ms: self.inner.last_cycle_duration_ms.get(),
        }
    }

    /// Convert a duration to milliseconds saturating at `i64::MAX`.
    pub(crate) fn duration_to_ms(duration: Duration) -> i64 {
        i64::try_from(duration.as_millis()).unwrap_or(i64::MAX)
    }

    fn count_to_i64(count: usize) -> i64 {
        i64::try_from(count).unwrap_or(i64::MAX)
    }
}

fn register<C>(
    registry: &Registry,
    name: &'static str,
    collector: prometheus::Result<C>,
) -> Result<C>
where
    C: Collector + Clone + 'static,
{
    let collector = collector.map_err(|source| TelemetryError::Metric { name, source })?;
    registry
        .register(Box::new(collector.clone()))
        .map_err(|source| TelemetryError::Metric { name, source })?;
    Ok(collector)
}
