//! In-memory collaborators for driving the engine without a backend.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use anyhow::{anyhow, bail};
use async_trait::async_trait;
use culler_torrent_core::{
    TorrentId, TorrentPredicate, TorrentRecord, TorrentRemover, TorrentSource,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Source that replays a fixed script, one step per fetch.
///
/// Once the script is exhausted the final step repeats. `Err` steps surface as
/// fetch failures carrying the given message.
#[derive(Debug)]
pub struct ScriptedSource {
    steps: Vec<Result<Vec<TorrentRecord>, String>>,
    cursor: AtomicUsize,
}

impl ScriptedSource {
    /// Replay `steps` in order.
    #[must_use]
    pub const fn new(steps: Vec<Result<Vec<TorrentRecord>, String>>) -> Self {
        Self {
            steps,
            cursor: AtomicUsize::new(0),
        }
    }

    /// Return the same torrent set on every fetch.
    #[must_use]
    pub fn repeating(records: Vec<TorrentRecord>) -> Self {
        Self::new(vec![Ok(records)])
    }

    /// Number of fetches served so far.
    #[must_use]
    pub fn fetches(&self) -> usize {
        self.cursor.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TorrentSource for ScriptedSource {
    async fn fetch_all(&self) -> anyhow::Result<Vec<TorrentRecord>> {
        let index = self.cursor.fetch_add(1, Ordering::SeqCst);
        let Some(last) = self.steps.len().checked_sub(1) else {
            return Ok(Vec::new());
        };
        match &self.steps[index.min(last)] {
            Ok(records) => Ok(records.clone()),
            Err(message) => Err(anyhow!(message.clone())),
        }
    }
}

/// Source whose fetch never completes.
#[derive(Debug, Default, Clone, Copy)]
pub struct HangingSource;

#[async_trait]
impl TorrentSource for HangingSource {
    async fn fetch_all(&self) -> anyhow::Result<Vec<TorrentRecord>> {
        std::future::pending().await
    }
}

/// Remover that records every call and rejects a configured id set.
#[derive(Debug, Default)]
pub struct RecordingRemover {
    calls: Mutex<Vec<(TorrentId, bool)>>,
    failing: HashSet<TorrentId>,
}

impl RecordingRemover {
    /// Remover that fails for every id in `ids`.
    #[must_use]
    pub fn failing_for(ids: impl IntoIterator<Item = TorrentId>) -> Self {
        Self {
            calls: Mutex::default(),
            failing: ids.into_iter().collect(),
        }
    }

    /// Calls received so far as `(id, delete_data)` pairs.
    #[must_use]
    pub fn calls(&self) -> Vec<(TorrentId, bool)> {
        lock(&self.calls).clone()
    }
}

#[async_trait]
impl TorrentRemover for RecordingRemover {
    async fn remove(&self, id: TorrentId, delete_data: bool) -> anyhow::Result<()> {
        lock(&self.calls).push((id, delete_data));
        if self.failing.contains(&id) {
            bail!("backend rejected removal of torrent {id}");
        }
        Ok(())
    }
}

/// Remover that records each call and then never completes.
#[derive(Debug, Default)]
pub struct HangingRemover {
    calls: Mutex<Vec<TorrentId>>,
}

impl HangingRemover {
    /// Ids whose removal was attempted.
    #[must_use]
    pub fn calls(&self) -> Vec<TorrentId> {
        lock(&self.calls).clone()
    }
}

#[async_trait]
impl TorrentRemover for HangingRemover {
    async fn remove(&self, id: TorrentId, _delete_data: bool) -> anyhow::Result<()> {
        lock(&self.calls).push(id);
        std::future::pending().await
    }
}

/// Predicate with a fixed answer that counts its evaluations.
#[derive(Debug)]
pub struct StaticPredicate {
    label: String,
    answer: bool,
    evaluations: AtomicUsize,
}

impl StaticPredicate {
    /// Predicate that always answers `answer`.
    #[must_use]
    pub fn new(label: &str, answer: bool) -> Self {
        Self {
            label: label.to_string(),
            answer,
            evaluations: AtomicUsize::new(0),
        }
    }

    /// Number of times the predicate has been evaluated.
    #[must_use]
    pub fn evaluations(&self) -> usize {
        self.evaluations.load(Ordering::SeqCst)
    }
}

impl TorrentPredicate for StaticPredicate {
    fn label(&self) -> &str {
        &self.label
    }

    fn evaluate(&self, _record: &TorrentRecord) -> anyhow::Result<bool> {
        self.evaluations.fetch_add(1, Ordering::SeqCst);
        Ok(self.answer)
    }
}

/// Predicate matching only the given torrent ids.
#[derive(Debug)]
pub struct IdPredicate {
    label: String,
    ids: HashSet<TorrentId>,
}

impl IdPredicate {
    /// Match exactly the torrents in `ids`.
    #[must_use]
    pub fn new(label: &str, ids: impl IntoIterator<Item = TorrentId>) -> Self {
        Self {
            label: label.to_string(),
            ids: ids.into_iter().collect(),
        }
    }
}

impl TorrentPredicate for IdPredicate {
    fn label(&self) -> &str {
        &self.label
    }

    fn evaluate(&self, record: &TorrentRecord) -> anyhow::Result<bool> {
        Ok(self.ids.contains(&record.id))
    }
}

/// Predicate that fails on every evaluation.
#[derive(Debug)]
pub struct FailingPredicate {
    label: String,
    evaluations: AtomicUsize,
}

impl FailingPredicate {
    /// Always-failing predicate.
    #[must_use]
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            evaluations: AtomicUsize::new(0),
        }
    }

    /// Number of times the predicate has been evaluated.
    #[must_use]
    pub fn evaluations(&self) -> usize {
        self.evaluations.load(Ordering::SeqCst)
    }
}

impl TorrentPredicate for FailingPredicate {
    fn label(&self) -> &str {
        &self.label
    }

    fn evaluate(&self, record: &TorrentRecord) -> anyhow::Result<bool> {
        self.evaluations.fetch_add(1, Ordering::SeqCst);
        bail!("predicate `{}` cannot evaluate torrent {}", self.label, record.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripted_source_repeats_last_step() -> anyhow::Result<()> {
        let source = ScriptedSource::new(vec![
            Ok(vec![TorrentRecord::new(1, "a")]),
            Err("down".to_string()),
        ]);
        assert_eq!(source.fetch_all().await?.len(), 1);
        assert!(source.fetch_all().await.is_err());
        assert!(source.fetch_all().await.is_err());
        assert_eq!(source.fetches(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn empty_script_yields_no_torrents() -> anyhow::Result<()> {
        let source = ScriptedSource::new(Vec::new());
        assert!(source.fetch_all().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn recording_remover_records_failures_too() {
        let remover = RecordingRemover::failing_for([TorrentId(2)]);
        assert!(remover.remove(TorrentId(1), true).await.is_ok());
        assert!(remover.remove(TorrentId(2), false).await.is_err());
        assert_eq!(
            remover.calls(),
            vec![(TorrentId(1), true), (TorrentId(2), false)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn hanging_remover_records_before_blocking() {
        let remover = HangingRemover::default();
        let attempt = tokio::time::timeout(
            std::time::Duration::from_secs(1),
            remover.remove(TorrentId(4), true),
        )
        .await;
        assert!(attempt.is_err());
        assert_eq!(remover.calls(), vec![TorrentId(4)]);
    }

    #[test]
    fn id_predicate_matches_listed_ids_only() {
        let predicate = IdPredicate::new("pinned", [TorrentId(1)]);
        assert!(predicate.evaluate(&TorrentRecord::new(1, "a")).is_ok_and(|m| m));
        assert!(predicate.evaluate(&TorrentRecord::new(2, "b")).is_ok_and(|m| !m));
    }

    #[test]
    fn predicates_count_evaluations() {
        let record = TorrentRecord::new(3, "c");
        let yes = StaticPredicate::new("yes", true);
        assert!(yes.evaluate(&record).is_ok_and(|matched| matched));
        assert_eq!(yes.evaluations(), 1);

        let broken = FailingPredicate::new("broken");
        assert!(broken.evaluate(&record).is_err());
        assert_eq!(broken.evaluations(), 1);
        assert_eq!(broken.label(), "broken");
    }
}
