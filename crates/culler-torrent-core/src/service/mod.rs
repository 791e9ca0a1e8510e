//! Collaborator traits implemented by backend adapters and predicate evaluators.

use crate::model::{TorrentId, TorrentRecord};
use async_trait::async_trait;

/// Supplies the full torrent set once per cycle.
#[async_trait]
pub trait TorrentSource: Send + Sync {
    /// Fetch every torrent currently managed by the backend.
    async fn fetch_all(&self) -> anyhow::Result<Vec<TorrentRecord>>;
}

/// Deletes torrents from the backend.
#[async_trait]
pub trait TorrentRemover: Send + Sync {
    /// Remove a torrent, optionally deleting its downloaded data.
    async fn remove(&self, id: TorrentId, delete_data: bool) -> anyhow::Result<()>;
}

/// Boolean predicate bound to a compiled expression and evaluated per record.
pub trait TorrentPredicate: Send + Sync {
    /// Human-readable label used in logs and metrics.
    fn label(&self) -> &str;

    /// Evaluate the predicate against a record.
    ///
    /// # Errors
    ///
    /// Returns an error when the predicate cannot be evaluated for this record.
    fn evaluate(&self, record: &TorrentRecord) -> anyhow::Result<bool>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;
    use std::sync::Mutex;

    struct StubSource;

    #[async_trait]
    impl TorrentSource for StubSource {
        async fn fetch_all(&self) -> anyhow::Result<Vec<TorrentRecord>> {
            Ok(vec![TorrentRecord::new(1, "one"), TorrentRecord::new(2, "two")])
        }
    }

    #[derive(Default)]
    struct StubRemover {
        removed: Mutex<Vec<(TorrentId, bool)>>,
    }

    #[async_trait]
    impl TorrentRemover for StubRemover {
        async fn remove(&self, id: TorrentId, delete_data: bool) -> anyhow::Result<()> {
            if id.0 < 0 {
                bail!("negative ids are rejected");
            }
            self.removed
                .lock()
                .map_err(|_| anyhow::anyhow!("poisoned"))?
                .push((id, delete_data));
            Ok(())
        }
    }

    #[tokio::test]
    async fn traits_are_object_safe() -> anyhow::Result<()> {
        let source: Box<dyn TorrentSource> = Box::new(StubSource);
        let remover = StubRemover::default();
        let sink: &dyn TorrentRemover = &remover;

        let torrents = source.fetch_all().await?;
        for torrent in &torrents {
            sink.remove(torrent.id, false).await?;
        }
        assert!(sink.remove(TorrentId(-1), true).await.is_err());

        let removed = remover
            .removed
            .lock()
            .map_err(|_| anyhow::anyhow!("poisoned"))?
            .clone();
        assert_eq!(removed, vec![(TorrentId(1), false), (TorrentId(2), false)]);
        Ok(())
    }
}
