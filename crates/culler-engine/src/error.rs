//! Error types for the eviction engine.

use std::error::Error;
use std::time::Duration;

use thiserror::Error;

/// Failures that abort a whole cycle.
///
/// Predicate and removal failures are absorbed inside the cycle and never
/// surface here.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The observation source returned an error.
    #[error("failed to fetch torrents")]
    Fetch {
        /// Underlying source failure.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// The observation source did not answer within the call timeout.
    #[error("timed out fetching torrents")]
    FetchTimedOut {
        /// Bound that elapsed.
        timeout: Duration,
    },
}

impl EngineError {
    pub(crate) fn fetch(source: anyhow::Error) -> Self {
        Self::Fetch {
            source: source.into(),
        }
    }
}

/// Convenience alias for engine results.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_error_keeps_source() {
        let err = EngineError::fetch(anyhow::anyhow!("connection refused"));
        assert_eq!(err.to_string(), "failed to fetch torrents");
        let source = err.source().map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("connection refused"));
    }
}
