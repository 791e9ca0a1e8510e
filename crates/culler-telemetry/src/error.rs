//! Error types for logging and metrics setup.

use prometheus::Error as PrometheusError;
use thiserror::Error;
use tracing_subscriber::util::TryInitError;

use crate::init::LogFormat;

/// Result alias for telemetry operations.
pub type Result<T> = std::result::Result<T, TelemetryError>;

/// Failures raised while wiring the daemon's observability.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// A global subscriber was already installed.
    #[error("failed to install log subscriber")]
    SubscriberInstall {
        /// Requested output format.
        format: LogFormat,
        /// Underlying subscriber error.
        #[source]
        source: TryInitError,
    },
    /// A cycle metric could not be built or registered.
    #[error("failed to register metric")]
    Metric {
        /// Metric name.
        name: &'static str,
        /// Underlying Prometheus error.
        #[source]
        source: PrometheusError,
    },
    /// The registry could not be rendered for `/metrics`.
    #[error("failed to render metrics")]
    Render {
        /// Metric families gathered before encoding.
        families: usize,
        /// Underlying Prometheus error.
        #[source]
        source: PrometheusError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn metric_errors_name_the_metric() {
        let err = TelemetryError::Metric {
            name: "strikes_total",
            source: PrometheusError::AlreadyReg,
        };
        assert_eq!(err.to_string(), "failed to register metric");
        assert!(err.source().is_some());
        assert!(format!("{err:?}").contains("strikes_total"));
    }

    #[test]
    fn render_errors_keep_source() {
        let err = TelemetryError::Render {
            families: 3,
            source: PrometheusError::Msg("bad label".into()),
        };
        assert_eq!(err.to_string(), "failed to render metrics");
        assert_eq!(
            err.source().map(ToString::to_string).as_deref(),
            Some("bad label")
        );
    }
}
