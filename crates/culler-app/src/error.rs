//! # Design
//!
//! - Centralize daemon-level errors for startup and shutdown.
//! - Keep error messages constant while carrying context fields for debugging.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias for application operations.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration was invalid.
    #[error("configuration operation failed")]
    Config {
        /// Operation identifier.
        operation: &'static str,
        /// Source configuration error.
        source: culler_config::ConfigError,
    },
    /// A predicate document did not compile.
    #[error("predicate compilation failed")]
    Predicate {
        /// Path of the offending document.
        path: PathBuf,
        /// Source predicate error.
        source: culler_predicate::PredicateError,
    },
    /// Telemetry operations failed.
    #[error("telemetry operation failed")]
    Telemetry {
        /// Operation identifier.
        operation: &'static str,
        /// Source telemetry error.
        source: culler_telemetry::TelemetryError,
    },
    /// Transmission client setup failed.
    #[error("transmission client setup failed")]
    Transmission {
        /// Operation identifier.
        operation: &'static str,
        /// Source transmission error.
        source: culler_transmission::TransmissionError,
    },
    /// IO operations failed.
    #[error("io operation failed")]
    Io {
        /// Operation identifier.
        operation: &'static str,
        /// Source IO error.
        source: io::Error,
    },
}

impl AppError {
    pub(crate) const fn config(operation: &'static str, source: culler_config::ConfigError) -> Self {
        Self::Config { operation, source }
    }

    pub(crate) const fn telemetry(
        operation: &'static str,
        source: culler_telemetry::TelemetryError,
    ) -> Self {
        Self::Telemetry { operation, source }
    }

    pub(crate) const fn transmission(
        operation: &'static str,
        source: culler_transmission::TransmissionError,
    ) -> Self {
        Self::Transmission { operation, source }
    }

    pub(crate) const fn io(operation: &'static str, source: io::Error) -> Self {
        Self::Io { operation, source }
    }
}
