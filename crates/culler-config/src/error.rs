//! Error types for configuration handling.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while validating settings or loading predicate documents.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Field contained an invalid value.
    #[error("invalid configuration field")]
    InvalidField {
        /// Section that failed validation.
        section: &'static str,
        /// Field that failed validation.
        field: &'static str,
        /// Offending value when available.
        value: Option<String>,
        /// Machine-readable reason for the failure.
        reason: &'static str,
    },
    /// Predicate file extension is not recognised.
    #[error("unsupported predicate file format")]
    UnsupportedPredicateFormat {
        /// Offending file.
        path: PathBuf,
    },
    /// Predicate file could not be read.
    #[error("failed to read predicate file")]
    PredicateRead {
        /// Offending file.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// Predicate file could not be parsed.
    #[error("failed to parse predicate file")]
    PredicateParse {
        /// Offending file.
        path: PathBuf,
        /// Format the file was parsed as.
        format: &'static str,
        /// Parser diagnostic.
        detail: String,
    },
}

/// Convenience alias for configuration results.
pub type ConfigResult<T> = Result<T, ConfigError>;

impl ConfigError {
    pub(crate) fn invalid(
        section: &'static str,
        field: &'static str,
        value: Option<String>,
        reason: &'static str,
    ) -> Self {
        Self::InvalidField {
            section,
            field,
            value,
            reason,
        }
    }
}
