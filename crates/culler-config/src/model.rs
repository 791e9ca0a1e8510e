//! Typed daemon settings.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::defaults::{
    DEFAULT_CYCLES, DEFAULT_INTERVAL_SECS, DEFAULT_LOG_LEVEL, DEFAULT_RPC_TIMEOUT_SECS,
    DEFAULT_TRANSMISSION_URL, MAX_INTERVAL_SECS, MAX_RPC_TIMEOUT_SECS,
};
use crate::error::ConfigResult;
use crate::validate::{
    ensure_at_most, ensure_credentials, ensure_log_format, ensure_positive, parse_bind_addr,
    parse_http_url,
};

/// Connection settings for the Transmission daemon.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransmissionSettings {
    /// RPC endpoint.
    pub url: String,
    /// Basic-auth username.
    pub username: Option<String>,
    /// Basic-auth password.
    #[serde(skip_serializing)]
    pub password: Option<String>,
    /// Bound on every RPC call, in seconds.
    pub rpc_timeout_secs: u64,
}

impl Default for TransmissionSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_TRANSMISSION_URL.to_string(),
            username: None,
            password: None,
            rpc_timeout_secs: DEFAULT_RPC_TIMEOUT_SECS,
        }
    }
}

impl std::fmt::Debug for TransmissionSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransmissionSettings")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("rpc_timeout_secs", &self.rpc_timeout_secs)
            .finish()
    }
}

/// Strike threshold, removal switches, and predicate files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicySettings {
    /// Strikes required before removal.
    pub cycles: u64,
    /// Remove finished torrents without consulting the remove predicate.
    pub remove_finished: bool,
    /// Remove stalled torrents without consulting the remove predicate.
    pub remove_stalled: bool,
    /// Schema document authorizing removal.
    pub remove_predicate: Option<PathBuf>,
    /// Schema document excluding torrents from processing.
    pub ignore_predicate: Option<PathBuf>,
}

impl Default for PolicySettings {
    fn default() -> Self {
        Self {
            cycles: DEFAULT_CYCLES,
            remove_finished: false,
            remove_stalled: false,
            remove_predicate: None,
            ignore_predicate: None,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Filter used when `RUST_LOG` is unset.
    pub level: String,
    /// `json` or `pretty`; inferred from the build profile when absent.
    pub format: Option<String>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            format: None,
        }
    }
}

/// Complete daemon configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CullerConfig {
    /// Transmission connection.
    pub transmission: TransmissionSettings,
    /// Eviction policy.
    pub policy: PolicySettings,
    /// Seconds between cycles.
    pub interval_secs: u64,
    /// Logging.
    pub logging: LoggingSettings,
    /// Address for the `/metrics` and `/health` listener.
    pub metrics_bind: Option<String>,
}

impl Default for CullerConfig {
    fn default() -> Self {
        Self {
            transmission: TransmissionSettings::default(),
            policy: PolicySettings::default(),
            interval_secs: DEFAULT_INTERVAL_SECS,
            logging: LoggingSettings::default(),
            metrics_bind: None,
        }
    }
}

impl CullerConfig {
    /// Check every field.
    ///
    /// # Errors
    ///
    /// Returns the first invalid field encountered.
    pub fn validate(&self) -> ConfigResult<()> {
        self.transmission_url()?;
        ensure_credentials(
            "transmission",
            self.transmission.username.as_deref(),
            self.transmission.password.as_deref(),
        )?;
        let rpc_timeout = ensure_positive(
            "transmission",
            "rpc_timeout_secs",
            self.transmission.rpc_timeout_secs,
        )?;
        ensure_at_most(
            "transmission",
            "rpc_timeout_secs",
            rpc_timeout,
            MAX_RPC_TIMEOUT_SECS,
        )?;
        ensure_positive("policy", "cycles", self.policy.cycles)?;
        let interval = ensure_positive("schedule", "interval_secs", self.interval_secs)?;
        ensure_at_most("schedule", "interval_secs", interval, MAX_INTERVAL_SECS)?;
        if let Some(format) = &self.logging.format {
            ensure_log_format("logging", "format", format)?;
        }
        self.metrics_addr()?;
        Ok(())
    }

    /// Parsed Transmission endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error when the URL is invalid.
    pub fn transmission_url(&self) -> ConfigResult<Url> {
        parse_http_url("transmission", "url", &self.transmission.url)
    }

    /// Bound on every RPC call.
    #[must_use]
    pub const fn rpc_timeout(&self) -> Duration {
        Duration::from_secs(self.transmission.rpc_timeout_secs)
    }

    /// Time between cycles.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// Parsed metrics listener address, if configured.
    ///
    /// # Errors
    ///
    /// Returns an error when the address is invalid.
    pub fn metrics_addr(&self) -> ConfigResult<Option<SocketAddr>> {
        self.metrics_bind
            .as_deref()
            .map(|raw| parse_bind_addr("metrics", "bind", raw))
            .transpose()
    }
}
