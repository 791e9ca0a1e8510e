//! Command-line flags for the daemon. Every flag can also be supplied through
//! a `CULLER_*` environment variable.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use culler_config::{
    CullerConfig, DEFAULT_CYCLES, DEFAULT_INTERVAL_SECS, DEFAULT_LOG_LEVEL,
    DEFAULT_RPC_TIMEOUT_SECS, DEFAULT_TRANSMISSION_URL, LoggingSettings, PolicySettings,
    TransmissionSettings,
};

/// Output format for log records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    /// Structured JSON lines.
    Json,
    /// Human-readable output.
    Pretty,
}

impl LogFormatArg {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Pretty => "pretty",
        }
    }
}

/// Removes Transmission torrents that stay stalled or finished for too many cycles.
#[derive(Debug, Parser)]
#[command(name = "culler", version, about)]
pub struct Cli {
    /// Transmission RPC endpoint.
    #[arg(long, env = "CULLER_TRANSMISSION_URL", default_value = DEFAULT_TRANSMISSION_URL)]
    pub transmission_url: String,
    /// Basic-auth username for the RPC endpoint.
    #[arg(long, env = "CULLER_TRANSMISSION_USERNAME")]
    pub transmission_username: Option<String>,
    /// Basic-auth password for the RPC endpoint.
    #[arg(long, env = "CULLER_TRANSMISSION_PASSWORD", hide_env_values = true)]
    pub transmission_password: Option<String>,
    /// Bound on every RPC call, in seconds.
    #[arg(long, env = "CULLER_RPC_TIMEOUT_SECS", default_value_t = DEFAULT_RPC_TIMEOUT_SECS)]
    pub rpc_timeout_secs: u64,
    /// Remove finished torrents once they reach the strike threshold.
    #[arg(long, env = "CULLER_REMOVE_FINISHED")]
    pub remove_finished: bool,
    /// Remove stalled torrents (and their data) once they reach the strike threshold.
    #[arg(long, env = "CULLER_REMOVE_STALLED")]
    pub remove_stalled: bool,
    /// JSON or YAML schema; torrents over the threshold are removed when they match it.
    #[arg(long, env = "CULLER_REMOVE_PREDICATE", value_name = "FILE")]
    pub remove_predicate: Option<PathBuf>,
    /// JSON or YAML schema; matching torrents are skipped and their strikes forgotten.
    #[arg(long, env = "CULLER_IGNORE_PREDICATE", value_name = "FILE")]
    pub ignore_predicate: Option<PathBuf>,
    /// Consecutive cycles a condition must hold before removal.
    #[arg(long, env = "CULLER_CYCLES", default_value_t = DEFAULT_CYCLES)]
    pub cycles: u64,
    /// Seconds between cycles.
    #[arg(
        long,
        alias = "timeout",
        env = "CULLER_INTERVAL_SECS",
        default_value_t = DEFAULT_INTERVAL_SECS
    )]
    pub interval_secs: u64,
    /// Log filter used when `RUST_LOG` is unset.
    #[arg(long, env = "CULLER_LOG_LEVEL", default_value = DEFAULT_LOG_LEVEL)]
    pub log_level: String,
    /// Log output format; inferred from the build profile when omitted.
    #[arg(long, env = "CULLER_LOG_FORMAT", value_enum)]
    pub log_format: Option<LogFormatArg>,
    /// Serve `/metrics` and `/health` on this address.
    #[arg(long, env = "CULLER_METRICS_BIND", value_name = "ADDR")]
    pub metrics_bind: Option<String>,
}

impl Cli {
    /// Convert parsed flags into the settings model.
    #[must_use]
    pub fn into_config(self) -> CullerConfig {
        CullerConfig {
            transmission: TransmissionSettings {
                url: self.transmission_url,
                username: self.transmission_username,
                password: self.transmission_password,
                rpc_timeout_secs: self.rpc_timeout_secs,
            },
            policy: PolicySettings {
                cycles: self.cycles,
                remove_finished: self.remove_finished,
                remove_stalled: self.remove_stalled,
                remove_predicate: self.remove_predicate,
                ignore_predicate: self.ignore_predicate,
            },
            interval_secs: self.interval_secs,
            logging: LoggingSettings {
                level: self.log_level,
                format: self.log_format.map(|format| format.as_str().to_string()),
            },
            metrics_bind: self.metrics_bind,
        }
    }
}
