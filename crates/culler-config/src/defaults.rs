//! Default values shared by the CLI and the settings model.

/// Transmission RPC endpoint used when none is configured.
pub const DEFAULT_TRANSMISSION_URL: &str = "http://localhost:9091/transmission/rpc";
/// Per-request RPC timeout in seconds.
pub const DEFAULT_RPC_TIMEOUT_SECS: u64 = 10;
/// Strikes required before removal.
pub const DEFAULT_CYCLES: u64 = 5;
/// Seconds between cycles.
pub const DEFAULT_INTERVAL_SECS: u64 = 30;
/// Longest accepted gap between cycles: one week.
pub const MAX_INTERVAL_SECS: u64 = 7 * 24 * 60 * 60;
/// Longest accepted RPC timeout: one hour.
pub const MAX_RPC_TIMEOUT_SECS: u64 = 60 * 60;
/// Log filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Accepted `log_format` names.
pub(crate) const LOG_FORMATS: &[&str] = &["json", "pretty"];
