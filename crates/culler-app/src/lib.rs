#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls
)]
#![warn(missing_docs, unreachable_pub)]

//! Culler daemon wiring.
//!
//! Layout: `cli.rs` (flags and environment), `bootstrap.rs` (service wiring),
//! `scheduler.rs` (cancellable fixed-interval loop), `daemon.rs` (per-cycle
//! task), `http.rs` (metrics and health listener), `error.rs`.

/// Application bootstrap.
pub mod bootstrap;
/// Command-line surface.
pub mod cli;
/// Per-cycle task driving the eviction engine.
pub mod daemon;
/// Application error type.
pub mod error;
/// Metrics and health endpoints.
pub mod http;
/// Cancellable periodic scheduler.
pub mod scheduler;

pub use bootstrap::{run_app, run_app_with};
pub use cli::Cli;
pub use daemon::EvictionDaemon;
pub use error::{AppError, AppResult};
pub use scheduler::{PeriodicTask, run_periodic};
