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

//! Daemon configuration.
//!
//! Layout: `defaults.rs` (default values), `model.rs` (typed settings),
//! `validate.rs` (field checks and parsing helpers), `loader.rs` (predicate
//! documents from JSON or YAML files), `error.rs`.

pub mod defaults;
pub mod error;
pub mod loader;
pub mod model;
pub mod validate;

pub use defaults::{
    DEFAULT_CYCLES, DEFAULT_INTERVAL_SECS, DEFAULT_LOG_LEVEL, DEFAULT_RPC_TIMEOUT_SECS,
    DEFAULT_TRANSMISSION_URL, MAX_INTERVAL_SECS, MAX_RPC_TIMEOUT_SECS,
};
pub use error::{ConfigError, ConfigResult};
pub use loader::{PredicateFormat, load_predicate_document};
pub use model::{CullerConfig, LoggingSettings, PolicySettings, TransmissionSettings};
