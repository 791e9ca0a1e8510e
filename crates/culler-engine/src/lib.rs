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

//! Strike-based eviction engine.
//!
//! Layout: `ledger.rs` (per-torrent strike counters), `policy.rs` (threshold
//! and removal switches), `engine.rs` (per-cycle algorithm), `error.rs`.

pub mod engine;
pub mod error;
pub mod ledger;
pub mod policy;

pub use engine::{CycleReport, EvictionEngine, RemovalOutcome};
pub use error::{EngineError, EngineResult};
pub use ledger::{StrikeEntry, StrikeLedger};
pub use policy::{DEFAULT_CALL_TIMEOUT, DEFAULT_THRESHOLD, EvictionPolicy};
