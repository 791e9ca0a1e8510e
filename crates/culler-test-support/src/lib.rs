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

//! Shared test helpers used across crate and integration suites.
//! Layout: fixtures.rs (record builders), mocks.rs (scripted sources, recording removers, canned predicates).

pub mod fixtures;
pub mod mocks;

pub use fixtures::{finished, idle, stalled};
pub use mocks::{
    FailingPredicate, HangingRemover, HangingSource, IdPredicate, RecordingRemover,
    ScriptedSource, StaticPredicate,
};
