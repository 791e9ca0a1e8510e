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

//! Backend-agnostic torrent records and the collaborator traits the eviction
//! engine drives.
//!
//! Layout: `model/` (records, conditions, removal commands), `service/`
//! (observation source, removal sink, predicate traits).

pub mod model;
pub mod service;

pub use model::{RemovalCommand, StrikeCondition, TorrentId, TorrentRecord};
pub use service::{TorrentPredicate, TorrentRemover, TorrentSource};
