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

//! Torrent predicates expressed as JSON Schema documents.
//!
//! A record matches when its document (see
//! [`culler_torrent_core::TorrentRecord::to_document`]) validates against
//! the compiled schema.

pub mod error;
pub mod schema;

pub use error::PredicateError;
pub use schema::SchemaPredicate;
