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

//! Transmission RPC adapter.
//!
//! Layout: `client.rs` (HTTP transport, session handshake, trait impls),
//! `rpc.rs` (request/response payloads and record conversion), `error.rs`.

pub mod client;
pub mod error;
pub mod rpc;

pub use client::{DEFAULT_RPC_TIMEOUT, SESSION_ID_HEADER, TransmissionClient, TransmissionConfig};
pub use error::{TransmissionError, TransmissionResult};
