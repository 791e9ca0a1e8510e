//! Error types for the Transmission adapter.

use thiserror::Error;

/// Failures talking to the Transmission RPC endpoint.
#[derive(Debug, Error)]
pub enum TransmissionError {
    /// The HTTP client could not be constructed.
    #[error("failed to build transmission http client")]
    ClientBuild {
        /// Underlying reqwest failure.
        #[source]
        source: reqwest::Error,
    },
    /// The request never produced a response.
    #[error("transmission request failed")]
    Request {
        /// RPC method being invoked.
        method: &'static str,
        /// Underlying transport failure.
        #[source]
        source: reqwest::Error,
    },
    /// A 409 arrived without a session id to retry with.
    #[error("transmission rejected the session without issuing a new id")]
    MissingSessionId {
        /// RPC method being invoked.
        method: &'static str,
    },
    /// The endpoint answered with a non-success HTTP status.
    #[error("transmission returned an unexpected http status")]
    Status {
        /// RPC method being invoked.
        method: &'static str,
        /// HTTP status code.
        status: u16,
    },
    /// The response body was not a valid RPC envelope.
    #[error("failed to decode transmission response")]
    Decode {
        /// RPC method being invoked.
        method: &'static str,
        /// Underlying decode failure.
        #[source]
        source: reqwest::Error,
    },
    /// The RPC envelope reported a failure.
    #[error("transmission rpc call failed")]
    Rpc {
        /// RPC method being invoked.
        method: &'static str,
        /// `result` string returned by the daemon.
        result: String,
    },
    /// A successful reply carried no `arguments` object.
    #[error("rpc response is missing its arguments")]
    MissingArguments {
        /// RPC method being invoked.
        method: &'static str,
    },
    /// A torrent entry lacked a required field.
    #[error("torrent entry is missing a required field")]
    MissingField {
        /// Field name.
        field: &'static str,
    },
}

/// Convenience alias for adapter results.
pub type TransmissionResult<T> = Result<T, TransmissionError>;
