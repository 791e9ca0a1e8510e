//! HTTP transport for the Transmission RPC endpoint.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use culler_torrent_core::{TorrentId, TorrentRecord, TorrentRemover, TorrentSource};
use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info};
use url::Url;

use crate::error::{TransmissionError, TransmissionResult};
use crate::rpc::{
    RESULT_SUCCESS, RpcRequest, RpcResponse, TORRENT_GET, TORRENT_REMOVE, TorrentGetArguments,
    TorrentGetResult, TorrentRemoveArguments, into_record,
};

/// Header carrying the CSRF session token.
pub const SESSION_ID_HEADER: &str = "X-Transmission-Session-Id";
/// Default bound on a single HTTP exchange.
pub const DEFAULT_RPC_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for [`TransmissionClient`].
#[derive(Clone, PartialEq, Eq)]
pub struct TransmissionConfig {
    /// RPC endpoint.
    pub url: Url,
    /// Basic-auth username.
    pub username: Option<String>,
    /// Basic-auth password.
    pub password: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl fmt::Debug for TransmissionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransmissionConfig")
            .field("url", &self.url.as_str())
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl TransmissionConfig {
    /// Settings for `url` with no credentials and the default timeout.
    #[must_use]
    pub const fn new(url: Url) -> Self {
        Self {
            url,
            username: None,
            password: None,
            timeout: DEFAULT_RPC_TIMEOUT,
        }
    }
}

/// Transmission RPC client acting as torrent source and removal sink.
pub struct TransmissionClient {
    http: Client,
    endpoint: Url,
    username: Option<String>,
    password: Option<String>,
    session_id: RwLock<Option<String>>,
}

impl fmt::Debug for TransmissionClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransmissionClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl TransmissionClient {
    /// Build a client from `config`.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be constructed.
    pub fn new(config: TransmissionConfig) -> TransmissionResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|source| TransmissionError::ClientBuild { source })?;
        Ok(Self {
            http,
            endpoint: config.url,
            username: config.username,
            password: config.password,
            session_id: RwLock::new(None),
        })
    }

    /// Endpoint this client talks to.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// List every torrent with the fields in [`crate::rpc::TORRENT_FIELDS`].
    ///
    /// # Errors
    ///
    /// Returns an error when the call fails or an entry cannot be converted.
    pub async fn torrents(&self) -> TransmissionResult<Vec<TorrentRecord>> {
        let result: TorrentGetResult = self
            .call(TORRENT_GET, TorrentGetArguments::default())
            .await?
            .ok_or(TransmissionError::MissingArguments {
                method: TORRENT_GET,
            })?;
        let records = result
            .torrents
            .into_iter()
            .map(into_record)
            .collect::<TransmissionResult<Vec<_>>>()?;
        debug!(torrents = records.len(), "fetched torrents from transmission");
        Ok(records)
    }

    /// Remove a single torrent.
    ///
    /// # Errors
    ///
    /// Returns an error when the daemon does not confirm the removal.
    pub async fn remove_torrent(&self, id: TorrentId, delete_data: bool) -> TransmissionResult<()> {
        let arguments = TorrentRemoveArguments {
            ids: vec![id],
            delete_local_data: delete_data,
        };
        let _: Option<Value> = self.call(TORRENT_REMOVE, arguments).await?;
        info!(torrent_id = %id, delete_data, "transmission removed torrent");
        Ok(())
    }

    async fn call<A, R>(&self, method: &'static str, arguments: A) -> TransmissionResult<Option<R>>
    where
        A: Serialize + Sync,
        R: DeserializeOwned,
    {
        let request = RpcRequest { method, arguments };
        let mut response = self.send(method, &request).await?;

        if response.status() == StatusCode::CONFLICT {
            let session_id = response
                .headers()
                .get(SESSION_ID_HEADER)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned)
                .ok_or(TransmissionError::MissingSessionId { method })?;
            debug!(method, "refreshing transmission session id");
            *self.session_id.write().await = Some(session_id);
            response = self.send(method, &request).await?;
        }

        let status = response.status();
        if !status.is_success() {
            return Err(TransmissionError::Status {
                method,
                status: status.as_u16(),
            });
        }

        let envelope: RpcResponse<R> = response
            .json()
            .await
            .map_err(|source| TransmissionError::Decode { method, source })?;
        if envelope.result != RESULT_SUCCESS {
            return Err(TransmissionError::Rpc {
                method,
                result: envelope.result,
            });
        }
        Ok(envelope.arguments)
    }

    async fn send<A: Serialize + Sync>(
        &self,
        method: &'static str,
        request: &RpcRequest<'_, A>,
    ) -> TransmissionResult<Response> {
        let session_id = self.session_id.read().await.clone();
        let mut builder = self.http.post(self.endpoint.clone()).json(request);
        if let Some(session_id) = session_id {
            builder = builder.header(SESSION_ID_HEADER, session_id);
        }
        if let Some(username) = &self.username {
            builder = builder.basic_auth(username, self.password.as_ref());
        }
        builder
            .send()
            .await
            .map_err(|source| TransmissionError::Request { method, source })
    }
}

#[async_trait]
impl TorrentSource for TransmissionClient {
    async fn fetch_all(&self) -> anyhow::Result<Vec<TorrentRecord>> {
        Ok(self.torrents().await?)
    }
}

#[async_trait]
impl TorrentRemover for TransmissionClient {
    async fn remove(&self, id: TorrentId, delete_data: bool) -> anyhow::Result<()> {
        Ok(self.remove_torrent(id, delete_data).await?)
    }
}
