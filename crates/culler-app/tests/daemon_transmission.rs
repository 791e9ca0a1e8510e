//! Daemon cycles against a mocked Transmission endpoint.

use std::sync::Arc;

use culler_app::{EvictionDaemon, PeriodicTask};
use culler_engine::{EvictionEngine, EvictionPolicy};
use culler_telemetry::Metrics;
use culler_torrent_core::{StrikeCondition, TorrentId};
use culler_transmission::rpc::TORRENT_FIELDS;
use culler_transmission::{SESSION_ID_HEADER, TransmissionClient, TransmissionConfig};
use httpmock::Method::POST;
use httpmock::MockServer;
use serde_json::json;

const RPC_PATH: &str = "/transmission/rpc";

#[tokio::test]
async fn stalled_torrent_is_removed_with_its_data_after_threshold() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(POST)
            .path(RPC_PATH)
            .header_missing(SESSION_ID_HEADER);
        then.status(409).header(SESSION_ID_HEADER, "session-a");
    });
    let listing = server.mock(|when, then| {
        when.method(POST)
            .path(RPC_PATH)
            .header(SESSION_ID_HEADER, "session-a")
            .json_body(json!({ "method": "torrent-get", "arguments": { "fields": TORRENT_FIELDS } }));
        then.status(200).json_body(json!({
            "result": "success",
            "arguments": { "torrents": [
                { "id": 7, "name": "stuck.iso", "isStalled": true, "isFinished": false },
                { "id": 8, "name": "healthy.iso", "isStalled": false, "isFinished": false }
            ]}
        }));
    });
    let removal = server.mock(|when, then| {
        when.method(POST)
            .path(RPC_PATH)
            .header(SESSION_ID_HEADER, "session-a")
            .json_body(json!({
                "method": "torrent-remove",
                "arguments": { "ids": [7], "delete-local-data": true }
            }));
        then.status(200)
            .json_body(json!({ "result": "success", "arguments": {} }));
    });

    let client = Arc::new(TransmissionClient::new(TransmissionConfig::new(
        server.url(RPC_PATH).parse()?,
    ))?);
    let engine = EvictionEngine::new(
        EvictionPolicy {
            threshold: 2,
            remove_stalled: true,
            ..EvictionPolicy::default()
        },
        Metrics::new()?,
    );
    let mut daemon = EvictionDaemon::new(engine, client.clone(), client);

    daemon.run_once().await;
    removal.assert_calls_async(0).await;
    assert_eq!(daemon.ledger().get(TorrentId(7), StrikeCondition::Stalled), 1);

    daemon.run_once().await;
    removal.assert_calls_async(1).await;
    listing.assert_calls_async(2).await;
    assert_eq!(daemon.ledger().get(TorrentId(8), StrikeCondition::Stalled), 0);
    assert!(daemon.ledger().contains(TorrentId(8)));
    Ok(())
}
