//! Transmission RPC payloads.

use culler_torrent_core::{TorrentId, TorrentRecord};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::TransmissionError;

/// Method name for listing torrents.
pub const TORRENT_GET: &str = "torrent-get";
/// Method name for removing torrents.
pub const TORRENT_REMOVE: &str = "torrent-remove";
/// `result` value reported by successful calls.
pub const RESULT_SUCCESS: &str = "success";

/// Fields requested from `torrent-get`; every one is kept as a record attribute.
pub const TORRENT_FIELDS: &[&str] = &[
    "id",
    "name",
    "hashString",
    "status",
    "isFinished",
    "isStalled",
    "percentDone",
    "uploadRatio",
    "addedDate",
    "doneDate",
    "activityDate",
    "secondsSeeding",
    "totalSize",
    "downloadDir",
    "error",
    "errorString",
    "labels",
    "peersConnected",
    "rateDownload",
    "rateUpload",
];

/// Request envelope.
#[derive(Debug, Serialize)]
pub struct RpcRequest<'a, A> {
    /// RPC method.
    pub method: &'a str,
    /// Method arguments.
    pub arguments: A,
}

/// Response envelope.
#[derive(Debug, Deserialize)]
pub struct RpcResponse<A> {
    /// `"success"` or an error description.
    pub result: String,
    /// Method results; absent on some failures.
    pub arguments: Option<A>,
}

/// Arguments for `torrent-get`.
#[derive(Debug, Serialize)]
pub struct TorrentGetArguments {
    /// Fields to return per torrent.
    pub fields: &'static [&'static str],
}

impl Default for TorrentGetArguments {
    fn default() -> Self {
        Self {
            fields: TORRENT_FIELDS,
        }
    }
}

/// Results of `torrent-get`.
#[derive(Debug, Deserialize)]
pub struct TorrentGetResult {
    /// Raw torrent objects.
    #[serde(default)]
    pub torrents: Vec<Map<String, Value>>,
}

/// Arguments for `torrent-remove`.
#[derive(Debug, Serialize)]
pub struct TorrentRemoveArguments {
    /// Torrents to remove.
    pub ids: Vec<TorrentId>,
    /// Whether downloaded data is deleted too.
    #[serde(rename = "delete-local-data")]
    pub delete_local_data: bool,
}

/// Convert a raw `torrent-get` entry into a record, keeping every field as an attribute.
///
/// # Errors
///
/// Returns [`TransmissionError::MissingField`] when `id` is absent or not an integer.
pub fn into_record(raw: Map<String, Value>) -> Result<TorrentRecord, TransmissionError> {
    let id = raw
        .get("id")
        .and_then(Value::as_i64)
        .ok_or(TransmissionError::MissingField { field: "id" })?;
    let name = raw
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let is_finished = flag(&raw, "isFinished");
    let is_stalled = flag(&raw, "isStalled");

    let mut record = TorrentRecord::new(id, name)
        .finished(is_finished)
        .stalled(is_stalled);
    record.attributes = raw;
    Ok(record)
}

fn flag(raw: &Map<String, Value>, key: &str) -> bool {
    raw.get(key).and_then(Value::as_bool).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn record_keeps_attributes_and_flags() -> Result<(), TransmissionError> {
        let record = into_record(object(json!({
            "id": 7,
            "name": "ubuntu.iso",
            "isFinished": true,
            "isStalled": false,
            "uploadRatio": 1.5
        })))?;
        assert_eq!(record.id, TorrentId(7));
        assert_eq!(record.name, "ubuntu.iso");
        assert!(record.is_finished);
        assert!(!record.is_stalled);
        assert_eq!(record.attribute("uploadRatio"), Some(&json!(1.5)));
        Ok(())
    }

    #[test]
    fn missing_flags_default_to_false() -> Result<(), TransmissionError> {
        let record = into_record(object(json!({ "id": 1 })))?;
        assert!(!record.is_finished && !record.is_stalled);
        assert!(record.name.is_empty());
        Ok(())
    }

    #[test]
    fn missing_id_is_rejected() {
        let err = into_record(object(json!({ "name": "orphan" }))).expect_err("no id");
        assert!(matches!(err, TransmissionError::MissingField { field: "id" }));
    }

    #[test]
    fn absent_arguments_decode_as_none() -> serde_json::Result<()> {
        let response: RpcResponse<TorrentGetResult> =
            serde_json::from_value(json!({ "result": "success" }))?;
        assert_eq!(response.result, RESULT_SUCCESS);
        assert!(response.arguments.is_none());
        Ok(())
    }

    #[test]
    fn remove_arguments_use_rpc_names() -> serde_json::Result<()> {
        let request = RpcRequest {
            method: TORRENT_REMOVE,
            arguments: TorrentRemoveArguments {
                ids: vec![TorrentId(3)],
                delete_local_data: true,
            },
        };
        assert_eq!(
            serde_json::to_value(&request)?,
            json!({
                "method": "torrent-remove",
                "arguments": { "ids": [3], "delete-local-data": true }
            })
        );
        Ok(())
    }
}
