//! Core torrent domain types shared across the workspace.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Backend-assigned torrent identifier, unique within a single observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TorrentId(pub i64);

impl Display for TorrentId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, formatter)
    }
}

impl From<i64> for TorrentId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// Conditions that accumulate strikes across cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrikeCondition {
    /// Content is fully downloaded.
    Finished,
    /// Transfer is making no progress.
    Stalled,
}

impl StrikeCondition {
    /// Conditions in evaluation order; finished is always decided before stalled.
    pub const ALL: [Self; 2] = [Self::Finished, Self::Stalled];

    /// Stable label used in logs and metrics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Finished => "finished",
            Self::Stalled => "stalled",
        }
    }

    /// Whether removing a torrent for this condition also deletes its data.
    #[must_use]
    pub const fn deletes_data(self) -> bool {
        match self {
            Self::Finished => false,
            Self::Stalled => true,
        }
    }

    /// Whether the record currently reports this condition.
    #[must_use]
    pub const fn holds_for(self, record: &TorrentRecord) -> bool {
        match self {
            Self::Finished => record.is_finished,
            Self::Stalled => record.is_stalled,
        }
    }
}

impl Display for StrikeCondition {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Snapshot of a single torrent as reported by the backend for one cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TorrentRecord {
    /// Backend identifier.
    pub id: TorrentId,
    /// Display name.
    pub name: String,
    /// Backend reports the content as fully downloaded.
    pub is_finished: bool,
    /// Backend reports the transfer as stalled.
    pub is_stalled: bool,
    /// Every other field reported by the backend, keyed by its wire name.
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

impl TorrentRecord {
    /// Construct a record without additional attributes.
    #[must_use]
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id: TorrentId(id),
            name: name.into(),
            is_finished: false,
            is_stalled: false,
            attributes: Map::new(),
        }
    }

    /// Set the finished flag.
    #[must_use]
    pub fn finished(mut self, value: bool) -> Self {
        self.is_finished = value;
        self
    }

    /// Set the stalled flag.
    #[must_use]
    pub fn stalled(mut self, value: bool) -> Self {
        self.is_stalled = value;
        self
    }

    /// Attach an additional attribute.
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Look up a backend attribute by wire name.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// JSON document handed to predicate evaluators.
    ///
    /// The fixed fields (`id`, `name`, `isFinished`, `isStalled`) always
    /// override attributes of the same name.
    #[must_use]
    pub fn to_document(&self) -> Value {
        let mut document = self.attributes.clone();
        document.insert("id".to_string(), Value::from(self.id.0));
        document.insert("name".to_string(), Value::from(self.name.clone()));
        document.insert("isFinished".to_string(), Value::Bool(self.is_finished));
        document.insert("isStalled".to_string(), Value::Bool(self.is_stalled));
        Value::Object(document)
    }
}

/// Instruction handed to the removal sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovalCommand {
    /// Torrent to remove.
    pub id: TorrentId,
    /// Display name, kept for logging.
    pub name: String,
    /// Condition that triggered the removal.
    pub condition: StrikeCondition,
    /// Whether downloaded data is deleted alongside the torrent.
    pub delete_data: bool,
}

impl RemovalCommand {
    /// Build the removal command for `record` triggered by `condition`.
    #[must_use]
    pub fn for_condition(record: &TorrentRecord, condition: StrikeCondition) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            condition,
            delete_data: condition.deletes_data(),
        }
    }
}
