use std::collections::BTreeMap;
use std::fmt;

use crossbeam::channel::{unbounded, Receiver, Sender};
use serde::Deserialize;
use serde_json::Value;

/// Creates the channel loader implementations report completions on. The
/// receiving half goes to [`Panel::new`](crate::Panel::new); the sending half
/// goes to whatever backs [`DataLoader`](crate::DataLoader).
pub fn event_channel() -> (Sender<LoaderEvent>, Receiver<LoaderEvent>) {
    unbounded()
}

/// Generation stamp minted for every snapshot request and carried back by its
/// response. Responses stamped with an older generation than the panel's
/// current one are dropped on arrival, so a slow request can never overwrite
/// what a newer one put on screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestTicket(pub(crate) u64);

impl RequestTicket {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A completion from the data layer, drained by
/// [`Panel::poll`](crate::Panel::poll) once per frame.
#[derive(Debug, Clone)]
pub enum LoaderEvent {
    /// The dataset listing was (re)loaded.
    Options(Result<DatasetIndex, LoadError>),

    /// A dataset or time snapshot arrived for the request stamped `ticket`.
    Snapshot {
        ticket: RequestTicket,
        key: String,
        result: Result<Snapshot, LoadError>,
    },

    /// The administrative recompile request finished.
    Recompiled(Result<(), LoadError>),
}

/// Load failure with the failed key or endpoint in the message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadError(String);

impl LoadError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for LoadError {}

/// The dataset listing: snapshot keys per dataset, keyed `"public/" + name`.
///
/// `{"public/wikiA": ["wikiA/2020-01-01", "wikiA/2020-06-01"]}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct DatasetIndex(pub BTreeMap<String, Vec<String>>);

impl DatasetIndex {
    pub fn from_json(text: &str) -> Result<Self, LoadError> {
        serde_json::from_str(text).map_err(|e| LoadError::new(format!("invalid json: {e}")))
    }
}

/// One versioned state of a dataset, as the data layer serves it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub nodes: Vec<SnapshotNode>,

    /// Edge list. The backend emits both `edges` and `links` spellings.
    #[serde(default, alias = "links")]
    pub edges: Vec<SnapshotEdge>,

    /// Snapshot-wide statistics displayed alongside the graph.
    #[serde(default)]
    pub basic: BTreeMap<String, Value>,
}

impl Snapshot {
    pub fn from_json(text: &str) -> Result<Self, LoadError> {
        serde_json::from_str(text).map_err(|e| LoadError::new(format!("invalid json: {e}")))
    }
}

/// A node with whatever per-node annotations the backend computed for it
/// (degree, parity, page rank and so on); unknown fields land in `stats`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SnapshotNode {
    pub id: String,

    #[serde(default)]
    pub label: Option<String>,

    #[serde(flatten)]
    pub stats: BTreeMap<String, Value>,
}

impl SnapshotNode {
    /// Text the UI shows for this node; falls back to the id.
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SnapshotEdge {
    pub source: String,
    pub target: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_index() {
        let text = r#"{"public/wikiA": ["wikiA/2020-01-01", "wikiA/2020-06-01"]}"#;
        let index = DatasetIndex::from_json(text).unwrap();
        assert_eq!(
            index.0.get("public/wikiA").unwrap(),
            &vec!["wikiA/2020-01-01".to_string(), "wikiA/2020-06-01".to_string()]
        );
    }

    #[test]
    fn parses_snapshot_with_links_alias() {
        let text = r#"{
            "nodes": [{"id": "a", "degree": 2}, {"id": "b", "label": "B"}],
            "links": [{"source": "a", "target": "b"}],
            "basic": {"nodeCount": 2}
        }"#;
        let snap = Snapshot::from_json(text).unwrap();
        assert_eq!(snap.nodes.len(), 2);
        assert_eq!(snap.edges.len(), 1);
        assert_eq!(snap.nodes[0].stats.get("degree").unwrap(), 2);
        assert_eq!(snap.nodes[0].display_label(), "a");
        assert_eq!(snap.nodes[1].display_label(), "B");
        assert_eq!(snap.basic.get("nodeCount").unwrap(), 2);
    }

    #[test]
    fn parses_snapshot_with_edges_spelling() {
        let text = r#"{"nodes": [], "edges": [{"source": "x", "target": "y"}]}"#;
        let snap = Snapshot::from_json(text).unwrap();
        assert_eq!(
            snap.edges,
            vec![SnapshotEdge {
                source: "x".to_string(),
                target: "y".to_string()
            }]
        );
    }

    #[test]
    fn invalid_json_is_reported() {
        let err = Snapshot::from_json("not-json").unwrap_err();
        assert!(err.message().contains("invalid json"));
    }
}
