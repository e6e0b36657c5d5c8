use std::collections::BTreeMap;

use serde_json::Value;

/// Reference to a rendered graph node as the panel sees it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeRef {
    /// Identifier the data layer knows the node by.
    pub id: String,

    /// Text shown in the UI for this node.
    pub label: String,
}

impl NodeRef {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// Time-slider widget state. The slider is redrawn from this record every
/// frame; updating the widget means updating the record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeSlider {
    /// Highest selectable index, `time_options.len() - 1` for a non-empty list.
    pub max: usize,

    /// Currently selected index.
    pub value: usize,

    /// Formatted date of the selected snapshot.
    pub label: String,
}

/// The whole of the panel's mutable UI state. Owned by [`Panel`](crate::Panel),
/// mutated only through its methods, read by the view every frame.
#[derive(Debug, Clone, Default)]
pub struct PanelState {
    /// Active tab index.
    pub current_tab: usize,

    /// Force-directed layout currently running.
    pub force_on: bool,

    /// Restrict the view to the connected component of the selection.
    pub component_mode: bool,

    /// Selectable dataset names.
    pub options: Vec<String>,

    /// Snapshot keys per dataset, keyed by `"public/" + name`.
    pub full_options: BTreeMap<String, Vec<String>>,

    /// Selected dataset name, empty when none is selected.
    pub current_option: String,

    /// Selected snapshot key, empty when none is selected.
    pub current_time: String,

    /// Labels for the selected dataset's snapshots, first path segment stripped.
    pub time_options: Vec<String>,

    /// Render labels for every node, not just hovered ones.
    pub show_all_labels: bool,

    /// Node selected in the rendered graph.
    pub selected_node: Option<NodeRef>,

    /// Highlighted path. Non-empty whenever present.
    pub selected_path: Option<Vec<NodeRef>>,

    /// Metadata shown for the current selection.
    pub basic_info: BTreeMap<String, Value>,

    /// Link data shown for the current selection.
    pub links: BTreeMap<String, Value>,

    /// Contents of the search box.
    pub search_term: String,

    /// Time-slider widget state.
    pub slider: TimeSlider,
}

impl PanelState {
    pub fn new() -> Self {
        Self::default()
    }
}
