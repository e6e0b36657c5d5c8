use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use egui::Pos2;
use egui_graphs::Graph;
use petgraph::algo::astar;
use petgraph::stable_graph::{DefaultIx, NodeIndex, StableGraph};
use petgraph::Directed;
use petgraph::Direction::{Incoming, Outgoing};
use rand::Rng;
use serde_json::Value;
use wikigraph_panel::{NodeRef, Snapshot};

pub type DisplayGraph = Graph<NodeInfo, (), Directed, DefaultIx>;

/// Payload carried by every rendered node.
#[derive(Debug, Clone, Default)]
pub struct NodeInfo {
    pub id: String,
    pub label: String,
    pub stats: BTreeMap<String, Value>,
}

/// Builds the displayed graph from a snapshot. With `component_of` set, only
/// nodes reachable from that node (ignoring edge direction) are kept. Nodes
/// get random initial locations; the force layout takes it from there.
pub fn build_graph(snapshot: &Snapshot, component_of: Option<&str>) -> DisplayGraph {
    let keep = component_of.map(|root| reachable(snapshot, root));

    let mut g: DisplayGraph = Graph::from(&StableGraph::<NodeInfo, ()>::default());
    let mut rng = rand::rng();
    let mut indices: HashMap<&str, NodeIndex<DefaultIx>> = HashMap::new();

    for node in &snapshot.nodes {
        if keep
            .as_ref()
            .is_some_and(|set| !set.contains(node.id.as_str()))
        {
            continue;
        }
        let info = NodeInfo {
            id: node.id.clone(),
            label: node.display_label().to_string(),
            stats: node.stats.clone(),
        };
        let location = Pos2::new(
            rng.random_range(-250.0..250.0),
            rng.random_range(-250.0..250.0),
        );
        let idx =
            g.add_node_with_label_and_location(info, node.display_label().to_string(), location);
        indices.insert(node.id.as_str(), idx);
    }

    for edge in &snapshot.edges {
        if let (Some(&a), Some(&b)) = (
            indices.get(edge.source.as_str()),
            indices.get(edge.target.as_str()),
        ) {
            if a != b {
                let _ = g.add_edge(a, b, ());
            }
        }
    }

    g
}

/// Node ids reachable from `root` over the snapshot's edges, both directions.
fn reachable(snapshot: &Snapshot, root: &str) -> HashSet<String> {
    let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
    for edge in &snapshot.edges {
        adjacency
            .entry(edge.source.as_str())
            .or_default()
            .push(edge.target.as_str());
        adjacency
            .entry(edge.target.as_str())
            .or_default()
            .push(edge.source.as_str());
    }

    let mut seen = HashSet::new();
    let mut queue = VecDeque::new();
    if snapshot.nodes.iter().any(|n| n.id == root) {
        seen.insert(root.to_string());
        queue.push_back(root);
    }
    while let Some(current) = queue.pop_front() {
        for &next in adjacency.get(current).into_iter().flatten() {
            if seen.insert(next.to_string()) {
                queue.push_back(next);
            }
        }
    }
    seen
}

pub fn find_node(g: &DisplayGraph, id: &str) -> Option<NodeIndex<DefaultIx>> {
    g.g()
        .node_indices()
        .find(|&idx| g.g().node_weight(idx).is_some_and(|n| n.payload().id == id))
}

/// Shortest directed path between two rendered nodes, endpoints included.
pub fn shortest_path(
    g: &DisplayGraph,
    from: NodeIndex<DefaultIx>,
    to: NodeIndex<DefaultIx>,
) -> Option<Vec<NodeRef>> {
    let (_, path) = astar(g.g(), from, |n| n == to, |_| 1u32, |_| 0)?;
    Some(
        path.into_iter()
            .filter_map(|idx| {
                g.g()
                    .node_weight(idx)
                    .map(|n| NodeRef::new(n.payload().id.clone(), n.payload().label.clone()))
            })
            .collect(),
    )
}

/// What the panel shows for a clicked node: the node reference, its snapshot
/// annotations plus in/out degrees, and its direct neighbors.
pub fn selection_details(
    g: &DisplayGraph,
    idx: NodeIndex<DefaultIx>,
) -> Option<(NodeRef, BTreeMap<String, Value>, BTreeMap<String, Value>)> {
    let info = g.g().node_weight(idx)?.payload().clone();
    let node_ref = NodeRef::new(info.id.clone(), info.label.clone());

    let mut links = BTreeMap::new();
    let mut out_degree = 0usize;
    for neighbor in g.g().neighbors_directed(idx, Outgoing) {
        if let Some(n) = g.g().node_weight(neighbor) {
            links.insert(n.payload().label.clone(), Value::from("out"));
            out_degree += 1;
        }
    }
    let mut in_degree = 0usize;
    for neighbor in g.g().neighbors_directed(idx, Incoming) {
        if let Some(n) = g.g().node_weight(neighbor) {
            let label = n.payload().label.clone();
            let direction = if links.contains_key(&label) { "both" } else { "in" };
            links.insert(label, Value::from(direction));
            in_degree += 1;
        }
    }

    let mut basic = info.stats;
    basic.insert("inDegree".to_string(), Value::from(in_degree));
    basic.insert("outDegree".to_string(), Value::from(out_degree));

    Some((node_ref, basic, links))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_component_snapshot() -> Snapshot {
        Snapshot::from_json(
            r#"{
                "nodes": [
                    {"id": "a"}, {"id": "b"}, {"id": "c"},
                    {"id": "x"}, {"id": "y"}
                ],
                "edges": [
                    {"source": "a", "target": "b"},
                    {"source": "b", "target": "c"},
                    {"source": "x", "target": "y"}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn builds_the_whole_snapshot() {
        let g = build_graph(&two_component_snapshot(), None);
        assert_eq!(g.node_count(), 5);
        assert_eq!(g.edge_count(), 3);
    }

    #[test]
    fn component_filter_keeps_the_reachable_set() {
        let g = build_graph(&two_component_snapshot(), Some("a"));
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 2);
        assert!(find_node(&g, "c").is_some());
        assert!(find_node(&g, "x").is_none());
    }

    #[test]
    fn component_filter_with_unknown_root_is_empty() {
        let g = build_graph(&two_component_snapshot(), Some("ghost"));
        assert_eq!(g.node_count(), 0);
    }

    #[test]
    fn shortest_path_orders_endpoints() {
        let g = build_graph(&two_component_snapshot(), None);
        let from = find_node(&g, "a").unwrap();
        let to = find_node(&g, "c").unwrap();

        let path = shortest_path(&g, from, to).unwrap();
        let ids: Vec<&str> = path.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);

        let x = find_node(&g, "x").unwrap();
        assert!(shortest_path(&g, from, x).is_none());
    }

    #[test]
    fn selection_details_reports_degrees_and_neighbors() {
        let g = build_graph(&two_component_snapshot(), None);
        let b = find_node(&g, "b").unwrap();

        let (node, basic, links) = selection_details(&g, b).unwrap();
        assert_eq!(node.id, "b");
        assert_eq!(basic.get("inDegree").unwrap(), 1);
        assert_eq!(basic.get("outDegree").unwrap(), 1);
        assert_eq!(links.get("a").unwrap(), "in");
        assert_eq!(links.get("c").unwrap(), "out");
    }
}
