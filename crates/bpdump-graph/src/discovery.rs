//! Graph discovery.
//!
//! Collects every graph reachable from a container: first the graphs of its
//! collections, then, pass after pass, the graphs nested inside nodes of
//! graphs already found. A graph is kept once no matter how many paths lead
//! to it, and cycles in the nesting relation cannot make the loop run
//! forever because a pass that finds no new identity ends it.

use bpdump_core::{CollectionKind, HostView};
use std::collections::HashSet;
use std::fmt;
use tracing::debug;

/// How a graph was first reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GraphOrigin {
    /// Listed in one of the container's collections.
    Collection(CollectionKind),
    /// Only reachable as a node's nested graph.
    SubGraph,
}

impl GraphOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            GraphOrigin::Collection(kind) => kind.as_str(),
            GraphOrigin::SubGraph => "sub_graph",
        }
    }
}

impl fmt::Display for GraphOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A graph found by [`discover`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscoveredGraph<G> {
    pub graph: G,
    pub origin: GraphOrigin,
}

/// Ordered, identity-unique list of graphs under construction.
struct GraphSet<G> {
    seen: HashSet<G>,
    graphs: Vec<DiscoveredGraph<G>>,
}

impl<G: Copy + Eq + std::hash::Hash> GraphSet<G> {
    fn new() -> Self {
        Self {
            seen: HashSet::new(),
            graphs: Vec::new(),
        }
    }

    fn add(&mut self, graph: G, origin: GraphOrigin) -> bool {
        if !self.seen.insert(graph) {
            return false;
        }
        self.graphs.push(DiscoveredGraph { graph, origin });
        true
    }
}

/// Finds every graph reachable from the container.
///
/// Order: collections in [`CollectionKind::ALL`] order, host order inside a
/// collection, then nested graphs in the order they were encountered.
pub fn discover<H: HostView>(host: &H) -> Vec<DiscoveredGraph<H::Graph>> {
    let mut set = GraphSet::new();

    for kind in CollectionKind::ALL {
        let Some(graphs) = host.collection(kind) else {
            continue;
        };
        for graph in graphs {
            set.add(graph, GraphOrigin::Collection(kind));
        }
    }
    debug!(
        "Seeded {} graphs from collections of {}",
        set.graphs.len(),
        host.container_name()
    );

    // Each pass scans the graphs that existed when it started. Graphs scanned
    // in an earlier pass are not scanned again: the host is read-only, so
    // they cannot yield anything new.
    let mut pass_start = 0;
    let mut pass = 0;
    loop {
        let pass_end = set.graphs.len();
        let mut added = false;

        for index in pass_start..pass_end {
            let parent = set.graphs[index].graph;
            for node in host.graph_nodes(parent) {
                for sub_graph in host.node_sub_graphs(node) {
                    added |= set.add(sub_graph, GraphOrigin::SubGraph);
                }
            }
        }

        pass += 1;
        debug!(
            "Discovery pass {} scanned {} graphs, found {} new",
            pass,
            pass_end - pass_start,
            set.graphs.len() - pass_end
        );

        if !added {
            break;
        }
        pass_start = pass_end;
    }

    set.graphs
}

#[cfg(test)]
mod tests {
    use super::*;
    use bpdump_core::{AssetSnapshot, GraphSnapshot, NodeSnapshot, SnapshotView};

    fn guid(n: u32) -> String {
        format!("{n:08X}-0000-0000-0000-000000000000")
    }

    fn composite(n: u32, sub_graphs: &[&str]) -> NodeSnapshot {
        sub_graphs.iter().fold(
            NodeSnapshot::new(guid(n), "K2Node_Composite", format!("Collapsed {n}")),
            |node, id| node.with_sub_graph(*id),
        )
    }

    fn names(view: &SnapshotView) -> Vec<&str> {
        discover(view)
            .into_iter()
            .map(|d| view.graph_name(d.graph))
            .collect()
    }

    #[test]
    fn test_collection_order_is_fixed() {
        // Declared in reverse; seeding order must not follow declaration.
        let snapshot = AssetSnapshot::new("BP", "Blueprint")
            .with_graph(GraphSnapshot::new("m", "Macro_1"))
            .with_graph(GraphSnapshot::new("f", "DoThing"))
            .with_graph(GraphSnapshot::new("e", "EventGraph"))
            .with_collection(CollectionKind::MacroGraphs, ["m"])
            .with_collection(CollectionKind::FunctionGraphs, ["f"])
            .with_collection(CollectionKind::UbergraphPages, ["e"]);
        let view = SnapshotView::new(&snapshot).unwrap();

        assert_eq!(names(&view), vec!["EventGraph", "DoThing", "Macro_1"]);
    }

    #[test]
    fn test_nested_graphs_are_appended() {
        let snapshot = AssetSnapshot::new("BP", "Blueprint")
            .with_graph(GraphSnapshot::new("e", "EventGraph").with_node(composite(1, &["c1"])))
            .with_graph(GraphSnapshot::new("c1", "Collapsed").with_node(composite(2, &["c2"])))
            .with_graph(GraphSnapshot::new("c2", "Inner"))
            .with_collection(CollectionKind::UbergraphPages, ["e"]);
        let view = SnapshotView::new(&snapshot).unwrap();

        let found = discover(&view);
        assert_eq!(found.len(), 3);
        assert_eq!(view.graph_name(found[2].graph), "Inner");
        assert_eq!(found[0].origin, GraphOrigin::Collection(CollectionKind::UbergraphPages));
        assert_eq!(found[2].origin, GraphOrigin::SubGraph);
    }

    #[test]
    fn test_diamond_yields_each_graph_once() {
        // G is in a collection and also nested in a node of EventGraph.
        let snapshot = AssetSnapshot::new("BP", "Blueprint")
            .with_graph(GraphSnapshot::new("e", "EventGraph").with_node(composite(1, &["g", "g"])))
            .with_graph(GraphSnapshot::new("g", "Shared"))
            .with_collection(CollectionKind::UbergraphPages, ["e"])
            .with_collection(CollectionKind::FunctionGraphs, ["g", "e"]);
        let view = SnapshotView::new(&snapshot).unwrap();

        let found = discover(&view);
        assert_eq!(found.len(), 2);
        assert_eq!(found[1].origin, GraphOrigin::Collection(CollectionKind::FunctionGraphs));
    }

    #[test]
    fn test_cycle_no_infinite_loop() {
        // a -> b -> c -> a through composite nodes.
        let snapshot = AssetSnapshot::new("BP", "Blueprint")
            .with_graph(GraphSnapshot::new("a", "A").with_node(composite(1, &["b"])))
            .with_graph(GraphSnapshot::new("b", "B").with_node(composite(2, &["c"])))
            .with_graph(GraphSnapshot::new("c", "C").with_node(composite(3, &["a"])))
            .with_collection(CollectionKind::UbergraphPages, ["a"]);
        let view = SnapshotView::new(&snapshot).unwrap();

        assert_eq!(names(&view), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_same_name_different_identity() {
        let snapshot = AssetSnapshot::new("BP", "Blueprint")
            .with_graph(GraphSnapshot::new("x", "Graph"))
            .with_graph(GraphSnapshot::new("y", "Graph"))
            .with_collection(CollectionKind::UbergraphPages, ["x", "y"]);
        let view = SnapshotView::new(&snapshot).unwrap();

        assert_eq!(discover(&view).len(), 2);
    }

    #[test]
    fn test_unreachable_graph_is_ignored() {
        let snapshot = AssetSnapshot::new("BP", "Blueprint")
            .with_graph(GraphSnapshot::new("e", "EventGraph"))
            .with_graph(GraphSnapshot::new("orphan", "Orphan"));
        let view = SnapshotView::new(&snapshot).unwrap();

        assert!(discover(&view).is_empty());
    }
}
