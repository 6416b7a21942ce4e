//! Blueprint graph extraction.
//!
//! One sequential pass: discover graphs, drop the ones the name filter
//! rejects, walk every node and pin of the rest, collect links, and build
//! the document. Link collection runs over every pin even in links-only
//! mode; the structural mode only decides what is rendered.

use crate::discovery::discover;
use crate::document::{BlueprintDocument, GraphDocument, NodeDocument, PinDocument};
use crate::links::LinkCollector;
use crate::options::ExtractOptions;
use bpdump_core::HostView;
use tracing::{debug, info};

/// Extracts every matching graph of a container into a document.
///
/// Never fails: irregular adjacency is skipped, and a filter that matches
/// nothing produces a document with no graphs.
pub fn extract<H: HostView>(
    host: &H,
    asset_path: &str,
    options: &ExtractOptions,
) -> BlueprintDocument {
    let discovered = discover(host);
    if !options.graph_name.is_any() {
        debug!("Filtering {} graphs by name", discovered.len());
    }
    let mut graphs = Vec::new();

    for found in &discovered {
        let graph_name = host.graph_name(found.graph);
        if !options.graph_name.matches(graph_name) {
            debug!("Graph '{}' rejected by name filter", graph_name);
            continue;
        }
        graphs.push(extract_graph(host, found.graph, found.origin.as_str(), options));
    }

    let document = BlueprintDocument {
        asset_path: asset_path.to_string(),
        blueprint_name: host.container_name().to_string(),
        generated_at: None,
        graphs,
    };

    info!(
        "Extracted {} of {} graphs from {} ({} nodes, {} links)",
        document.graphs.len(),
        discovered.len(),
        asset_path,
        document.node_count(),
        document.link_count()
    );

    document
}

/// Builds the document of a single graph.
pub fn extract_graph<H: HostView>(
    host: &H,
    graph: H::Graph,
    origin: &str,
    options: &ExtractOptions,
) -> GraphDocument {
    let links_only = options.structure.is_links_only();
    let mut collector = LinkCollector::new(options.link_kind, options.links_meta);
    let mut nodes = Vec::new();

    for node in host.graph_nodes(graph) {
        let node_guid = host.node_guid(node);
        let mut pins = Vec::new();

        for pin in host.node_pins(node) {
            collector.add_pin(host, pin, &node_guid);
            if !links_only {
                pins.push(PinDocument {
                    pin_id: host.pin_id(pin),
                    pin_name: host.pin_name(pin).to_string(),
                    direction: host.pin_direction(pin),
                    pin_type: host.pin_type(pin).into(),
                    default_value: host.pin_default_value(pin).to_string(),
                });
            }
        }

        if links_only {
            continue;
        }

        let (pos_x, pos_y) = host.node_position(node);
        nodes.push(NodeDocument {
            node_guid,
            node_class: host.node_class(node).to_string(),
            node_title: host.node_title(node).to_string(),
            pos_x,
            pos_y,
            pins,
        });
    }

    let (links, diagnostics) = collector.into_links();
    if diagnostics.total() > 0 {
        debug!(
            "Graph '{}': skipped {} orphan, {} non-input, {} duplicate adjacency entries",
            host.graph_name(graph),
            diagnostics.orphan_peers,
            diagnostics.non_input_peers,
            diagnostics.duplicate_links
        );
    }

    GraphDocument {
        graph_name: host.graph_name(graph).to_string(),
        graph_class: host.graph_class(graph).to_string(),
        graph_origin: origin.to_string(),
        links_only,
        link_kind: options.link_kind.to_string(),
        links_meta: options.links_meta.to_string(),
        nodes,
        links: links.into_iter().map(Into::into).collect(),
        diagnostics: options.diagnostics.then_some(diagnostics),
    }
}
