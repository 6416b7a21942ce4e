//! JSON snapshots of blueprint containers.
//!
//! [`AssetSnapshot`] is the on-disk shape: graphs with nested nodes and pins,
//! pin adjacency as lists of peer pin ids, and collections/sub-graphs as
//! lists of snapshot-local graph ids. [`SnapshotView`] resolves all of those
//! references once and serves the result through [`HostView`].

use crate::error::{Error, Result};
use crate::host::{CollectionKind, HostView, PinDirection, PinType};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};
use uuid::Uuid;

// ─────────────────────────────────────────────────────────────────────────────
// On-disk model
// ─────────────────────────────────────────────────────────────────────────────

/// A blueprint container as stored in the snapshot store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetSnapshot {
    /// Object name, e.g. `BP_PlayerPawn`.
    pub name: String,
    /// Class of the container, e.g. `Blueprint` or `WidgetBlueprint`.
    pub class_name: String,
    /// Asset registry tags.
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
    /// Graph ids per collection, in host order.
    #[serde(default)]
    pub collections: BTreeMap<CollectionKind, Vec<String>>,
    /// Every graph of the container, including nested ones.
    #[serde(default)]
    pub graphs: Vec<GraphSnapshot>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphSnapshot {
    /// Snapshot-local identity. Unrelated to `name`.
    pub id: String,
    pub name: String,
    #[serde(default = "default_graph_class")]
    pub class_name: String,
    #[serde(default)]
    pub nodes: Vec<NodeSnapshot>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub guid: String,
    pub class_name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub pos_x: i32,
    #[serde(default)]
    pub pos_y: i32,
    #[serde(default)]
    pub pins: Vec<PinSnapshot>,
    /// Ids of graphs owned by this node.
    #[serde(default)]
    pub sub_graphs: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PinSnapshot {
    pub id: String,
    pub name: String,
    pub direction: PinDirection,
    #[serde(default)]
    pub pin_type: PinType,
    #[serde(default)]
    pub default_value: String,
    /// Ids of connected pins, anywhere in the container.
    #[serde(default)]
    pub linked_to: Vec<String>,
}

fn default_graph_class() -> String {
    "EdGraph".to_string()
}

impl AssetSnapshot {
    pub fn new(name: impl Into<String>, class_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            class_name: class_name.into(),
            ..Self::default()
        }
    }

    /// Parses a snapshot from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// True when the container is some kind of blueprint
    /// (`Blueprint`, `WidgetBlueprint`, `AnimBlueprint`, ...).
    pub fn is_blueprint(&self) -> bool {
        self.class_name.ends_with("Blueprint")
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// Adds a graph to the container without putting it in a collection.
    pub fn with_graph(mut self, graph: GraphSnapshot) -> Self {
        self.graphs.push(graph);
        self
    }

    /// Appends graph ids to a collection, creating it if needed.
    pub fn with_collection<I, S>(mut self, kind: CollectionKind, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.collections
            .entry(kind)
            .or_default()
            .extend(ids.into_iter().map(Into::into));
        self
    }
}

impl GraphSnapshot {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            class_name: default_graph_class(),
            nodes: Vec::new(),
        }
    }

    pub fn with_node(mut self, node: NodeSnapshot) -> Self {
        self.nodes.push(node);
        self
    }
}

impl NodeSnapshot {
    pub fn new(
        guid: impl Into<String>,
        class_name: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            guid: guid.into(),
            class_name: class_name.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn at(mut self, pos_x: i32, pos_y: i32) -> Self {
        self.pos_x = pos_x;
        self.pos_y = pos_y;
        self
    }

    pub fn with_pin(mut self, pin: PinSnapshot) -> Self {
        self.pins.push(pin);
        self
    }

    pub fn with_sub_graph(mut self, graph_id: impl Into<String>) -> Self {
        self.sub_graphs.push(graph_id.into());
        self
    }
}

impl PinSnapshot {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        direction: PinDirection,
        pin_type: PinType,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            direction,
            pin_type,
            default_value: String::new(),
            linked_to: Vec::new(),
        }
    }

    pub fn input(id: impl Into<String>, name: impl Into<String>, category: &str) -> Self {
        Self::new(id, name, PinDirection::Input, PinType::new(category))
    }

    pub fn output(id: impl Into<String>, name: impl Into<String>, category: &str) -> Self {
        Self::new(id, name, PinDirection::Output, PinType::new(category))
    }

    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = value.into();
        self
    }

    pub fn linked_to(mut self, pin_id: impl Into<String>) -> Self {
        self.linked_to.push(pin_id.into());
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Indexed view
// ─────────────────────────────────────────────────────────────────────────────

/// Handle to a graph of a [`SnapshotView`]. Equal handles are the same graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GraphHandle(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeHandle(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PinHandle(usize);

#[derive(Debug)]
struct GraphEntry {
    name: String,
    class_name: String,
    nodes: Vec<NodeHandle>,
}

#[derive(Debug)]
struct NodeEntry {
    guid: String,
    class_name: String,
    title: String,
    position: (i32, i32),
    pins: Vec<PinHandle>,
    sub_graphs: Vec<GraphHandle>,
}

#[derive(Debug)]
struct PinEntry {
    id: String,
    name: String,
    direction: PinDirection,
    pin_type: PinType,
    default_value: String,
    owner: Option<NodeHandle>,
    links: Vec<PinHandle>,
}

/// An [`AssetSnapshot`] with every reference resolved to a handle.
///
/// Node GUIDs and pin ids are rendered in upper-case hyphenated form.
/// A `linked_to` entry that matches no pin becomes a dangling pin with no
/// owner, so consumers see it exactly like a host pin whose node is gone.
#[derive(Debug)]
pub struct SnapshotView {
    name: String,
    class_name: String,
    collections: BTreeMap<CollectionKind, Vec<GraphHandle>>,
    graphs: Vec<GraphEntry>,
    nodes: Vec<NodeEntry>,
    pins: Vec<PinEntry>,
}

/// Parses a GUID in any form `uuid` accepts and renders it the way the
/// engine prints `DigitsWithHyphens`.
pub fn format_guid(value: &str) -> Result<String> {
    let guid = Uuid::parse_str(value.trim()).map_err(|source| Error::InvalidGuid {
        value: value.to_string(),
        source,
    })?;
    Ok(guid
        .hyphenated()
        .encode_upper(&mut Uuid::encode_buffer())
        .to_string())
}

impl SnapshotView {
    /// Resolves all graph and pin references of a snapshot.
    ///
    /// Fails only on malformed node GUIDs or pin ids. Unknown graph ids are
    /// skipped with a warning; unknown pin ids become dangling pins.
    pub fn new(snapshot: &AssetSnapshot) -> Result<Self> {
        let mut graph_ids: HashMap<&str, GraphHandle> = HashMap::new();
        for (index, graph) in snapshot.graphs.iter().enumerate() {
            if graph_ids.contains_key(graph.id.as_str()) {
                warn!("Duplicate graph id '{}' in {}, keeping the first", graph.id, snapshot.name);
                continue;
            }
            graph_ids.insert(graph.id.as_str(), GraphHandle(index));
        }

        let resolve_graphs = |ids: &[String], context: &str| -> Vec<GraphHandle> {
            ids.iter()
                .filter_map(|id| {
                    let handle = graph_ids.get(id.as_str()).copied();
                    if handle.is_none() {
                        warn!("Unknown graph id '{}' referenced by {}", id, context);
                    }
                    handle
                })
                .collect()
        };

        let mut graphs = Vec::with_capacity(snapshot.graphs.len());
        let mut nodes = Vec::new();
        let mut pins = Vec::new();
        let mut pin_index: HashMap<String, PinHandle> = HashMap::new();
        // Raw peer ids per pin, resolved once every pin is known.
        let mut pending_links: Vec<Vec<String>> = Vec::new();

        for graph in &snapshot.graphs {
            let mut node_handles = Vec::with_capacity(graph.nodes.len());
            for node in &graph.nodes {
                let node_handle = NodeHandle(nodes.len());
                let mut pin_handles = Vec::with_capacity(node.pins.len());

                for pin in &node.pins {
                    let pin_handle = PinHandle(pins.len());
                    let id = format_guid(&pin.id)?;
                    pin_index.entry(id.clone()).or_insert(pin_handle);
                    pins.push(PinEntry {
                        id,
                        name: pin.name.clone(),
                        direction: pin.direction,
                        pin_type: pin.pin_type.clone(),
                        default_value: pin.default_value.clone(),
                        owner: Some(node_handle),
                        links: Vec::new(),
                    });
                    pending_links.push(pin.linked_to.clone());
                    pin_handles.push(pin_handle);
                }

                nodes.push(NodeEntry {
                    guid: format_guid(&node.guid)?,
                    class_name: node.class_name.clone(),
                    title: node.title.clone(),
                    position: (node.pos_x, node.pos_y),
                    pins: pin_handles,
                    sub_graphs: resolve_graphs(&node.sub_graphs, &node.guid),
                });
                node_handles.push(node_handle);
            }

            graphs.push(GraphEntry {
                name: graph.name.clone(),
                class_name: graph.class_name.clone(),
                nodes: node_handles,
            });
        }

        let mut dangling = 0usize;
        for (index, peer_ids) in pending_links.into_iter().enumerate() {
            let mut links = Vec::with_capacity(peer_ids.len());
            for raw in peer_ids {
                let key = format_guid(&raw).unwrap_or(raw);
                let handle = match pin_index.get(&key) {
                    Some(&handle) => handle,
                    None => {
                        let handle = PinHandle(pins.len());
                        pins.push(PinEntry {
                            id: key.clone(),
                            name: String::new(),
                            direction: PinDirection::Input,
                            pin_type: PinType::default(),
                            default_value: String::new(),
                            owner: None,
                            links: Vec::new(),
                        });
                        pin_index.insert(key, handle);
                        dangling += 1;
                        handle
                    }
                };
                links.push(handle);
            }
            pins[index].links = links;
        }

        let collections = snapshot
            .collections
            .iter()
            .map(|(kind, ids)| (*kind, resolve_graphs(ids, kind.as_str())))
            .collect();

        debug!(
            "Indexed {}: {} graphs, {} nodes, {} pins ({} dangling)",
            snapshot.name,
            graphs.len(),
            nodes.len(),
            pins.len(),
            dangling
        );

        Ok(Self {
            name: snapshot.name.clone(),
            class_name: snapshot.class_name.clone(),
            collections,
            graphs,
            nodes,
            pins,
        })
    }

    fn graph(&self, handle: GraphHandle) -> &GraphEntry {
        &self.graphs[handle.0]
    }

    fn node(&self, handle: NodeHandle) -> &NodeEntry {
        &self.nodes[handle.0]
    }

    fn pin(&self, handle: PinHandle) -> &PinEntry {
        &self.pins[handle.0]
    }
}

impl HostView for SnapshotView {
    type Graph = GraphHandle;
    type Node = NodeHandle;
    type Pin = PinHandle;

    fn container_name(&self) -> &str {
        &self.name
    }

    fn container_class(&self) -> &str {
        &self.class_name
    }

    fn collection(&self, kind: CollectionKind) -> Option<Vec<GraphHandle>> {
        self.collections.get(&kind).cloned()
    }

    fn graph_name(&self, graph: GraphHandle) -> &str {
        &self.graph(graph).name
    }

    fn graph_class(&self, graph: GraphHandle) -> &str {
        &self.graph(graph).class_name
    }

    fn graph_nodes(&self, graph: GraphHandle) -> Vec<NodeHandle> {
        self.graph(graph).nodes.clone()
    }

    fn node_guid(&self, node: NodeHandle) -> String {
        self.node(node).guid.clone()
    }

    fn node_class(&self, node: NodeHandle) -> &str {
        &self.node(node).class_name
    }

    fn node_title(&self, node: NodeHandle) -> &str {
        &self.node(node).title
    }

    fn node_position(&self, node: NodeHandle) -> (i32, i32) {
        self.node(node).position
    }

    fn node_pins(&self, node: NodeHandle) -> Vec<PinHandle> {
        self.node(node).pins.clone()
    }

    fn node_sub_graphs(&self, node: NodeHandle) -> Vec<GraphHandle> {
        self.node(node).sub_graphs.clone()
    }

    fn pin_id(&self, pin: PinHandle) -> String {
        self.pin(pin).id.clone()
    }

    fn pin_name(&self, pin: PinHandle) -> &str {
        &self.pin(pin).name
    }

    fn pin_direction(&self, pin: PinHandle) -> PinDirection {
        self.pin(pin).direction
    }

    fn pin_type(&self, pin: PinHandle) -> &PinType {
        &self.pin(pin).pin_type
    }

    fn pin_default_value(&self, pin: PinHandle) -> &str {
        &self.pin(pin).default_value
    }

    fn pin_owner(&self, pin: PinHandle) -> Option<NodeHandle> {
        self.pin(pin).owner
    }

    fn pin_links(&self, pin: PinHandle) -> Vec<PinHandle> {
        self.pin(pin).links.clone()
    }
}
