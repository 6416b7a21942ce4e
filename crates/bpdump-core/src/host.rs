//! The read-only view the extractor uses to walk a blueprint container.
//!
//! The extractor never holds references into the host's object graph. It
//! asks a [`HostView`] for cheap handles (graphs, nodes, pins) and reads
//! every attribute through the view. Back references such as "which node
//! owns this pin" are answered by the view as well.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;

/// Reserved pin category for execution-flow pins.
pub const EXEC_PIN_CATEGORY: &str = "exec";

/// The named graph collections a container can own.
///
/// [`CollectionKind::ALL`] is the order in which discovery seeds graphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionKind {
    /// Event graphs.
    UbergraphPages,
    /// User functions.
    FunctionGraphs,
    /// Macros.
    MacroGraphs,
    /// Delegate signatures.
    DelegateSignatureGraphs,
    /// Graphs the compiler generated; usually absent on saved assets.
    IntermediateGeneratedGraphs,
}

impl CollectionKind {
    /// Every collection, in seeding order.
    pub const ALL: [CollectionKind; 5] = [
        CollectionKind::UbergraphPages,
        CollectionKind::FunctionGraphs,
        CollectionKind::MacroGraphs,
        CollectionKind::DelegateSignatureGraphs,
        CollectionKind::IntermediateGeneratedGraphs,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionKind::UbergraphPages => "ubergraph_pages",
            CollectionKind::FunctionGraphs => "function_graphs",
            CollectionKind::MacroGraphs => "macro_graphs",
            CollectionKind::DelegateSignatureGraphs => "delegate_signature_graphs",
            CollectionKind::IntermediateGeneratedGraphs => "intermediate_generated_graphs",
        }
    }
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which side of a connection a pin sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PinDirection {
    #[serde(alias = "input")]
    Input,
    #[serde(alias = "output")]
    Output,
}

impl fmt::Display for PinDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PinDirection::Input => write!(f, "Input"),
            PinDirection::Output => write!(f, "Output"),
        }
    }
}

/// Type descriptor of a pin.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PinType {
    /// Category such as `exec`, `bool`, `object` or `struct`.
    pub category: String,
    pub sub_category: String,
    /// Name of the referenced class/struct/enum, if any.
    pub sub_category_object: Option<String>,
    pub is_array: bool,
    #[serde(alias = "is_ref")]
    pub is_reference: bool,
}

impl PinType {
    /// Creates a plain (non-container, by-value) pin type.
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            ..Self::default()
        }
    }

    /// True when the pin carries execution flow rather than data.
    ///
    /// Categories are names, so the comparison ignores ASCII case.
    pub fn is_exec(&self) -> bool {
        self.category.eq_ignore_ascii_case(EXEC_PIN_CATEGORY)
    }
}

/// Read-only access to a loaded blueprint container.
///
/// Handles are plain values. Graph handles double as identities: two
/// handles are the same graph iff they compare equal, whatever the graphs'
/// display names are.
pub trait HostView {
    type Graph: Copy + Eq + Hash + fmt::Debug;
    type Node: Copy + Eq + fmt::Debug;
    type Pin: Copy + Eq + fmt::Debug;

    /// Name of the container object.
    fn container_name(&self) -> &str;

    /// Class name of the container object.
    fn container_class(&self) -> &str;

    /// Graphs of one collection in host order, or `None` if the container
    /// does not have that collection.
    fn collection(&self, kind: CollectionKind) -> Option<Vec<Self::Graph>>;

    fn graph_name(&self, graph: Self::Graph) -> &str;
    fn graph_class(&self, graph: Self::Graph) -> &str;

    /// Nodes of a graph in host order.
    fn graph_nodes(&self, graph: Self::Graph) -> Vec<Self::Node>;

    /// Stable node identifier, already formatted for output.
    fn node_guid(&self, node: Self::Node) -> String;
    fn node_class(&self, node: Self::Node) -> &str;
    fn node_title(&self, node: Self::Node) -> &str;
    fn node_position(&self, node: Self::Node) -> (i32, i32);

    /// Pins of a node in host order.
    fn node_pins(&self, node: Self::Node) -> Vec<Self::Pin>;

    /// Graphs nested inside a node (collapsed graphs, composite nodes).
    /// Empty for ordinary nodes; never fails.
    fn node_sub_graphs(&self, node: Self::Node) -> Vec<Self::Graph>;

    /// Stable pin identifier, already formatted for output.
    fn pin_id(&self, pin: Self::Pin) -> String;
    fn pin_name(&self, pin: Self::Pin) -> &str;
    fn pin_direction(&self, pin: Self::Pin) -> PinDirection;
    fn pin_type(&self, pin: Self::Pin) -> &PinType;
    fn pin_default_value(&self, pin: Self::Pin) -> &str;

    /// The node that owns a pin. `None` for dangling pins.
    fn pin_owner(&self, pin: Self::Pin) -> Option<Self::Node>;

    /// Raw adjacency as stored by the host. Both ends of a connection list
    /// each other, and the data may be inconsistent.
    fn pin_links(&self, pin: Self::Pin) -> Vec<Self::Pin>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exec_category_ignores_case() {
        assert!(PinType::new("exec").is_exec());
        assert!(PinType::new("Exec").is_exec());
        assert!(!PinType::new("execute").is_exec());
        assert!(!PinType::new("bool").is_exec());
    }

    #[test]
    fn test_collection_order() {
        let names: Vec<&str> = CollectionKind::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "ubergraph_pages",
                "function_graphs",
                "macro_graphs",
                "delegate_signature_graphs",
                "intermediate_generated_graphs"
            ]
        );
    }

    #[test]
    fn test_pin_direction_accepts_lowercase() {
        let dir: PinDirection = serde_json::from_str("\"output\"").unwrap();
        assert_eq!(dir, PinDirection::Output);
        assert_eq!(serde_json::to_string(&PinDirection::Input).unwrap(), "\"Input\"");
    }
}
