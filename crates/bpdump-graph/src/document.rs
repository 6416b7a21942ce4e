//! The output document.
//!
//! Field order is the struct declaration order and every sequence is a
//! `Vec` filled in traversal order, so the rendered JSON depends only on
//! the container and the options. `generated_at` is the one field that
//! does not, and it stays out of the output unless a caller stamps it.

use crate::links::{LinkCandidate, LinkDiagnostics, LinkMeta};
use bpdump_core::{PinDirection, PinType};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};

/// Root of a blueprint graph dump.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlueprintDocument {
    pub asset_path: String,
    pub blueprint_name: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_stamp"
    )]
    pub generated_at: Option<DateTime<Utc>>,
    pub graphs: Vec<GraphDocument>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    pub graph_name: String,
    pub graph_class: String,
    /// Collection the graph was seeded from, or `sub_graph`.
    pub graph_origin: String,
    pub links_only: bool,
    pub link_kind: String,
    pub links_meta: String,
    /// Empty when `links_only` is set.
    pub nodes: Vec<NodeDocument>,
    pub links: Vec<LinkDocument>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<LinkDiagnostics>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDocument {
    pub node_guid: String,
    pub node_class: String,
    pub node_title: String,
    pub pos_x: i32,
    pub pos_y: i32,
    pub pins: Vec<PinDocument>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinDocument {
    pub pin_id: String,
    pub pin_name: String,
    pub direction: PinDirection,
    pub pin_type: PinTypeDocument,
    pub default_value: String,
}

/// Pin type as rendered; a missing referenced type is an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinTypeDocument {
    pub category: String,
    pub sub_category: String,
    pub sub_category_object: String,
    pub is_array: bool,
    pub is_ref: bool,
}

impl From<&PinType> for PinTypeDocument {
    fn from(pin_type: &PinType) -> Self {
        Self {
            category: pin_type.category.clone(),
            sub_category: pin_type.sub_category.clone(),
            sub_category_object: pin_type.sub_category_object.clone().unwrap_or_default(),
            is_array: pin_type.is_array,
            is_ref: pin_type.is_reference,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkDocument {
    pub from_node_guid: String,
    pub from_pin_id: String,
    pub to_node_guid: String,
    pub to_pin_id: String,
    /// Flattened into the link object; absent unless `links_meta` is `min`.
    #[serde(flatten)]
    pub meta: Option<LinkMeta>,
}

impl From<LinkCandidate> for LinkDocument {
    fn from(candidate: LinkCandidate) -> Self {
        let LinkCandidate { key, meta } = candidate;
        Self {
            from_node_guid: key.from_node,
            from_pin_id: key.from_pin,
            to_node_guid: key.to_node,
            to_pin_id: key.to_pin,
            meta,
        }
    }
}

fn serialize_stamp<S: Serializer>(
    stamp: &Option<DateTime<Utc>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match stamp {
        Some(at) => serializer.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Secs, true)),
        None => serializer.serialize_none(),
    }
}

impl BlueprintDocument {
    /// Adds a wall-clock stamp. Stamped documents are no longer
    /// reproducible across runs.
    pub fn stamped(mut self, at: DateTime<Utc>) -> Self {
        self.generated_at = Some(at);
        self
    }

    pub fn node_count(&self) -> usize {
        self.graphs.iter().map(|g| g.nodes.len()).sum()
    }

    pub fn link_count(&self) -> usize {
        self.graphs.iter().map(|g| g.links.len()).sum()
    }

    /// Renders the document as JSON text ending in a newline.
    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        let mut text = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        text.push('\n');
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::LinkKey;
    use chrono::TimeZone;

    fn sample() -> BlueprintDocument {
        BlueprintDocument {
            asset_path: "/Game/BP_A.BP_A".to_string(),
            blueprint_name: "BP_A".to_string(),
            generated_at: None,
            graphs: vec![GraphDocument {
                graph_name: "EventGraph".to_string(),
                graph_class: "EdGraph".to_string(),
                graph_origin: "ubergraph_pages".to_string(),
                links_only: true,
                link_kind: "all".to_string(),
                links_meta: "none".to_string(),
                nodes: Vec::new(),
                links: vec![LinkCandidate {
                    key: LinkKey::new("N1", "P1", "N2", "P2"),
                    meta: None,
                }
                .into()],
                diagnostics: None,
            }],
        }
    }

    #[test]
    fn test_field_order_is_stable() {
        let text = sample().to_json(false).unwrap();
        assert_eq!(
            text,
            concat!(
                r#"{"asset_path":"/Game/BP_A.BP_A","blueprint_name":"BP_A","graphs":[{"#,
                r#""graph_name":"EventGraph","graph_class":"EdGraph","#,
                r#""graph_origin":"ubergraph_pages","#,
                r#""links_only":true,"link_kind":"all","links_meta":"none","nodes":[],"#,
                r#""links":[{"from_node_guid":"N1","from_pin_id":"P1","#,
                r#""to_node_guid":"N2","to_pin_id":"P2"}]}]}"#,
                "\n"
            )
        );
    }

    #[test]
    fn test_stamp_only_when_requested() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        let text = sample().stamped(at).to_json(true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["generated_at"], "2024-05-01T12:30:00Z");

        let text = sample().to_json(true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert!(value.get("generated_at").is_none());
    }

    #[test]
    fn test_meta_fields_are_inlined() {
        let link: LinkDocument = LinkCandidate {
            key: LinkKey::new("N1", "P1", "N2", "P2"),
            meta: Some(LinkMeta {
                from_node_title: "Branch".to_string(),
                from_pin_name: "then".to_string(),
                from_pin_category: "exec".to_string(),
                to_node_title: "Print String".to_string(),
                to_pin_name: "execute".to_string(),
                to_pin_category: "exec".to_string(),
            }),
        }
        .into();

        let value = serde_json::to_value(&link).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 10);
        assert_eq!(object["to_node_title"], "Print String");
    }
}
