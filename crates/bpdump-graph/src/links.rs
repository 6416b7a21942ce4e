//! Link normalization.
//!
//! Hosts store a connection on both of its pins. A canonical link is only
//! ever produced from the output side, towards an input pin, and a per-graph
//! key set drops repeats. Anything that does not fit that shape (peers
//! without a node, output-to-output adjacency) is skipped and counted.

use crate::key::{LinkKey, LinkKeySet};
use crate::options::{LinkKind, LinksMeta};
use bpdump_core::{HostView, PinDirection};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Endpoint details copied onto a link when `links_meta` is `min`.
///
/// Values are captured at emission time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkMeta {
    pub from_node_title: String,
    pub from_pin_name: String,
    pub from_pin_category: String,
    pub to_node_title: String,
    pub to_pin_name: String,
    pub to_pin_category: String,
}

/// A link that has not been checked against the graph's key set yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkCandidate {
    pub key: LinkKey,
    pub meta: Option<LinkMeta>,
}

/// Adjacency entries that did not become links.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkDiagnostics {
    /// Peers with no owning node.
    pub orphan_peers: usize,
    /// Peers that are not input pins.
    pub non_input_peers: usize,
    /// Candidates whose key was already emitted in the graph.
    pub duplicate_links: usize,
}

impl LinkDiagnostics {
    pub fn total(&self) -> usize {
        self.orphan_peers + self.non_input_peers + self.duplicate_links
    }
}

/// Builds the candidate links leaving one pin.
///
/// Returns nothing for input pins and for pins the `link_kind` filter
/// rejects; the filter is applied before any peer is looked at. Peers with
/// no owner or with a non-input direction are skipped and counted in
/// `diagnostics`.
pub fn emit_links_for_pin<H: HostView>(
    host: &H,
    pin: H::Pin,
    owner_node_guid: &str,
    link_kind: LinkKind,
    links_meta: LinksMeta,
    diagnostics: &mut LinkDiagnostics,
) -> Vec<LinkCandidate> {
    if host.pin_direction(pin) != PinDirection::Output {
        return Vec::new();
    }

    if !link_kind.admits(host.pin_type(pin).is_exec()) {
        return Vec::new();
    }

    let from_pin_id = host.pin_id(pin);
    let mut candidates = Vec::new();

    for peer in host.pin_links(pin) {
        let Some(peer_node) = host.pin_owner(peer) else {
            trace!("Skipping orphan peer {} of pin {}", host.pin_id(peer), from_pin_id);
            diagnostics.orphan_peers += 1;
            continue;
        };

        if host.pin_direction(peer) != PinDirection::Input {
            trace!("Skipping non-input peer {} of pin {}", host.pin_id(peer), from_pin_id);
            diagnostics.non_input_peers += 1;
            continue;
        }

        let key = LinkKey::new(
            owner_node_guid,
            from_pin_id.clone(),
            host.node_guid(peer_node),
            host.pin_id(peer),
        );

        let meta = match links_meta {
            LinksMeta::None => None,
            LinksMeta::Min => Some(LinkMeta {
                from_node_title: host
                    .pin_owner(pin)
                    .map(|node| host.node_title(node).to_string())
                    .unwrap_or_default(),
                from_pin_name: host.pin_name(pin).to_string(),
                from_pin_category: host.pin_type(pin).category.clone(),
                to_node_title: host.node_title(peer_node).to_string(),
                to_pin_name: host.pin_name(peer).to_string(),
                to_pin_category: host.pin_type(peer).category.clone(),
            }),
        };

        candidates.push(LinkCandidate { key, meta });
    }

    candidates
}

/// Collects the links of one graph, first-seen order, one per key.
#[derive(Debug, Default)]
pub struct LinkCollector {
    link_kind: LinkKind,
    links_meta: LinksMeta,
    seen: LinkKeySet,
    links: Vec<LinkCandidate>,
    diagnostics: LinkDiagnostics,
}

impl LinkCollector {
    pub fn new(link_kind: LinkKind, links_meta: LinksMeta) -> Self {
        Self {
            link_kind,
            links_meta,
            ..Self::default()
        }
    }

    /// Emits the links of `pin` and keeps the ones not seen before.
    /// Returns how many were kept.
    pub fn add_pin<H: HostView>(&mut self, host: &H, pin: H::Pin, owner_node_guid: &str) -> usize {
        let candidates = emit_links_for_pin(
            host,
            pin,
            owner_node_guid,
            self.link_kind,
            self.links_meta,
            &mut self.diagnostics,
        );

        let mut kept = 0;
        for candidate in candidates {
            if !self.seen.insert(&candidate.key) {
                self.diagnostics.duplicate_links += 1;
                continue;
            }
            self.links.push(candidate);
            kept += 1;
        }
        kept
    }

    pub fn keys(&self) -> &LinkKeySet {
        &self.seen
    }

    pub fn links(&self) -> &[LinkCandidate] {
        &self.links
    }

    pub fn diagnostics(&self) -> LinkDiagnostics {
        self.diagnostics
    }

    pub fn into_links(self) -> (Vec<LinkCandidate>, LinkDiagnostics) {
        (self.links, self.diagnostics)
    }
}
