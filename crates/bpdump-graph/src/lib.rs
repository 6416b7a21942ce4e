//! bpdump graph - deterministic blueprint graph extraction
//!
//! This crate turns a [`HostView`](bpdump_core::HostView) into a
//! [`BlueprintDocument`]: a stable, diff-friendly description of every graph
//! reachable from a container, its nodes and pins, and its links.
//!
//! # Pipeline
//!
//! - [`discover`]: closure of reachable graphs, identity-deduplicated
//! - [`emit_links_for_pin`] / [`LinkCollector`]: output-to-input links,
//!   kind filtering, per-graph dedup on [`LinkKey`]
//! - [`extract`]: graph-name filter and structural mode, builds the document
//! - [`BlueprintDocument::to_json`]: stable JSON text
//!
//! # Example
//!
//! ```no_run
//! use bpdump_core::{SnapshotStore, SnapshotView};
//! use bpdump_graph::{extract, ExtractOptions, LinkKind};
//!
//! let store = SnapshotStore::new("Content");
//! let snapshot = store.load_blueprint("/Game/BP_Door.BP_Door")?;
//! let view = SnapshotView::new(&snapshot)?;
//!
//! let options = ExtractOptions::new().with_link_kind(LinkKind::Exec);
//! let document = extract(&view, "/Game/BP_Door.BP_Door", &options);
//! print!("{}", document.to_json(true)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod discovery;
mod document;
mod extract;
mod key;
mod links;
mod options;

pub use discovery::{discover, DiscoveredGraph, GraphOrigin};
pub use document::{
    BlueprintDocument, GraphDocument, LinkDocument, NodeDocument, PinDocument, PinTypeDocument,
};
pub use extract::{extract, extract_graph};
pub use key::{LinkKey, LinkKeySet, KEY_SEPARATOR};
pub use links::{emit_links_for_pin, LinkCandidate, LinkCollector, LinkDiagnostics, LinkMeta};
pub use options::{
    ExtractOptions, GraphNameFilter, LinkKind, LinksMeta, ParseOptionError, StructuralMode,
};
