//! bpdump core - the data side of blueprint graph extraction
//!
//! This crate defines what the extractor reads, and where it reads it from:
//!
//! - [`HostView`]: the read-only interface over a loaded blueprint
//!   container (graphs, nodes, pins, raw pin adjacency)
//! - [`AssetSnapshot`] / [`SnapshotView`]: a JSON model of a container and
//!   a resolved, handle-based view over it
//! - [`SnapshotStore`]: resolves content paths to snapshots and lists the
//!   catalog
//! - [`path`]: content path helpers
//!
//! # Example
//!
//! ```no_run
//! use bpdump_core::{HostView, SnapshotStore, SnapshotView};
//!
//! let store = SnapshotStore::new("Content");
//! let snapshot = store.load_blueprint("/Game/Player/BP_Pawn.BP_Pawn")?;
//! let view = SnapshotView::new(&snapshot)?;
//! println!("{} ({})", view.container_name(), view.container_class());
//! # Ok::<(), bpdump_core::Error>(())
//! ```

pub mod error;
pub mod host;
pub mod path;
pub mod snapshot;
pub mod store;

pub use error::{Error, Result};
pub use host::{CollectionKind, HostView, PinDirection, PinType, EXEC_PIN_CATEGORY};
pub use snapshot::{
    format_guid, AssetSnapshot, GraphHandle, GraphSnapshot, NodeHandle, NodeSnapshot, PinHandle,
    PinSnapshot, SnapshotView,
};
pub use store::{AssetEntry, SnapshotStore};
