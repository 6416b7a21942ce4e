//! Error types for bpdump-core.
//!
//! Only asset resolution can fail. Irregular graph data (dangling links,
//! inconsistent pin directions) is never an error: the extraction skips it.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for bpdump-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving or reading an asset snapshot.
#[derive(Error, Debug)]
pub enum Error {
    /// The asset path has no usable segments.
    #[error("invalid asset path: '{0}'")]
    InvalidAssetPath(String),

    /// No snapshot exists for the asset path.
    #[error("failed to load asset: {path} (looked for {})", file.display())]
    AssetNotFound { path: String, file: PathBuf },

    /// The snapshot loaded, but it is not a blueprint container.
    #[error("asset is not a blueprint: {path} (class={class_name})")]
    NotABlueprint { path: String, class_name: String },

    /// A node or pin identifier is not a GUID.
    #[error("invalid guid '{value}': {source}")]
    InvalidGuid {
        value: String,
        #[source]
        source: uuid::Error,
    },

    /// Reading a snapshot failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A snapshot is not valid JSON or does not match the snapshot schema.
    #[error("snapshot parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// True for the errors that mean "the root asset could not be resolved".
    pub fn is_resolution_failure(&self) -> bool {
        matches!(
            self,
            Error::InvalidAssetPath(_) | Error::AssetNotFound { .. } | Error::NotABlueprint { .. }
        )
    }
}
