//! Directory-backed snapshot store.
//!
//! Content paths map onto the store directory: `/Game/A/BP_X.BP_X` (object
//! path) and `/Game/A/BP_X` (package path) both live in
//! `<root>/Game/A/BP_X.json`.

use crate::error::{Error, Result};
use crate::path;
use crate::snapshot::AssetSnapshot;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Extension of snapshot files.
pub const SNAPSHOT_EXTENSION: &str = "json";

/// One catalog entry, as reported by [`SnapshotStore::list`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetEntry {
    /// `/Game/A/BP_X`
    pub package_name: String,
    /// `/Game/A/BP_X.BP_X`
    pub object_path: String,
    /// `/Game/A`
    pub package_path: String,
    pub class_name: String,
}

/// Resolves content paths to snapshots stored under a root directory.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    root: PathBuf,
}

impl SnapshotStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maps a content path to the snapshot file that would hold it.
    pub fn file_for(&self, asset_path: &str) -> Result<PathBuf> {
        let mut segments = content_segments(asset_path)?;
        let last = segments
            .pop()
            .ok_or_else(|| Error::InvalidAssetPath(asset_path.to_string()))?;

        // Drop the object name of an object path.
        let package = last.split('.').next().unwrap_or_default();
        if package.is_empty() {
            return Err(Error::InvalidAssetPath(asset_path.to_string()));
        }

        let mut file = self.root.clone();
        file.extend(&segments);
        file.push(format!("{package}.{SNAPSHOT_EXTENSION}"));
        Ok(file)
    }

    /// Loads any asset.
    pub fn load(&self, asset_path: &str) -> Result<AssetSnapshot> {
        let file = self.file_for(asset_path)?;
        if !file.is_file() {
            return Err(Error::AssetNotFound {
                path: asset_path.to_string(),
                file,
            });
        }

        debug!("Loading {} from {}", asset_path, file.display());
        let text = fs::read_to_string(&file)?;
        AssetSnapshot::from_json(&text)
    }

    /// Loads an asset and checks that it is a blueprint.
    pub fn load_blueprint(&self, asset_path: &str) -> Result<AssetSnapshot> {
        let snapshot = self.load(asset_path)?;
        if !snapshot.is_blueprint() {
            return Err(Error::NotABlueprint {
                path: asset_path.to_string(),
                class_name: snapshot.class_name,
            });
        }
        Ok(snapshot)
    }

    /// Lists every snapshot under a content folder, sorted by object path.
    ///
    /// A missing folder yields an empty list. Snapshots that fail to parse
    /// are logged and left out. `.` and `..` segments are rejected.
    pub fn list(&self, filter_path: &str) -> Result<Vec<AssetEntry>> {
        let mut dir = self.root.clone();
        dir.extend(content_segments(filter_path)?);
        if !dir.is_dir() {
            debug!("No store folder at {}", dir.display());
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        for entry in WalkDir::new(&dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == SNAPSHOT_EXTENSION))
        {
            match self.describe(entry.path()) {
                Ok(asset) => entries.push(asset),
                Err(e) => warn!("Skipping {}: {}", entry.path().display(), e),
            }
        }

        entries.sort_by(|a, b| a.object_path.cmp(&b.object_path));
        Ok(entries)
    }

    fn describe(&self, file: &Path) -> Result<AssetEntry> {
        let text = fs::read_to_string(file)?;
        let snapshot = AssetSnapshot::from_json(&text)?;

        let relative = file.strip_prefix(&self.root).unwrap_or(file);
        let mut segments: Vec<String> = relative
            .with_extension("")
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        let package = segments.pop().unwrap_or_default();

        let package_path = path::join(&segments, segments.len());
        let package_name = format!("{package_path}/{package}");
        let object_name = if snapshot.name.is_empty() {
            package
        } else {
            snapshot.name
        };

        Ok(AssetEntry {
            object_path: format!("{package_name}.{object_name}"),
            package_name,
            package_path,
            class_name: snapshot.class_name,
        })
    }
}

/// Splits a content path, refusing segments that would leave the store root.
fn content_segments(content_path: &str) -> Result<Vec<String>> {
    let segments = path::split(content_path);
    if segments.iter().any(|s| s == "." || s == "..") {
        return Err(Error::InvalidAssetPath(content_path.to_string()));
    }
    Ok(segments)
}
