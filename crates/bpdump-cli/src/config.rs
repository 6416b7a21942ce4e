//! Project configuration (`.bpdump/config.json`).
//!
//! Every field has a default, so a partial or missing file is fine.
//! Command-line flags win over file values.

use bpdump_graph::{ExtractOptions, LinkKind, LinksMeta};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

pub const CONFIG_DIR: &str = ".bpdump";
pub const CONFIG_FILE: &str = "config.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub version: String,
    /// Snapshot store directory, relative to the working directory.
    pub store_root: PathBuf,
    pub defaults: Defaults,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            store_root: PathBuf::from("Content"),
            defaults: Defaults::default(),
        }
    }
}

/// Extraction and output settings used when no flag is given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    pub link_kind: LinkKind,
    pub links_meta: LinksMeta,
    pub links_only: bool,
    pub diagnostics: bool,
    pub stamp_time: bool,
    pub pretty: bool,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            link_kind: LinkKind::All,
            links_meta: LinksMeta::None,
            links_only: false,
            diagnostics: false,
            stamp_time: false,
            pretty: true,
        }
    }
}

/// Values given on the command line. Boolean flags can only switch a
/// setting on; `compact` switches pretty printing off.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub link_kind: Option<LinkKind>,
    pub links_meta: Option<LinksMeta>,
    pub links_only: bool,
    pub diagnostics: bool,
    pub stamp_time: bool,
    pub compact: bool,
}

impl Defaults {
    pub fn merge(&self, overrides: &Overrides) -> Defaults {
        Defaults {
            link_kind: overrides.link_kind.unwrap_or(self.link_kind),
            links_meta: overrides.links_meta.unwrap_or(self.links_meta),
            links_only: self.links_only || overrides.links_only,
            diagnostics: self.diagnostics || overrides.diagnostics,
            stamp_time: self.stamp_time || overrides.stamp_time,
            pretty: self.pretty && !overrides.compact,
        }
    }

    pub fn extract_options(&self, graph_name: Option<&str>) -> ExtractOptions {
        ExtractOptions::new()
            .with_graph_name(graph_name.unwrap_or_default())
            .links_only(self.links_only)
            .with_link_kind(self.link_kind)
            .with_links_meta(self.links_meta)
            .with_diagnostics(self.diagnostics)
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads `explicit` if given (it must exist), otherwise the project
    /// config under `base` if there is one, otherwise the defaults.
    pub fn resolve(explicit: Option<&Path>, base: &Path) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            debug!("Using config {}", path.display());
            return Self::load(path);
        }

        let path = Self::path_in(base);
        if path.is_file() {
            debug!("Using config {}", path.display());
            Self::load(&path)
        } else {
            debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn path_in(base: &Path) -> PathBuf {
        base.join(CONFIG_DIR).join(CONFIG_FILE)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
