//! Extraction settings.
//!
//! [`ExtractOptions`] is a plain value. Every extraction call takes it by
//! reference, so running the same container with different settings needs
//! no reset step.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {what} '{value}' (expected one of: {expected})")]
pub struct ParseOptionError {
    what: &'static str,
    value: String,
    expected: &'static str,
}

/// Which links to emit, judged by the output pin's category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    #[default]
    All,
    /// Execution-flow links only.
    Exec,
    /// Data links only.
    Data,
}

impl LinkKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkKind::All => "all",
            LinkKind::Exec => "exec",
            LinkKind::Data => "data",
        }
    }

    /// Whether links leaving a pin of this exec-ness pass the filter.
    pub fn admits(&self, is_exec: bool) -> bool {
        match self {
            LinkKind::All => true,
            LinkKind::Exec => is_exec,
            LinkKind::Data => !is_exec,
        }
    }
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LinkKind {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(LinkKind::All),
            "exec" => Ok(LinkKind::Exec),
            "data" => Ok(LinkKind::Data),
            _ => Err(ParseOptionError {
                what: "link kind",
                value: s.to_string(),
                expected: "all, exec, data",
            }),
        }
    }
}

/// How much endpoint metadata to inline on each link.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinksMeta {
    #[default]
    None,
    /// Node titles, pin names and pin categories of both ends.
    Min,
}

impl LinksMeta {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinksMeta::None => "none",
            LinksMeta::Min => "min",
        }
    }
}

impl fmt::Display for LinksMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LinksMeta {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(LinksMeta::None),
            "min" => Ok(LinksMeta::Min),
            _ => Err(ParseOptionError {
                what: "links meta level",
                value: s.to_string(),
                expected: "none, min",
            }),
        }
    }
}

/// Whether node and pin detail is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructuralMode {
    #[default]
    Full,
    /// Links only; nodes and pins are still walked but not rendered.
    LinksOnly,
}

impl StructuralMode {
    pub fn from_links_only(links_only: bool) -> Self {
        if links_only {
            StructuralMode::LinksOnly
        } else {
            StructuralMode::Full
        }
    }

    pub fn is_links_only(&self) -> bool {
        matches!(self, StructuralMode::LinksOnly)
    }
}

/// Case-insensitive exact match on graph names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphNameFilter {
    /// Lower-cased, trimmed filter. `None` lets every graph through.
    wanted: Option<String>,
}

impl GraphNameFilter {
    /// Builds a filter. Empty or all-whitespace input matches everything.
    ///
    /// The input is trimmed before the emptiness check, so `"  "` means
    /// "no filter". Tools that test the raw string first treat it as a name
    /// that matches no graph.
    pub fn new(raw: &str) -> Self {
        let trimmed = raw.trim();
        Self {
            wanted: (!trimmed.is_empty()).then(|| trimmed.to_lowercase()),
        }
    }

    pub fn is_any(&self) -> bool {
        self.wanted.is_none()
    }

    pub fn matches(&self, graph_name: &str) -> bool {
        match &self.wanted {
            None => true,
            Some(wanted) => graph_name.to_lowercase() == *wanted,
        }
    }
}

/// Everything that shapes one extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractOptions {
    pub graph_name: GraphNameFilter,
    pub structure: StructuralMode,
    pub link_kind: LinkKind,
    pub links_meta: LinksMeta,
    /// Attach skipped-adjacency counters to every graph.
    pub diagnostics: bool,
}

impl ExtractOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_graph_name(mut self, filter: &str) -> Self {
        self.graph_name = GraphNameFilter::new(filter);
        self
    }

    pub fn links_only(mut self, links_only: bool) -> Self {
        self.structure = StructuralMode::from_links_only(links_only);
        self
    }

    pub fn with_link_kind(mut self, link_kind: LinkKind) -> Self {
        self.link_kind = link_kind;
        self
    }

    pub fn with_links_meta(mut self, links_meta: LinksMeta) -> Self {
        self.links_meta = links_meta;
        self
    }

    pub fn with_diagnostics(mut self, diagnostics: bool) -> Self {
        self.diagnostics = diagnostics;
        self
    }
}
