//! Link identity keys.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Separator used when a key is rendered as text.
pub const KEY_SEPARATOR: char = '|';

/// Identity of a canonical link: `(from node, from pin, to node, to pin)`.
///
/// Keys compare component by component, so two different endpoint tuples
/// never collide, even if an id contained [`KEY_SEPARATOR`]. Ordering is
/// lexicographic over the four components.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LinkKey {
    pub from_node: String,
    pub from_pin: String,
    pub to_node: String,
    pub to_pin: String,
}

impl LinkKey {
    pub fn new(
        from_node: impl Into<String>,
        from_pin: impl Into<String>,
        to_node: impl Into<String>,
        to_pin: impl Into<String>,
    ) -> Self {
        Self {
            from_node: from_node.into(),
            from_pin: from_pin.into(),
            to_node: to_node.into(),
            to_pin: to_pin.into(),
        }
    }
}

impl fmt::Display for LinkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{sep}{}{sep}{}{sep}{}",
            self.from_node,
            self.from_pin,
            self.to_node,
            self.to_pin,
            sep = KEY_SEPARATOR
        )
    }
}

/// Keys already emitted in one graph.
///
/// Backed by an ordered set so that the key set itself can be compared or
/// printed deterministically.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LinkKeySet {
    keys: BTreeSet<LinkKey>,
}

impl LinkKeySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a key. Returns `false` if it was already present.
    pub fn insert(&mut self, key: &LinkKey) -> bool {
        if self.keys.contains(key) {
            return false;
        }
        self.keys.insert(key.clone())
    }

    pub fn contains(&self, key: &LinkKey) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Keys in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &LinkKey> {
        self.keys.iter()
    }
}
