//! The configuration tree shared by base documents and override trees.

use std::collections::BTreeMap;

/// Keyed children of a [`Node::Mapping`].
pub type Mapping = BTreeMap<String, Node>;

/// A node in a configuration tree.
///
/// Base trees are decoded from a boot document, override trees are built from
/// assignments. Both are rooted at a [`Node::Mapping`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A leaf value in its textual form
    Scalar(String),
    /// Keyed children
    Mapping(Mapping),
    /// Ordered children
    Sequence(Vec<Node>),
}

/// The variant of a [`Node`], without its contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Scalar,
    Mapping,
    Sequence,
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Scalar => write!(f, "scalar"),
            Self::Mapping => write!(f, "mapping"),
            Self::Sequence => write!(f, "sequence"),
        }
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::empty_mapping()
    }
}

impl Node {
    pub fn empty_mapping() -> Self {
        Self::Mapping(Mapping::new())
    }

    pub fn scalar(value: impl Into<String>) -> Self {
        Self::Scalar(value.into())
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Scalar(_) => NodeKind::Scalar,
            Self::Mapping(_) => NodeKind::Mapping,
            Self::Sequence(_) => NodeKind::Sequence,
        }
    }

    /// Whether both nodes are the same variant.
    pub fn same_kind(&self, other: &Node) -> bool {
        self.kind() == other.kind()
    }

    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Self::Scalar(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Self::Mapping(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_mapping_mut(&mut self) -> Option<&mut Mapping> {
        match self {
            Self::Mapping(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Node]> {
        match self {
            Self::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Look up a child by mapping key.
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.as_mapping()?.get(key)
    }

    /// Look up a child by sequence index.
    pub fn get_index(&self, index: usize) -> Option<&Node> {
        self.as_sequence()?.get(index)
    }

    /// Whether the node is an empty mapping, the shape of "no overrides".
    pub fn is_empty_mapping(&self) -> bool {
        matches!(self, Self::Mapping(map) if map.is_empty())
    }

    /// Return a copy of the tree with every mapping key lower-cased.
    ///
    /// Keys that collide after lower-casing keep the value of the key that
    /// sorts last.
    pub fn lowercase_keys(&self) -> Node {
        match self {
            Self::Scalar(value) => Self::Scalar(value.clone()),
            Self::Mapping(map) => Self::Mapping(
                map.iter()
                    .map(|(key, value)| (key.to_lowercase(), value.lowercase_keys()))
                    .collect(),
            ),
            Self::Sequence(items) => {
                Self::Sequence(items.iter().map(Node::lowercase_keys).collect())
            }
        }
    }

    /// Ensure this slot holds a mapping, replacing any other variant with an
    /// empty one.
    pub(crate) fn ensure_mapping(&mut self) -> &mut Mapping {
        if !matches!(self, Self::Mapping(_)) {
            *self = Self::empty_mapping();
        }
        match self {
            Self::Mapping(map) => map,
            _ => unreachable!("slot was just replaced with a mapping"),
        }
    }

    /// Ensure this slot holds a sequence of at least `len` items, padding with
    /// empty mappings and replacing any other variant.
    pub(crate) fn ensure_sequence(&mut self, len: usize) -> &mut Vec<Node> {
        if !matches!(self, Self::Sequence(_)) {
            *self = Self::Sequence(Vec::new());
        }
        match self {
            Self::Sequence(items) => {
                if items.len() < len {
                    items.resize_with(len, Node::empty_mapping);
                }
                items
            }
            _ => unreachable!("slot was just replaced with a sequence"),
        }
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Self::Scalar(value.to_string())
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Self::Scalar(value)
    }
}

impl From<Mapping> for Node {
    fn from(value: Mapping) -> Self {
        Self::Mapping(value)
    }
}

impl From<Vec<Node>> for Node {
    fn from(value: Vec<Node>) -> Self {
        Self::Sequence(value)
    }
}

impl<K: Into<String>> FromIterator<(K, Node)> for Node {
    fn from_iter<I: IntoIterator<Item = (K, Node)>>(iter: I) -> Self {
        Self::Mapping(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
