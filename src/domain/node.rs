//! Tree node entity and identifier normalization

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque node identifier.
///
/// Ids compare as strings. Numeric input is normalized to its decimal
/// string form, so `1` and `"1"` name the same node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "RawId", into = "String")]
pub struct NodeId(String);

/// Identifier as it appears in seed data: a number or a string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawId {
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
}

impl From<RawId> for NodeId {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Int(n) => NodeId::from(n),
            RawId::UInt(n) => NodeId::from(n),
            RawId::Float(f) => NodeId(f.to_string()),
            RawId::Text(s) => NodeId(s),
        }
    }
}

impl NodeId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Integer value of the id, if it is one.
    pub fn as_integer(&self) -> Option<i64> {
        self.0.parse().ok()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<NodeId> for String {
    fn from(id: NodeId) -> Self {
        id.0
    }
}

impl From<&NodeId> for NodeId {
    fn from(id: &NodeId) -> Self {
        id.clone()
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        NodeId(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        NodeId(s)
    }
}

macro_rules! node_id_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for NodeId {
                fn from(n: $t) -> Self {
                    NodeId(n.to_string())
                }
            }
        )*
    };
}

node_id_from_int!(i32, i64, u32, u64, usize);

/// A labeled node linked to its parent by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub id: NodeId,
    /// Parent id, `None` for a root
    #[serde(default)]
    pub parent: Option<NodeId>,
    pub label: String,
}

impl TreeNode {
    pub fn new(id: impl Into<NodeId>, parent: Option<NodeId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parent,
            label: label.into(),
        }
    }

    pub fn root(id: impl Into<NodeId>, label: impl Into<String>) -> Self {
        Self::new(id, None, label)
    }

    pub fn child(
        id: impl Into<NodeId>,
        parent: impl Into<NodeId>,
        label: impl Into<String>,
    ) -> Self {
        Self::new(id, Some(parent.into()), label)
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// True if this node's parent is `id`.
    pub fn is_child_of(&self, id: &str) -> bool {
        self.parent.as_ref().is_some_and(|p| p.as_str() == id)
    }
}

impl fmt::Display for TreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.label, self.id)
    }
}
