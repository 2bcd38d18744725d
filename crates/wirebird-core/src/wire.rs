//! Minimal wire-protocol node and envelope model.
//!
//! Only the pieces the session core needs: enough of the protocol node tree
//! to frame an info query toward the server. Encoding to the binary wire
//! format happens inside the transport implementation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The server's well-known address.
pub const SERVER_ADDR: &str = "s.wirebird.net";

/// Attribute value on a protocol node. Integers serialize as decimal on the
/// wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Int(i64),
    Text(String),
}

impl AttrValue {
    /// The attribute as an integer, parsing textual values if needed.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            Self::Text(text) => text.parse().ok(),
        }
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Node attributes keyed by name.
pub type Attrs = BTreeMap<String, AttrValue>;

/// Body of a protocol node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeContent {
    #[default]
    None,
    Bytes(Vec<u8>),
    Children(Vec<Node>),
}

/// One node of the protocol tree: tag, attributes, body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub tag: String,
    #[serde(default)]
    pub attrs: Attrs,
    #[serde(default)]
    pub content: NodeContent,
}

impl Node {
    /// Create an empty node with the given tag.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Attrs::new(),
            content: NodeContent::None,
        }
    }

    /// Set one attribute.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    /// Set the node body to a byte payload.
    pub fn with_bytes(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.content = NodeContent::Bytes(bytes.into());
        self
    }

    /// Look up an attribute by name.
    pub fn attr(&self, name: &str) -> Option<&AttrValue> {
        self.attrs.get(name)
    }

    /// The node body, if it is a byte payload.
    pub fn bytes(&self) -> Option<&[u8]> {
        match &self.content {
            NodeContent::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }
}

/// Request verb of an info query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IqType {
    Get,
    Set,
}

/// An info/query request envelope.
///
/// The session core uses this purely for addressing and framing: the queries
/// it dispatches never wait for the server's reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfoQuery {
    pub namespace: String,
    pub query_type: IqType,
    pub to: String,
    pub content: Vec<Node>,
}

impl InfoQuery {
    /// Frame one telemetry report toward the server: a single `add` node
    /// stamped with the current Unix time, body = `payload` verbatim.
    ///
    /// The shape is compatibility-critical; the server-side collector
    /// expects exactly this envelope.
    pub fn telemetry_report(payload: &[u8]) -> Self {
        Self {
            namespace: "w:stats".to_string(),
            query_type: IqType::Set,
            to: SERVER_ADDR.to_string(),
            content: vec![Node::new("add")
                .with_attr("t", chrono::Utc::now().timestamp())
                .with_bytes(payload)],
        }
    }
}
