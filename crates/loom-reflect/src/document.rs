//! Document-tree helpers.
//!
//! Loom never parses text itself: the document tree is [`serde_json::Value`],
//! aliased here as [`Node`]. The helpers below cover the few shape checks the
//! property walkers need and turn shape mismatches into
//! [`ReflectError::Malformed`].

use serde_json::Map;

use crate::ReflectError;

/// A node of the document tree (object, array or scalar).
pub type Node = serde_json::Value;

/// Human-readable name of a node's kind, used in error messages.
pub fn kind_of(node: &Node) -> &'static str {
    match node {
        Node::Null => "null",
        Node::Bool(_) => "bool",
        Node::Number(_) => "number",
        Node::String(_) => "string",
        Node::Array(_) => "array",
        Node::Object(_) => "object",
    }
}

/// Borrow `node` as an object, replacing it with an empty one first if it is
/// anything else.
///
/// Existing keys of an object node are kept, so a writer can put a type tag
/// into a node before handing it to a property map.
pub fn ensure_object(node: &mut Node) -> &mut Map<String, Node> {
    if !node.is_object() {
        *node = Node::Object(Map::new());
    }
    match node {
        Node::Object(map) => map,
        _ => unreachable!("node was replaced by an object above"),
    }
}

/// Borrow `node` as an object or report what was found instead.
pub fn expect_object(node: &Node) -> Result<&Map<String, Node>, ReflectError> {
    node.as_object().ok_or_else(|| {
        ReflectError::malformed(format!("expected object, found {}", kind_of(node)))
    })
}

/// Borrow `node` as an array or report what was found instead.
pub fn expect_array(node: &Node) -> Result<&Vec<Node>, ReflectError> {
    node.as_array().ok_or_else(|| {
        ReflectError::malformed(format!("expected array, found {}", kind_of(node)))
    })
}

/// Borrow `node` as a string or report what was found instead.
pub fn expect_str(node: &Node) -> Result<&str, ReflectError> {
    node.as_str().ok_or_else(|| {
        ReflectError::malformed(format!("expected string, found {}", kind_of(node)))
    })
}
