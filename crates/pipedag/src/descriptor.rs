//! The task shape handed to pipeline consumers.

use pipedag_graph::TaskNode;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;

/// A task's identity and kind, in dependency-resolved listings.
///
/// Descriptors carry only what consumers need to enumerate a pipeline;
/// the full node, attributes included, stays in the
/// [`TaskGraph`](pipedag_graph::TaskGraph).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TaskDescriptor {
    /// Unique task identifier.
    pub id: String,
    /// Task kind, empty when the graph text never declared one.
    pub kind: String,
}

impl From<&TaskNode> for TaskDescriptor {
    fn from(node: &TaskNode) -> Self {
        Self {
            id: node.id.clone(),
            kind: node.kind.clone(),
        }
    }
}

impl fmt::Display for TaskDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.kind.is_empty() {
            write!(f, "{}", self.id)
        } else {
            write!(f, "{} {}", self.id, self.kind)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_node_copies_identity_and_kind() {
        let node = TaskNode::new("ds1", "http");
        let descriptor = TaskDescriptor::from(&node);
        assert_eq!(descriptor.id, "ds1");
        assert_eq!(descriptor.kind, "http");
    }

    #[test]
    fn test_display_shows_id_and_kind() {
        let descriptor = TaskDescriptor {
            id: "ds1_parse".to_string(),
            kind: "jsonparse".to_string(),
        };
        assert_eq!(descriptor.to_string(), "ds1_parse jsonparse");
    }

    #[test]
    fn test_display_omits_empty_kind() {
        let descriptor = TaskDescriptor {
            id: "answer".to_string(),
            kind: String::new(),
        };
        assert_eq!(descriptor.to_string(), "answer");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_descriptor_serializes_to_json() {
        let descriptor = TaskDescriptor {
            id: "ds1".to_string(),
            kind: "http".to_string(),
        };
        let json = serde_json::to_string(&descriptor).unwrap();
        assert_eq!(json, r#"{"id":"ds1","kind":"http"}"#);
    }
}
