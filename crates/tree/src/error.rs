use crate::node::{NodeId, NodeType};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("Index {index} is out of range for a branch with {len} nodes")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Operation '{operation}' does not accept a {found:?} node")]
    InvalidNodeKind {
        operation: &'static str,
        found: NodeType,
    },

    #[error("Node {0} does not belong to this document")]
    UnknownNode(NodeId),

    #[error("Node {0} already has a parent")]
    NodeAlreadyParented(NodeId),

    #[error("Document already has a root element")]
    DuplicateRootElement,

    #[error("Adding node {0} would make it its own ancestor")]
    WouldCreateCycle(NodeId),
}
