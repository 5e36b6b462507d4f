//! Document error types

use thiserror::Error;

use crate::document::NodeId;

/// Errors produced by document operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// The node id does not belong to this document
    #[error("unknown node {0:?}")]
    UnknownNode(NodeId),

    /// The node was removed from the document
    #[error("node {0:?} has been removed from the document")]
    Removed(NodeId),

    /// The operation would make a node its own ancestor
    #[error("cannot append {child:?} under its own descendant {parent:?}")]
    Cycle { parent: NodeId, child: NodeId },
}
