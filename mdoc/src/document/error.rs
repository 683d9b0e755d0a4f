use std::fmt;

use crate::document::NodeId;

/// A caller asked the document for something it cannot do without corrupting
/// node order: a handle that is not in the document, or a reversed range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    NodeNotFound(NodeId),
    InvalidRange { start: NodeId, end: NodeId },
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentError::NodeNotFound(id) => write!(f, "{} is not in this document", id),
            DocumentError::InvalidRange { start, end } => {
                write!(f, "invalid range: {} comes after {}", start, end)
            }
        }
    }
}

impl std::error::Error for DocumentError {}
