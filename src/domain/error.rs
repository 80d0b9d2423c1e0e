//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::node::NodeId;

/// Store errors represent violated structural preconditions.
/// Every variant carries the offending id.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("node already exists: {0}")]
    DuplicateId(NodeId),

    #[error("parent not found: {parent} (adding node {id})")]
    ParentNotFound { id: NodeId, parent: NodeId },

    #[error("node not found: {0}")]
    NotFound(NodeId),

    #[error("new parent not found: {parent} (updating node {id})")]
    NewParentNotFound { id: NodeId, parent: NodeId },

    #[error("cycle detected: node {id} cannot be moved under its own descendant {parent}")]
    Cycle { id: NodeId, parent: NodeId },
}

impl StoreError {
    /// The id of the node the failed operation targeted.
    pub fn id(&self) -> &NodeId {
        match self {
            StoreError::DuplicateId(id) | StoreError::NotFound(id) => id,
            StoreError::ParentNotFound { id, .. }
            | StoreError::NewParentNotFound { id, .. }
            | StoreError::Cycle { id, .. } => id,
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
