//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::arena::NodeId;

/// Domain errors represent violations of the question tree's structure.
/// These are independent of terminal and config concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("node handle is stale or unknown: {0}")]
    StaleNode(NodeId),

    #[error("node is a leaf, not a question: {0}")]
    NotAQuestion(NodeId),

    #[error("node is a question, not a leaf: {0}")]
    NotALeaf(NodeId),

    #[error("item name must not be empty")]
    EmptyItem,

    #[error("distinguishing question must not be empty")]
    EmptyQuestion,
}

/// Result type for question tree operations.
pub type DomainResult<T> = Result<T, DomainError>;
