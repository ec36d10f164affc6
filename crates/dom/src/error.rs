//! Error types for DOM operations
//!
//! Simple, flat error hierarchy. Every structural failure is checked before
//! any link field is written, so an `Err` never leaves a half-done mutation.

use crate::types::NodeId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DomError>;

#[derive(Debug, Error)]
pub enum DomError {
    #[error("Allocation failed while growing the tree storage")]
    AllocationFailure,

    #[error("Inserting {child} under {parent} would make a node its own ancestor")]
    CycleViolation { parent: NodeId, child: NodeId },

    #[error("Node {0} has no parent")]
    NoParent(NodeId),

    #[error("Void element {0} cannot have children")]
    VoidElementChild(NodeId),

    #[error("Attribute not found: {0}")]
    AttributeNotFound(String),

    #[error("Node not found: {0}")]
    NodeNotFound(u32),

    #[error("Invalid node type: expected {expected}, got {actual}")]
    InvalidNodeType { expected: String, actual: String },

    #[error("Parser failed with status {status}: {message}")]
    ParserFailure { status: u32, message: String },

    #[error("Invalid parse options: {0}")]
    InvalidOptions(#[from] serde_json::Error),
}

impl From<std::collections::TryReserveError> for DomError {
    fn from(_: std::collections::TryReserveError) -> Self {
        DomError::AllocationFailure
    }
}
