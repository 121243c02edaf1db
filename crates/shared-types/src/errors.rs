//! # Error Types
//!
//! Defines error types used across crates.

use crate::entities::NodeKey;
use thiserror::Error;

/// Errors raised by the block index when a node cannot be appended or found.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    /// Parent key does not address a node in this index.
    #[error("Parent not found: {0}")]
    ParentNotFound(NodeKey),

    /// Height is not parent height + 1.
    #[error("Invalid height: expected {expected}, got {actual}")]
    InvalidHeight {
        /// Parent height + 1
        expected: u64,
        /// Height supplied with the node
        actual: u64,
    },

    /// A node with this hash is already indexed.
    #[error("Duplicate block hash at {existing}")]
    DuplicateHash {
        /// Key of the node already holding the hash
        existing: NodeKey,
    },

    /// Genesis was already inserted.
    #[error("Genesis already present")]
    GenesisExists,

    /// Arena cannot address more nodes.
    #[error("Index full")]
    IndexFull,
}

/// Algorithm name or identifier not in the supported set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown proof-of-work algorithm: {0}")]
pub struct UnknownAlgorithm(pub String);
