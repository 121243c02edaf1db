//! Error types for the proof-of-work subsystem

use shared_types::{NodeKey, PowAlgorithm};
use thiserror::Error;

/// Result type alias for proof-of-work operations
pub type Result<T> = std::result::Result<T, PowError>;

/// Why a compact target cannot be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedTarget {
    /// Sign bit set on a non-zero mantissa
    Negative,
    /// Exponent places the target beyond 256 bits
    Overflow,
    /// Target decodes to zero
    Zero,
}

impl MalformedTarget {
    /// Short label for logs and metrics.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Negative => "negative",
            Self::Overflow => "overflow",
            Self::Zero => "zero",
        }
    }
}

/// Errors that reject a block's proof of work.
///
/// Every variant is fatal to the block being checked and to nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PowError {
    /// Compact bits do not describe a usable target
    #[error("nBits below minimum work: {} target", .0.as_str())]
    MalformedTarget(MalformedTarget),

    /// Target is easier than the algorithm's limit
    #[error("nBits below minimum work: target above {algo} limit")]
    TargetAboveLimit {
        /// Algorithm whose limit was exceeded
        algo: PowAlgorithm,
    },

    /// Block hash does not meet the claimed target
    #[error("hash doesn't match nBits")]
    HashAboveTarget,

    /// Block index has no node under this key
    #[error("Unknown block index node: {0}")]
    UnknownNode(NodeKey),
}

impl PowError {
    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedTarget(kind) => kind.as_str(),
            Self::TargetAboveLimit { .. } => "above_limit",
            Self::HashAboveTarget => "hash_above_target",
            Self::UnknownNode(_) => "unknown_node",
        }
    }
}

/// Errors in consensus parameter sets.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Parameter value breaks an arithmetic precondition
    #[error("Invalid consensus parameter {field}: {reason}")]
    InvalidParameter {
        /// Offending field
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },

    /// Network name not recognised
    #[error("Unknown network: {0}")]
    UnknownNetwork(String),

    /// Parameter document could not be parsed
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Parameter file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
