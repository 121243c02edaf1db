//! # Core Domain Entities
//!
//! Defines the consensus-relevant view of an accepted block as kept by the
//! block index.
//!
//! ## Clusters
//!
//! - **Identity**: `Hash`, `NodeKey`
//! - **Proof of Work**: `PowAlgorithm`
//! - **Index**: `BlockIndexNode`

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::UnknownAlgorithm;

// =============================================================================
// CLUSTER A: IDENTITY
// =============================================================================

/// A 32-byte block hash.
pub type Hash = [u8; 32];

/// Stable key of a node inside the [`crate::BlockIndex`] arena.
///
/// Keys are handed out in insertion order and stay valid for the lifetime of
/// the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeKey(pub u32);

impl NodeKey {
    /// Position of the node in the arena.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// =============================================================================
// CLUSTER B: PROOF OF WORK
// =============================================================================

/// Proof-of-work hashing scheme that produced a block.
///
/// The three schemes interleave on one chain; each keeps its own difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum PowAlgorithm {
    /// Double SHA-256.
    Sha256d = 0,
    /// Scrypt (N=1024, r=1, p=1).
    Scrypt = 1,
    /// Groestl-512 truncated to 256 bits.
    Groestl = 2,
}

impl PowAlgorithm {
    /// Number of supported algorithms.
    pub const COUNT: usize = 3;

    /// All algorithms in identifier order.
    pub const ALL: [PowAlgorithm; Self::COUNT] =
        [PowAlgorithm::Sha256d, PowAlgorithm::Scrypt, PowAlgorithm::Groestl];

    /// Header-level identifier.
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Lowercase name used in logs and configuration.
    pub fn name(self) -> &'static str {
        match self {
            PowAlgorithm::Sha256d => "sha256d",
            PowAlgorithm::Scrypt => "scrypt",
            PowAlgorithm::Groestl => "groestl",
        }
    }
}

impl fmt::Display for PowAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u8> for PowAlgorithm {
    type Error = UnknownAlgorithm;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        PowAlgorithm::ALL
            .get(id as usize)
            .copied()
            .ok_or_else(|| UnknownAlgorithm(id.to_string()))
    }
}

impl FromStr for PowAlgorithm {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PowAlgorithm::ALL
            .into_iter()
            .find(|algo| algo.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownAlgorithm(s.to_string()))
    }
}

// =============================================================================
// CLUSTER C: INDEX
// =============================================================================

/// Consensus metadata of one accepted block (not the full block).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockIndexNode {
    /// Block hash (identity of the block).
    pub hash: Hash,
    /// Height above genesis.
    pub height: u64,
    /// Header timestamp (Unix epoch seconds).
    pub time: u32,
    /// Compact difficulty target from the header.
    pub bits: u32,
    /// Algorithm that mined this block.
    pub algo: PowAlgorithm,
    /// Parent node, absent only for genesis.
    pub parent: Option<NodeKey>,
}

impl BlockIndexNode {
    /// Header timestamp widened for signed time arithmetic.
    pub fn block_time(&self) -> i64 {
        i64::from(self.time)
    }

    /// True for the root of the index.
    pub fn is_genesis(&self) -> bool {
        self.parent.is_none()
    }
}
