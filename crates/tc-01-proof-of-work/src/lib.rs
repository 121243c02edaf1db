//! # Trinity Chain - Proof-of-Work Consensus (Subsystem 01)
//!
//! **Bounded Context:** Multi-Algorithm Proof of Work
//! **Architecture Compliance:** DDD + Hexagonal + TDD
//!
//! ## Purpose
//!
//! Decides, for every candidate block of a three-algorithm chain
//! (SHA-256d, Scrypt, Groestl):
//! - which compact target ("nBits") it must carry
//! - whether its hash meets that target
//! - how much work it adds when comparing competing chains
//!
//! Every node must reach byte-identical answers, so all arithmetic is
//! fixed-width 256-bit and every rounding step is explicit.
//!
//! ## Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Service                                            │
//! │  - PowConsensusService: parameters + metrics        │
//! └─────────────────────────────────────────────────────┘
//!                         │
//! ┌─────────────────────────────────────────────────────┐
//! │  Ports                                              │
//! │  - Inbound: ProofOfWorkApi                          │
//! │  - Outbound: BlockIndexReader                       │
//! └─────────────────────────────────────────────────────┘
//!                         │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain (Pure Logic)                                │
//! │  - ArithU256, compact codec                         │
//! │  - Per-algorithm retarget                           │
//! │  - Proof check, block and chain work                │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! ## Critical Invariants
//!
//! 1. **Codec**: compact encode/decode is bit-exact for all 2^32 inputs
//! 2. **Limit**: no retarget produces a target above the algorithm limit
//! 3. **Validity**: negative, zero and overflowing targets never pass
//! 4. **Work**: a lower target always carries more work
//!
//! ## Usage Example
//!
//! ```rust
//! use shared_types::{BlockIndex, PowAlgorithm};
//! use tc_01_proof_of_work::{
//!     CandidateHeader, ConsensusParameters, PowConsensusService, ProofOfWorkApi,
//! };
//!
//! let service = PowConsensusService::new(ConsensusParameters::main()).unwrap();
//! let mut index = BlockIndex::new();
//! let genesis = index
//!     .append(None, [0u8; 32], 1_400_000_000, 0x1d00_ffff, PowAlgorithm::Sha256d)
//!     .unwrap();
//!
//! let candidate = CandidateHeader {
//!     time: 1_400_000_090,
//!     bits: 0x1e0f_ffff,
//!     algo: PowAlgorithm::Scrypt,
//! };
//! let bits = service
//!     .next_required_difficulty(&index, Some(genesis), &candidate)
//!     .unwrap();
//! assert_eq!(bits, 0x1e0f_ffff);
//! ```
//!
//! ## Module Structure
//!
//! - [`domain`]: Pure consensus logic
//! - [`ports`]: Hexagonal architecture interfaces (inbound/outbound)
//! - [`adapters`]: Block index binding
//! - [`config`]: Network parameter sets
//! - [`service`]: Port implementation

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Adapters binding the ports to concrete collaborators
pub mod adapters;
pub mod config;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod service;

/// Subsystem identifier
pub const SUBSYSTEM_ID: u8 = 1;

pub use config::{AdjustmentBounds, AlgorithmParams, ConsensusParameters, Network, PerAlgorithm};
pub use error::{ConfigError, MalformedTarget, PowError, Result};
pub use metrics::{Metrics, MetricsSnapshot};
pub use service::PowConsensusService;

pub use domain::{
    block_proof, block_work, chain_work, check_block_hash, check_proof_of_work, decode_compact,
    difficulty, encode_compact, last_block_for_algo, next_required_difficulty,
    next_work_required, select_best_tip, target_from_compact, ArithU256, CandidateHeader,
    ChainSnapshot, DecodedCompact, Retarget, RetargetOutcome,
};

pub use ports::{BlockIndexReader, ProofOfWorkApi};
