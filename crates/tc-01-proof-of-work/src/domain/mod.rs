//! Domain layer - pure proof-of-work consensus logic
//!
//! Everything here is a pure function of the block index and the consensus
//! parameters: no I/O, no shared mutable state, no async. Calls may run
//! concurrently from any number of validation threads.
//!
//! ## Modules
//!
//! - [`arith`]: 256-bit wrapping integer
//! - [`compact`]: compact target codec
//! - [`chain`]: same-algorithm ancestor walk
//! - [`difficulty`]: next required difficulty
//! - [`proof`]: hash against target check
//! - [`work`]: block and chain work

pub mod arith;
pub mod chain;
pub mod compact;
pub mod difficulty;
pub mod proof;
pub mod work;

#[cfg(test)]
pub(crate) mod test_support;

pub use arith::ArithU256;
pub use chain::{last_block_for_algo, lookup};
pub use compact::{decode_compact, encode_compact, target_from_compact, DecodedCompact};
pub use difficulty::{
    difficulty, next_required_difficulty, next_work_required, CandidateHeader, Retarget,
    RetargetOutcome, HISTORICAL_OVERRIDE_END, HISTORICAL_OVERRIDE_START,
};
pub use proof::{check_block_hash, check_proof_of_work};
pub use work::{block_proof, block_work, chain_work, select_best_tip, ChainSnapshot};
