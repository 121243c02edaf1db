//! Block and chain work
//!
//! The work of a block is the expected number of hashes needed to meet its
//! target, `2^256 / (target + 1)`. Proof weights that work by the
//! algorithm's work factor so chains mined with different algorithms can
//! be compared. The heaviest chain wins fork choice.

use super::arith::ArithU256;
use super::chain::lookup;
use super::compact::target_from_compact;
use crate::config::ConsensusParameters;
use crate::error::Result;
use crate::ports::BlockIndexReader;
use serde::{Deserialize, Serialize};
use shared_types::{NodeKey, PowAlgorithm};
use tracing::debug;

/// Explicit handle on a chain tip
///
/// Chain selection receives the tip it should judge instead of reading a
/// shared "current tip". A snapshot may be stale by the time the call
/// returns; it only has to name a node that is in the index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChainSnapshot {
    /// Last block of the chain
    pub tip: NodeKey,
}

impl ChainSnapshot {
    /// Snapshot of the chain ending at `tip`.
    pub fn new(tip: NodeKey) -> Self {
        Self { tip }
    }
}

/// Work represented by `bits`, zero for unusable targets.
///
/// `2^256` does not fit in 256 bits, so this uses
/// `2^256 / (t + 1) == !t / (t + 1) + 1`.
pub fn block_work(bits: u32) -> ArithU256 {
    let Ok(target) = target_from_compact(bits) else {
        return ArithU256::ZERO;
    };
    (!target)
        .checked_div(target + ArithU256::ONE)
        .map_or(ArithU256::ZERO, |work| work + ArithU256::ONE)
}

/// [`block_work`] weighted by the work factor of `algo`.
pub fn block_proof(bits: u32, algo: PowAlgorithm, params: &ConsensusParameters) -> ArithU256 {
    block_work(bits) * params.work_factor(algo)
}

/// Sum of [`block_proof`] from genesis up to the snapshot tip.
pub fn chain_work<R>(
    index: &R,
    snapshot: ChainSnapshot,
    params: &ConsensusParameters,
) -> Result<ArithU256>
where
    R: BlockIndexReader + ?Sized,
{
    let mut total = ArithU256::ZERO;
    let mut cursor = Some(snapshot.tip);
    while let Some(key) = cursor {
        let node = lookup(index, key)?;
        total += block_proof(node.bits, node.algo, params);
        cursor = index.parent(key);
    }
    Ok(total)
}

/// The snapshot with more cumulative work. Ties keep the incumbent.
pub fn select_best_tip<R>(
    index: &R,
    incumbent: ChainSnapshot,
    challenger: ChainSnapshot,
    params: &ConsensusParameters,
) -> Result<ChainSnapshot>
where
    R: BlockIndexReader + ?Sized,
{
    let incumbent_work = chain_work(index, incumbent, params)?;
    let challenger_work = chain_work(index, challenger, params)?;
    if challenger_work > incumbent_work {
        debug!(
            from = %incumbent.tip,
            to = %challenger.tip,
            work = %challenger_work,
            "switching to heavier chain"
        );
        Ok(challenger)
    } else {
        Ok(incumbent)
    }
}
