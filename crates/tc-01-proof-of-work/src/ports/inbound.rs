//! Inbound ports (driving side - API)

use crate::domain::{ArithU256, CandidateHeader, ChainSnapshot};
use crate::error::Result;
use crate::ports::BlockIndexReader;
use shared_types::{Hash, NodeKey, PowAlgorithm};

/// Primary port: proof-of-work consensus checks
///
/// Block acceptance uses `next_required_difficulty` and `check_proof_of_work`;
/// chain selection uses the work methods.
pub trait ProofOfWorkApi: Send + Sync {
    /// Compact bits the next block of `candidate.algo` must carry
    fn next_required_difficulty(
        &self,
        index: &dyn BlockIndexReader,
        last: Option<NodeKey>,
        candidate: &CandidateHeader,
    ) -> Result<u32>;

    /// Check a block hash against its claimed bits
    fn check_proof_of_work(&self, hash: &Hash, bits: u32, algo: PowAlgorithm) -> Result<()>;

    /// Raw work represented by `bits`
    fn block_work(&self, bits: u32) -> ArithU256;

    /// Work of `bits` normalised for `algo`
    fn block_proof(&self, bits: u32, algo: PowAlgorithm) -> ArithU256;

    /// Cumulative normalised work from genesis up to the snapshot tip
    fn chain_work(&self, index: &dyn BlockIndexReader, snapshot: ChainSnapshot)
        -> Result<ArithU256>;

    /// Heavier of two chain tips; the incumbent wins ties
    fn select_best_tip(
        &self,
        index: &dyn BlockIndexReader,
        incumbent: ChainSnapshot,
        challenger: ChainSnapshot,
    ) -> Result<ChainSnapshot>;
}
