//! Proof-of-work validation
//!
//! A block passes when its hash, read as a 256-bit number, does not exceed
//! the target its bits claim, and that target is itself within the
//! algorithm's limit.

use super::arith::ArithU256;
use super::compact::decode_compact;
use crate::config::ConsensusParameters;
use crate::error::{PowError, Result};
use shared_types::{Hash, PowAlgorithm};
use tracing::warn;

/// Check `hash` against the target claimed by `bits`.
///
/// Always succeeds when the network skips proof-of-work checks.
pub fn check_proof_of_work(
    hash: &ArithU256,
    bits: u32,
    algo: PowAlgorithm,
    params: &ConsensusParameters,
) -> Result<()> {
    if params.skip_proof_of_work_check {
        return Ok(());
    }

    let target = match decode_compact(bits).target() {
        Ok(target) => target,
        Err(err) => return Err(reject(err, algo, bits)),
    };
    if target > params.pow_limit(algo) {
        return Err(reject(PowError::TargetAboveLimit { algo }, algo, bits));
    }
    if *hash > target {
        return Err(reject(PowError::HashAboveTarget, algo, bits));
    }
    Ok(())
}

/// [`check_proof_of_work`] for a hash in internal byte order.
pub fn check_block_hash(
    hash: &Hash,
    bits: u32,
    algo: PowAlgorithm,
    params: &ConsensusParameters,
) -> Result<()> {
    check_proof_of_work(&ArithU256::from_hash(hash), bits, algo, params)
}

fn reject(err: PowError, algo: PowAlgorithm, bits: u32) -> PowError {
    warn!(
        algo = %algo,
        algo_id = algo.id(),
        bits = %format_args!("{:08x}", bits),
        reason = err.kind(),
        "proof of work rejected: {}", err
    );
    err
}
