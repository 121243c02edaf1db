//! Per-algorithm difficulty retargeting
//!
//! Each algorithm retargets independently from the timestamps of its own
//! last `target_timespan / target_spacing` blocks. Blocks of the other
//! algorithms in between are skipped.
//!
//! **IMPORTANT**: the target is a CEILING on the block hash:
//! - HIGHER target = EASIER
//! - LOWER target = HARDER
//!
//! Blocks arriving too slowly raise the target, blocks arriving too fast
//! lower it. One retarget may move the target only within the adjustment
//! bounds in force at the candidate's height.
//!
//! ## Rule order
//!
//! 1. No previous block: the algorithm's limit.
//! 2. Previous block inside the historical override range: the candidate's
//!    own bits are accepted as-is.
//! 3. Networks with minimum-difficulty blocks: the limit after a long gap,
//!    otherwise the last difficulty not produced by that rule.
//! 4. Windowed retarget, falling back to the limit while the algorithm has
//!    fewer blocks than one window.

use super::arith::ArithU256;
use super::chain::{last_block_for_algo, lookup};
use super::compact::{decode_compact, encode_compact, target_from_compact};
use crate::config::ConsensusParameters;
use crate::error::Result;
use crate::ports::BlockIndexReader;
use serde::{Deserialize, Serialize};
use shared_types::{NodeKey, PowAlgorithm};
use tracing::{debug, trace};

/// First previous-block height at which retargeting is bypassed.
pub const HISTORICAL_OVERRIDE_START: u64 = 915_235;

/// Last previous-block height at which retargeting is bypassed.
pub const HISTORICAL_OVERRIDE_END: u64 = 955_000;

/// Targets wider than this are halved before scaling so that
/// `target * timespan` stays within 256 bits.
const SCALE_SHIFT_THRESHOLD_BITS: u32 = 235;

/// Header fields of the block whose difficulty is being decided
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateHeader {
    /// Claimed block timestamp
    pub time: u32,
    /// Claimed compact target
    pub bits: u32,
    /// Algorithm the block was mined with
    pub algo: PowAlgorithm,
}

impl CandidateHeader {
    /// Timestamp widened for signed arithmetic.
    pub fn block_time(&self) -> i64 {
        i64::from(self.time)
    }
}

/// Which rule decided the required bits
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RetargetOutcome {
    /// No previous block
    Genesis,
    /// Previous block inside the historical override range
    HistoricalOverride,
    /// Minimum-difficulty block after a long gap
    MinDifficultyGap,
    /// Last difficulty not produced by the minimum-difficulty rule
    LastRealDifficulty,
    /// Fewer same-algorithm blocks than one window
    InsufficientHistory,
    /// Windowed retarget
    Retargeted {
        /// Window timespan after clamping (seconds)
        actual_timespan: i64,
    },
}

/// Required bits and the rule that produced them
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Retarget {
    /// Compact target the candidate must carry
    pub bits: u32,
    /// Deciding rule
    pub outcome: RetargetOutcome,
}

impl Retarget {
    fn new(bits: u32, outcome: RetargetOutcome) -> Self {
        Self { bits, outcome }
    }
}

/// Compact bits required of a block building on `last`.
///
/// See [`next_work_required`] for the rules.
pub fn next_required_difficulty<R>(
    index: &R,
    last: Option<NodeKey>,
    candidate: &CandidateHeader,
    params: &ConsensusParameters,
) -> Result<u32>
where
    R: BlockIndexReader + ?Sized,
{
    next_work_required(index, last, candidate, params).map(|retarget| retarget.bits)
}

/// Decide the required bits and report which rule decided them.
///
/// `last` is the block the candidate builds on, `None` for genesis. The
/// minimum-difficulty walk compares bits against the limit of `params`, so
/// replaying old blocks must use the parameters that were in force then.
///
/// # Errors
///
/// [`PowError::UnknownNode`](crate::error::PowError::UnknownNode) if a key
/// reached while walking the chain is missing from `index`.
///
/// # Panics
///
/// If `params` has not passed [`ConsensusParameters::validate`].
pub fn next_work_required<R>(
    index: &R,
    last: Option<NodeKey>,
    candidate: &CandidateHeader,
    params: &ConsensusParameters,
) -> Result<Retarget>
where
    R: BlockIndexReader + ?Sized,
{
    let algo = candidate.algo;
    let limit_bits = params.pow_limit_compact(algo);

    let Some(last_key) = last else {
        return Ok(Retarget::new(limit_bits, RetargetOutcome::Genesis));
    };
    let last = lookup(index, last_key)?;

    if (HISTORICAL_OVERRIDE_START..=HISTORICAL_OVERRIDE_END).contains(&last.height) {
        debug!(
            height = last.height,
            algo = %algo,
            bits = %format_args!("{:08x}", candidate.bits),
            "historical override, accepting claimed bits"
        );
        return Ok(Retarget::new(
            candidate.bits,
            RetargetOutcome::HistoricalOverride,
        ));
    }

    if params.allow_min_difficulty_blocks {
        if candidate.block_time() > last.block_time() + params.target_spacing * 2 {
            return Ok(Retarget::new(limit_bits, RetargetOutcome::MinDifficultyGap));
        }

        let interval = params.retarget_interval() as u64;
        let mut key = last_key;
        let mut node = last;
        while let Some(parent) = index.parent(key) {
            if node.height % interval == 0 || node.bits != limit_bits {
                break;
            }
            key = parent;
            node = lookup(index, parent)?;
        }
        return Ok(Retarget::new(
            node.bits,
            RetargetOutcome::LastRealDifficulty,
        ));
    }

    let insufficient = Retarget::new(limit_bits, RetargetOutcome::InsufficientHistory);

    let Some((prev_key, prev)) = last_block_for_algo(index, Some(last_key), algo)? else {
        return Ok(insufficient);
    };

    let window = params.retarget_interval();
    let mut first = prev;
    for _ in 1..window {
        match last_block_for_algo(index, first.parent, algo)? {
            Some((key, node)) => {
                trace!(key = %key, height = node.height, "window block");
                first = node;
            }
            None => {
                debug!(algo = %algo, window, "not enough blocks for a full window");
                return Ok(insufficient);
            }
        }
    }

    let mut actual_timespan = prev.block_time() - first.block_time();
    let bounds = params.adjustment_bounds(last.height + 1);
    let min_timespan = params.target_timespan * (100 - i64::from(bounds.max_adjust_up)) / 100;
    let max_timespan = params.target_timespan * (100 + i64::from(bounds.max_adjust_down)) / 100;
    debug!(actual_timespan, "actual timespan before bounds");
    if actual_timespan < min_timespan {
        actual_timespan = min_timespan;
    }
    if actual_timespan > max_timespan {
        actual_timespan = max_timespan;
    }

    let old_target = decode_compact(prev.bits).value;
    let mut new_target = scale_target(
        old_target,
        actual_timespan as u64,
        params.target_timespan as u64,
    );
    let limit = params.pow_limit(algo);
    if new_target > limit {
        new_target = limit;
    }
    let bits = encode_compact(new_target);

    debug!(
        algo = %algo,
        prev = %prev_key,
        target_timespan = params.target_timespan,
        actual_timespan,
        "RETARGET"
    );
    debug!(
        before = %format_args!("{:08x}", prev.bits),
        before_target = %format_args!("{:x}", old_target),
        after = %format_args!("{:08x}", bits),
        after_target = %format_args!("{:x}", new_target),
        "retarget result"
    );

    Ok(Retarget::new(
        bits,
        RetargetOutcome::Retargeted { actual_timespan },
    ))
}

/// `target * actual / timespan`, halving wide targets around the multiply.
///
/// The halving drops the lowest bit of such targets; every node does the
/// same, so the result is still consensus-exact.
pub fn scale_target(target: ArithU256, actual: u64, timespan: u64) -> ArithU256 {
    let shift = target.bits() > SCALE_SHIFT_THRESHOLD_BITS;
    let mut scaled = if shift { target >> 1 } else { target };
    scaled *= actual;
    scaled /= timespan;
    if shift {
        scaled <<= 1;
    }
    scaled
}

/// How many times harder `bits` is than the limit of `algo`.
///
/// Display only, never used by consensus. Computed in floating point from
/// the compact forms, so the limit itself reports exactly 1.0.
pub fn difficulty(bits: u32, algo: PowAlgorithm, params: &ConsensusParameters) -> Result<f64> {
    target_from_compact(bits)?;
    Ok(compact_to_f64(params.pow_limit_compact(algo)) / compact_to_f64(bits))
}

fn compact_to_f64(bits: u32) -> f64 {
    let size = (bits >> 24) as i32;
    let word = bits & 0x007f_ffff;
    if size <= 3 {
        f64::from(word >> (8 * (3 - size)))
    } else {
        f64::from(word) * 256f64.powi(size - 3)
    }
}
