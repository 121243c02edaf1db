//! Metrics collection for the proof-of-work subsystem

use crate::domain::RetargetOutcome;
use crate::error::{MalformedTarget, PowError};
use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics collector for proof-of-work checks
#[derive(Debug, Default)]
pub struct Metrics {
    /// Total proofs checked
    pub proofs_checked: AtomicU64,

    /// Proofs rejected for a negative, zero or overflowing target
    pub rejected_malformed: AtomicU64,

    /// Proofs rejected for a target above the algorithm limit
    pub rejected_above_limit: AtomicU64,

    /// Proofs rejected because the hash missed the target
    pub rejected_hash: AtomicU64,

    /// Windowed retargets computed
    pub retargets: AtomicU64,

    /// Requests answered with the algorithm limit (genesis, short history,
    /// minimum-difficulty gap)
    pub limit_fallbacks: AtomicU64,

    /// Requests answered by the historical override
    pub historical_overrides: AtomicU64,
}

/// Point-in-time copy of [`Metrics`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Total proofs checked
    pub proofs_checked: u64,
    /// Total proofs rejected, all reasons
    pub proofs_rejected: u64,
    /// Rejected for a malformed target
    pub rejected_malformed: u64,
    /// Rejected for a target above the limit
    pub rejected_above_limit: u64,
    /// Rejected for a hash above the target
    pub rejected_hash: u64,
    /// Windowed retargets computed
    pub retargets: u64,
    /// Requests answered with the limit
    pub limit_fallbacks: u64,
    /// Requests answered by the historical override
    pub historical_overrides: u64,
}

impl Metrics {
    /// Create new metrics collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the result of one proof check
    pub fn record_proof(&self, result: &Result<(), PowError>) {
        self.proofs_checked.fetch_add(1, Ordering::Relaxed);
        let counter = match result {
            Ok(()) | Err(PowError::UnknownNode(_)) => return,
            Err(PowError::MalformedTarget(
                MalformedTarget::Negative | MalformedTarget::Overflow | MalformedTarget::Zero,
            )) => &self.rejected_malformed,
            Err(PowError::TargetAboveLimit { .. }) => &self.rejected_above_limit,
            Err(PowError::HashAboveTarget) => &self.rejected_hash,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Record which rule answered a difficulty request
    pub fn record_retarget(&self, outcome: RetargetOutcome) {
        let counter = match outcome {
            RetargetOutcome::Retargeted { .. } => &self.retargets,
            RetargetOutcome::HistoricalOverride => &self.historical_overrides,
            RetargetOutcome::Genesis
            | RetargetOutcome::InsufficientHistory
            | RetargetOutcome::MinDifficultyGap => &self.limit_fallbacks,
            RetargetOutcome::LastRealDifficulty => return,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Copy all counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        let rejected_malformed = self.rejected_malformed.load(Ordering::Relaxed);
        let rejected_above_limit = self.rejected_above_limit.load(Ordering::Relaxed);
        let rejected_hash = self.rejected_hash.load(Ordering::Relaxed);
        MetricsSnapshot {
            proofs_checked: self.proofs_checked.load(Ordering::Relaxed),
            proofs_rejected: rejected_malformed + rejected_above_limit + rejected_hash,
            rejected_malformed,
            rejected_above_limit,
            rejected_hash,
            retargets: self.retargets.load(Ordering::Relaxed),
            limit_fallbacks: self.limit_fallbacks.load(Ordering::Relaxed),
            historical_overrides: self.historical_overrides.load(Ordering::Relaxed),
        }
    }

    /// Share of checked proofs that were rejected
    pub fn rejection_rate(&self) -> f64 {
        let snapshot = self.snapshot();
        if snapshot.proofs_checked == 0 {
            return 0.0;
        }
        snapshot.proofs_rejected as f64 / snapshot.proofs_checked as f64
    }
}
