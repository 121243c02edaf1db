//! Proof-of-work consensus service
//!
//! Binds the pure domain functions to one validated parameter set and
//! counts what they decide. The service holds no chain state; every call
//! reads the block index it is handed.

use crate::config::ConsensusParameters;
use crate::domain::{
    self, ArithU256, CandidateHeader, ChainSnapshot, Retarget, RetargetOutcome,
};
use crate::error::{ConfigError, Result};
use crate::metrics::Metrics;
use crate::ports::{BlockIndexReader, ProofOfWorkApi};
use shared_types::{Hash, NodeKey, PowAlgorithm};
use tracing::{debug, info};

/// Concrete implementation of [`ProofOfWorkApi`]
#[derive(Debug)]
pub struct PowConsensusService {
    params: ConsensusParameters,
    metrics: Metrics,
}

impl PowConsensusService {
    /// Create a service over validated parameters.
    pub fn new(params: ConsensusParameters) -> std::result::Result<Self, ConfigError> {
        params.validate()?;
        info!("[tc-01] Initializing Proof-of-Work Service");
        info!("  Network: {}", params.network);
        info!(
            "  Target spacing: {}s, timespan: {}s",
            params.target_spacing, params.target_timespan
        );
        for (algo, algo_params) in params.algorithms.iter() {
            info!(
                "  {}: limit {:08x}, work factor {}",
                algo,
                domain::encode_compact(algo_params.pow_limit),
                algo_params.work_factor
            );
        }
        Ok(Self {
            params,
            metrics: Metrics::new(),
        })
    }

    /// Create a service from `TC_CONSENSUS_PARAMS` / `TC_NETWORK`.
    pub fn from_env() -> std::result::Result<Self, ConfigError> {
        Self::new(ConsensusParameters::from_env()?)
    }

    /// Parameters in force.
    pub fn params(&self) -> &ConsensusParameters {
        &self.params
    }

    /// Counters of decided requests.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Required bits together with the rule that decided them.
    pub fn next_work_required(
        &self,
        index: &dyn BlockIndexReader,
        last: Option<NodeKey>,
        candidate: &CandidateHeader,
    ) -> Result<Retarget> {
        let retarget = domain::next_work_required(index, last, candidate, &self.params)?;
        self.metrics.record_retarget(retarget.outcome);
        if retarget.outcome == RetargetOutcome::HistoricalOverride {
            debug!(algo = %candidate.algo, "difficulty taken from candidate header");
        }
        Ok(retarget)
    }

    /// Display difficulty of `bits` relative to the limit of `algo`.
    pub fn difficulty(&self, bits: u32, algo: PowAlgorithm) -> Result<f64> {
        domain::difficulty(bits, algo, &self.params)
    }
}

impl ProofOfWorkApi for PowConsensusService {
    fn next_required_difficulty(
        &self,
        index: &dyn BlockIndexReader,
        last: Option<NodeKey>,
        candidate: &CandidateHeader,
    ) -> Result<u32> {
        self.next_work_required(index, last, candidate)
            .map(|retarget| retarget.bits)
    }

    fn check_proof_of_work(&self, hash: &Hash, bits: u32, algo: PowAlgorithm) -> Result<()> {
        let result = domain::check_block_hash(hash, bits, algo, &self.params);
        self.metrics.record_proof(&result);
        result
    }

    fn block_work(&self, bits: u32) -> ArithU256 {
        domain::block_work(bits)
    }

    fn block_proof(&self, bits: u32, algo: PowAlgorithm) -> ArithU256 {
        domain::block_proof(bits, algo, &self.params)
    }

    fn chain_work(
        &self,
        index: &dyn BlockIndexReader,
        snapshot: ChainSnapshot,
    ) -> Result<ArithU256> {
        domain::chain_work(index, snapshot, &self.params)
    }

    fn select_best_tip(
        &self,
        index: &dyn BlockIndexReader,
        incumbent: ChainSnapshot,
        challenger: ChainSnapshot,
    ) -> Result<ChainSnapshot> {
        domain::select_best_tip(index, incumbent, challenger, &self.params)
    }
}
