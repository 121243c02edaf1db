//! Shared block index builders
//!
//! Hashes are random: nothing here checks them against their bits, and the
//! index only needs them to be unique.

use parking_lot::RwLockReadGuard;
use rand::Rng;
use shared_types::{BlockIndex, Hash, NodeKey, PowAlgorithm, SharedBlockIndex};
use tc_01_proof_of_work::{CandidateHeader, PowConsensusService};
use tracing_subscriber::EnvFilter;

/// Timestamp of every fixture genesis block
pub const GENESIS_TIME: u32 = 1_400_000_000;

/// Install a test subscriber honouring `RUST_LOG`. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Random 32-byte block hash
pub fn random_hash() -> Hash {
    let mut hash = [0u8; 32];
    rand::thread_rng().fill(&mut hash);
    hash
}

/// Builds chains and forks on a [`SharedBlockIndex`]
#[derive(Clone, Default)]
pub struct ChainFixture {
    /// Index under construction
    pub index: SharedBlockIndex,
}

impl ChainFixture {
    /// Empty fixture
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert the genesis block
    pub fn genesis(&self, algo: PowAlgorithm, bits: u32) -> NodeKey {
        self.index
            .append(None, random_hash(), GENESIS_TIME, bits, algo)
            .expect("fixture genesis must index")
    }

    /// Append one block `gap` seconds after `parent`
    pub fn extend(&self, parent: NodeKey, algo: PowAlgorithm, gap: u32, bits: u32) -> NodeKey {
        let time = self.time_of(parent) + gap;
        self.index
            .append(Some(parent), random_hash(), time, bits, algo)
            .expect("fixture block must index")
    }

    /// Append `count` blocks of one algorithm, `gap` seconds apart
    pub fn extend_n(
        &self,
        parent: NodeKey,
        algo: PowAlgorithm,
        count: usize,
        gap: u32,
        bits: u32,
    ) -> NodeKey {
        (0..count).fold(parent, |tip, _| self.extend(tip, algo, gap, bits))
    }

    /// Append a block carrying exactly the bits `service` requires
    pub fn mine(
        &self,
        service: &PowConsensusService,
        parent: NodeKey,
        algo: PowAlgorithm,
        gap: u32,
    ) -> NodeKey {
        let candidate = CandidateHeader {
            time: self.time_of(parent) + gap,
            bits: 0,
            algo,
        };
        let bits = {
            let guard = self.read();
            service
                .next_work_required(&*guard, Some(parent), &candidate)
                .expect("parent is indexed")
                .bits
        };
        self.extend(parent, algo, gap, bits)
    }

    /// Read guard over the index
    pub fn read(&self) -> RwLockReadGuard<'_, BlockIndex> {
        self.index.read()
    }

    /// Timestamp of `key`
    pub fn time_of(&self, key: NodeKey) -> u32 {
        self.read().get(key).expect("fixture key is indexed").time
    }

    /// Bits of `key`
    pub fn bits_of(&self, key: NodeKey) -> u32 {
        self.read().get(key).expect("fixture key is indexed").bits
    }
}
