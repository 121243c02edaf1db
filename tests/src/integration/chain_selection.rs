//! # Chain Selection
//!
//! Fork choice by normalised chain work, and concurrent use of the shared
//! block index:
//!
//! 1. **Work normalisation**: one Scrypt block against several SHA-256d blocks
//! 2. **Tie breaking**: equal work keeps the incumbent
//! 3. **Snapshots**: a snapshot keeps its meaning while the index grows
//! 4. **Concurrent readers**: validation threads agree while a writer appends

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::{init_tracing, ChainFixture};
    use shared_types::PowAlgorithm::{Groestl, Scrypt, Sha256d};
    use tc_01_proof_of_work::{
        block_work, CandidateHeader, ChainSnapshot, ConsensusParameters, PowConsensusService,
        ProofOfWorkApi,
    };
    use tracing::info;

    const B: u32 = 0x1d00_ffff;

    fn service() -> PowConsensusService {
        init_tracing();
        PowConsensusService::new(ConsensusParameters::main()).unwrap()
    }

    #[test]
    fn test_scrypt_branch_outweighs_longer_sha256d_branch() {
        let service = service();
        let fixture = ChainFixture::new();
        let genesis = fixture.genesis(Sha256d, B);
        let long = ChainSnapshot::new(fixture.extend_n(genesis, Sha256d, 3, 90, B));
        let short = ChainSnapshot::new(fixture.extend(genesis, Scrypt, 90, B));

        let guard = fixture.read();
        let long_work = service.chain_work(&*guard, long).unwrap();
        let short_work = service.chain_work(&*guard, short).unwrap();
        info!(%long_work, %short_work, "branch work");
        assert_eq!(long_work, block_work(B) * 4u64);
        assert_eq!(short_work, block_work(B) * 1025u64);

        assert_eq!(service.select_best_tip(&*guard, long, short).unwrap(), short);
        assert_eq!(service.select_best_tip(&*guard, short, long).unwrap(), short);
    }

    #[test]
    fn test_equal_work_keeps_incumbent() {
        let service = service();
        let fixture = ChainFixture::new();
        let genesis = fixture.genesis(Sha256d, B);
        let a = ChainSnapshot::new(fixture.extend(genesis, Groestl, 90, B));
        let b = ChainSnapshot::new(fixture.extend(genesis, Groestl, 120, B));

        let guard = fixture.read();
        assert_eq!(service.select_best_tip(&*guard, a, b).unwrap(), a);
        assert_eq!(service.select_best_tip(&*guard, b, a).unwrap(), b);
    }

    #[test]
    fn test_snapshot_survives_appends() {
        let service = service();
        let fixture = ChainFixture::new();
        let genesis = fixture.genesis(Sha256d, B);
        let tip = fixture.extend_n(genesis, Scrypt, 5, 90, B);
        let snapshot = ChainSnapshot::new(tip);
        let before = service.chain_work(&*fixture.read(), snapshot).unwrap();

        let newer = fixture.extend_n(tip, Groestl, 5, 90, B);
        let guard = fixture.read();
        assert_eq!(service.chain_work(&*guard, snapshot).unwrap(), before);
        assert!(service.chain_work(&*guard, ChainSnapshot::new(newer)).unwrap() > before);
    }

    #[test]
    fn test_concurrent_readers_agree_while_index_grows() {
        let service = service();
        let fixture = ChainFixture::new();
        let mut tip = fixture.genesis(Sha256d, B);
        for i in 0..60 {
            tip = fixture.mine(&service, tip, [Scrypt, Groestl, Sha256d][i % 3], 30);
        }
        let snapshot = ChainSnapshot::new(tip);
        let candidate = CandidateHeader {
            time: fixture.time_of(tip) + 30,
            bits: 0,
            algo: Scrypt,
        };
        let expected_bits = service
            .next_required_difficulty(&*fixture.read(), Some(tip), &candidate)
            .unwrap();
        let expected_work = service.chain_work(&*fixture.read(), snapshot).unwrap();

        std::thread::scope(|scope| {
            let writer = fixture.clone();
            scope.spawn(move || {
                let mut fork = tip;
                for _ in 0..50 {
                    fork = writer.extend(fork, Groestl, 30, B);
                }
            });

            for _ in 0..8 {
                let reader = fixture.clone();
                let service = &service;
                scope.spawn(move || {
                    for _ in 0..25 {
                        let guard = reader.read();
                        let bits = service
                            .next_required_difficulty(&*guard, Some(tip), &candidate)
                            .unwrap();
                        let work = service.chain_work(&*guard, snapshot).unwrap();
                        assert_eq!(bits, expected_bits);
                        assert_eq!(work, expected_work);
                    }
                });
            }
        });

        assert_eq!(fixture.read().len(), 61 + 50);
    }
}
