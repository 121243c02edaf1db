//! # Retarget Flows
//!
//! Difficulty decisions over a shared block index:
//!
//! 1. **Window scenarios**: identity and clamped windows end to end
//! 2. **Rule-following chain**: blocks mined at the required bits
//! 3. **Network rules**: minimum-difficulty gap, skipped proof checks
//! 4. **Configuration**: parameter documents through validation

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::{init_tracing, random_hash, ChainFixture};
    use shared_types::NodeKey;
    use shared_types::PowAlgorithm::{self, Groestl, Scrypt, Sha256d};
    use tc_01_proof_of_work::{
        decode_compact, CandidateHeader, ConfigError, ConsensusParameters, PowConsensusService,
        ProofOfWorkApi, RetargetOutcome,
    };

    const B: u32 = 0x1d00_ffff;

    fn service(params: ConsensusParameters) -> PowConsensusService {
        init_tracing();
        PowConsensusService::new(params).unwrap()
    }

    /// Candidate `gap` seconds after `tip`. Call before taking a read guard.
    fn candidate_after(
        fixture: &ChainFixture,
        tip: NodeKey,
        gap: u32,
        algo: PowAlgorithm,
    ) -> CandidateHeader {
        CandidateHeader {
            time: fixture.time_of(tip) + gap,
            bits: 0,
            algo,
        }
    }

    #[test]
    fn test_identity_window_keeps_bits() {
        let service = service(ConsensusParameters::main());
        let fixture = ChainFixture::new();
        let genesis = fixture.genesis(Sha256d, B);
        // Ten blocks, nine gaps of 100s: the window takes exactly 900s.
        let tip = fixture.extend_n(genesis, Scrypt, 10, 100, B);

        let candidate = candidate_after(&fixture, tip, 100, Scrypt);
        let guard = fixture.read();
        let retarget = service
            .next_work_required(&*guard, Some(tip), &candidate)
            .unwrap();
        assert_eq!(retarget.bits, B);
        assert_eq!(
            retarget.outcome,
            RetargetOutcome::Retargeted {
                actual_timespan: 900
            }
        );
    }

    #[test]
    fn test_doubled_window_clamps_to_max_timespan() {
        let params = ConsensusParameters::main();
        let limit = params.pow_limit(Groestl);
        let service = service(params);
        let fixture = ChainFixture::new();
        let genesis = fixture.genesis(Sha256d, B);
        let tip = fixture.extend_n(genesis, Groestl, 10, 200, B);

        let candidate = candidate_after(&fixture, tip, 200, Groestl);
        let guard = fixture.read();
        let retarget = service
            .next_work_required(&*guard, Some(tip), &candidate)
            .unwrap();
        assert_eq!(
            retarget.outcome,
            RetargetOutcome::Retargeted {
                actual_timespan: 1188
            }
        );
        let target = decode_compact(retarget.bits).value;
        assert!(target > decode_compact(B).value);
        assert!(target <= limit);
    }

    #[test]
    fn test_rule_following_chain_hardens_under_fast_blocks() {
        // Round-robin algorithms, 10s per block: each algorithm sees 30s
        // spacing against a 90s target.
        let params = ConsensusParameters::main();
        let service = service(params.clone());
        let fixture = ChainFixture::new();
        let mut tip = fixture.genesis(Sha256d, params.pow_limit_compact(Sha256d));
        for i in 0..90 {
            let algo = PowAlgorithm::ALL[(i + 1) % 3];
            tip = fixture.mine(&service, tip, algo, 10);
        }

        let candidates = PowAlgorithm::ALL.map(|algo| candidate_after(&fixture, tip, 10, algo));
        let guard = fixture.read();
        for candidate in candidates {
            let algo = candidate.algo;
            let bits = service
                .next_required_difficulty(&*guard, Some(tip), &candidate)
                .unwrap();
            assert!(
                decode_compact(bits).value < params.pow_limit(algo),
                "{algo} did not harden: {bits:08x}"
            );
        }

        let metrics = service.metrics().snapshot();
        assert!(metrics.limit_fallbacks > 0);
        assert!(metrics.retargets > 0);
        assert_eq!(metrics.historical_overrides, 0);
    }

    #[test]
    fn test_testnet_minimum_difficulty_gap() {
        let params = ConsensusParameters::testnet();
        let limit_bits = params.pow_limit_compact(Scrypt);
        let service = service(params);
        let fixture = ChainFixture::new();
        let genesis = fixture.genesis(Scrypt, B);
        let tip = fixture.extend_n(genesis, Scrypt, 11, 90, B);

        let late = candidate_after(&fixture, tip, 181, Scrypt);
        let on_time = candidate_after(&fixture, tip, 180, Scrypt);
        let guard = fixture.read();
        assert_eq!(
            service
                .next_required_difficulty(&*guard, Some(tip), &late)
                .unwrap(),
            limit_bits
        );
        assert_eq!(
            service
                .next_required_difficulty(&*guard, Some(tip), &on_time)
                .unwrap(),
            B
        );
    }

    #[test]
    fn test_testnet_walks_past_minimum_difficulty_blocks() {
        let params = ConsensusParameters::testnet();
        let limit_bits = params.pow_limit_compact(Scrypt);
        let service = service(params);
        let fixture = ChainFixture::new();
        let genesis = fixture.genesis(Scrypt, B);
        let real = fixture.extend_n(genesis, Scrypt, 10, 90, B); // height 10
        let tip = fixture.extend_n(real, Scrypt, 3, 300, limit_bits);

        let candidate = candidate_after(&fixture, tip, 60, Scrypt);
        let real_bits = fixture.bits_of(real);
        let guard = fixture.read();
        let retarget = service
            .next_work_required(&*guard, Some(tip), &candidate)
            .unwrap();
        assert_eq!(retarget.outcome, RetargetOutcome::LastRealDifficulty);
        assert_eq!(retarget.bits, real_bits);
    }

    #[test]
    fn test_regtest_skips_proof_checks() {
        let regtest = service(ConsensusParameters::regtest());
        let main = service(ConsensusParameters::main());
        let hash = [0xff; 32];
        assert!(regtest.check_proof_of_work(&hash, 0, Scrypt).is_ok());
        assert!(main.check_proof_of_work(&hash, B, Sha256d).is_err());
        assert!(main
            .check_proof_of_work(&random_hash(), 0x0492_3456, Sha256d)
            .is_err());
        assert_eq!(main.metrics().snapshot().proofs_rejected, 2);
    }

    #[test]
    fn test_parameter_document_is_validated() {
        let mut doc = serde_json::to_value(ConsensusParameters::testnet()).unwrap();
        doc["target_spacing"] = 60.into();
        doc["target_timespan"] = 600.into();
        let params = ConsensusParameters::from_json(&doc.to_string()).unwrap();
        let service = service(params);
        assert_eq!(service.params().retarget_interval(), 10);

        doc["target_timespan"] = 601.into();
        assert!(matches!(
            ConsensusParameters::from_json(&doc.to_string()),
            Err(ConfigError::InvalidParameter {
                field: "target_timespan",
                ..
            })
        ));
    }
}
