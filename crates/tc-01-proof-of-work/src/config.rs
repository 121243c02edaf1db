//! Consensus parameters for each network
//!
//! A parameter set is selected once at startup and is immutable afterwards.
//! Every node on a network must run with the identical set.

use crate::domain::arith::ArithU256;
use crate::domain::compact::encode_compact;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use shared_types::PowAlgorithm;
use std::env;
use std::fmt;
use std::str::FromStr;

/// Environment variable selecting the network preset.
pub const NETWORK_ENV: &str = "TC_NETWORK";

/// Environment variable pointing at a JSON parameter file.
pub const PARAMS_FILE_ENV: &str = "TC_CONSENSUS_PARAMS";

/// Network a parameter set belongs to
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Production network
    Main,
    /// Public test network (minimum-difficulty blocks allowed)
    Test,
    /// Local regression testing (proof-of-work not checked)
    Regtest,
}

impl Network {
    /// Lowercase network name.
    pub fn name(self) -> &'static str {
        match self {
            Network::Main => "main",
            Network::Test => "test",
            Network::Regtest => "regtest",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Network {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "main" | "mainnet" => Ok(Network::Main),
            "test" | "testnet" => Ok(Network::Test),
            "regtest" => Ok(Network::Regtest),
            other => Err(ConfigError::UnknownNetwork(other.to_string())),
        }
    }
}

/// Per-algorithm consensus constants
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlgorithmParams {
    /// Easiest allowed target
    pub pow_limit: ArithU256,

    /// Multiplier normalising this algorithm's work against the others
    pub work_factor: u64,
}

/// One value per proof-of-work algorithm
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerAlgorithm<T> {
    /// SHA-256d value
    pub sha256d: T,
    /// Scrypt value
    pub scrypt: T,
    /// Groestl value
    pub groestl: T,
}

impl<T> PerAlgorithm<T> {
    /// Value for `algo`.
    pub fn get(&self, algo: PowAlgorithm) -> &T {
        match algo {
            PowAlgorithm::Sha256d => &self.sha256d,
            PowAlgorithm::Scrypt => &self.scrypt,
            PowAlgorithm::Groestl => &self.groestl,
        }
    }

    /// Iterate as `(algorithm, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (PowAlgorithm, &T)> {
        PowAlgorithm::ALL.into_iter().map(move |algo| (algo, self.get(algo)))
    }
}

/// Maximum retarget step, in percent of the target timespan
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustmentBounds {
    /// Largest difficulty increase (timespan shrink) per retarget
    pub max_adjust_up: u32,

    /// Largest difficulty decrease (timespan growth) per retarget
    pub max_adjust_down: u32,
}

/// Proof-of-work consensus parameters
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusParameters {
    /// Network these parameters belong to
    pub network: Network,

    /// Limits and work factors per algorithm
    pub algorithms: PerAlgorithm<AlgorithmParams>,

    /// Time one averaging window should take (seconds)
    pub target_timespan: i64,

    /// Target time between blocks of one algorithm (seconds)
    pub target_spacing: i64,

    /// Permit minimum-difficulty blocks after a long gap (test networks)
    pub allow_min_difficulty_blocks: bool,

    /// Accept every proof without checking it (regression tests)
    pub skip_proof_of_work_check: bool,

    /// Bounds before `diff_adjust_v2_height`
    pub adjust_v1: AdjustmentBounds,

    /// Bounds from `diff_adjust_v2_height` on
    pub adjust_v2: AdjustmentBounds,

    /// First block height retargeted with the V2 bounds
    pub diff_adjust_v2_height: u64,
}

const TARGET_SPACING: i64 = 90; // 3 algorithms, 30 seconds per block overall
const TARGET_TIMESPAN: i64 = 10 * TARGET_SPACING;

const ADJUST_V1: AdjustmentBounds = AdjustmentBounds {
    max_adjust_up: 16,
    max_adjust_down: 32,
};

const ADJUST_V2: AdjustmentBounds = AdjustmentBounds {
    max_adjust_up: 8,
    max_adjust_down: 16,
};

const SHA256D_WORK_FACTOR: u64 = 1;
const SCRYPT_WORK_FACTOR: u64 = 1024;
const GROESTL_WORK_FACTOR: u64 = 64;

impl ConsensusParameters {
    /// Production network parameters.
    pub fn main() -> Self {
        Self {
            network: Network::Main,
            algorithms: PerAlgorithm {
                sha256d: AlgorithmParams {
                    pow_limit: ArithU256::MAX >> 32,
                    work_factor: SHA256D_WORK_FACTOR,
                },
                scrypt: AlgorithmParams {
                    pow_limit: ArithU256::MAX >> 20,
                    work_factor: SCRYPT_WORK_FACTOR,
                },
                groestl: AlgorithmParams {
                    pow_limit: ArithU256::MAX >> 20,
                    work_factor: GROESTL_WORK_FACTOR,
                },
            },
            target_timespan: TARGET_TIMESPAN,
            target_spacing: TARGET_SPACING,
            allow_min_difficulty_blocks: false,
            skip_proof_of_work_check: false,
            adjust_v1: ADJUST_V1,
            adjust_v2: ADJUST_V2,
            diff_adjust_v2_height: 100_000,
        }
    }

    /// Public test network parameters.
    pub fn testnet() -> Self {
        let limit = ArithU256::MAX >> 16;
        let mut params = Self::main();
        params.network = Network::Test;
        params.algorithms.sha256d.pow_limit = limit;
        params.algorithms.scrypt.pow_limit = limit;
        params.algorithms.groestl.pow_limit = limit;
        params.allow_min_difficulty_blocks = true;
        params.diff_adjust_v2_height = 100;
        params
    }

    /// Regression test parameters.
    pub fn regtest() -> Self {
        let limit = ArithU256::MAX >> 1;
        let mut params = Self::testnet();
        params.network = Network::Regtest;
        params.algorithms.sha256d.pow_limit = limit;
        params.algorithms.scrypt.pow_limit = limit;
        params.algorithms.groestl.pow_limit = limit;
        params.skip_proof_of_work_check = true;
        params.diff_adjust_v2_height = 0;
        params
    }

    /// Preset for `network`.
    pub fn for_network(network: Network) -> Self {
        match network {
            Network::Main => Self::main(),
            Network::Test => Self::testnet(),
            Network::Regtest => Self::regtest(),
        }
    }

    /// Parse and validate a JSON parameter document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let params: Self = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    /// Select parameters from the environment.
    ///
    /// # Environment Variables
    ///
    /// - `TC_CONSENSUS_PARAMS`: path of a JSON parameter file (takes precedence)
    /// - `TC_NETWORK`: preset name, `main`, `test` or `regtest` (default: main)
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = env::var(PARAMS_FILE_ENV) {
            let json = std::fs::read_to_string(&path)?;
            return Self::from_json(&json);
        }
        let network = match env::var(NETWORK_ENV) {
            Ok(name) => name.parse()?,
            Err(_) => Network::Main,
        };
        Ok(Self::for_network(network))
    }

    /// Check the arithmetic preconditions of the retarget and work code.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target_spacing <= 0 {
            return Err(invalid("target_spacing", "must be positive"));
        }
        if self.target_timespan <= 0 {
            return Err(invalid("target_timespan", "must be positive"));
        }
        if self.target_timespan % self.target_spacing != 0 {
            return Err(invalid(
                "target_timespan",
                "must be a whole number of target_spacing",
            ));
        }
        for (field, bounds) in [("adjust_v1", self.adjust_v1), ("adjust_v2", self.adjust_v2)] {
            if bounds.max_adjust_up >= 100 {
                return Err(invalid(field, "max_adjust_up must be below 100 percent"));
            }
            if bounds.max_adjust_down > 1_000 {
                return Err(invalid(field, "max_adjust_down must not exceed 1000 percent"));
            }
        }
        // Widest clamp bound and the minimum-difficulty gap must fit in i64.
        let max_down = self.adjust_v1.max_adjust_down.max(self.adjust_v2.max_adjust_down);
        let widest = 100 + i64::from(max_down);
        if self.target_timespan.checked_mul(widest).is_none() {
            return Err(invalid(
                "target_timespan",
                "too large for the adjustment bounds",
            ));
        }
        if self
            .target_spacing
            .checked_mul(2)
            .and_then(|gap| gap.checked_add(i64::from(u32::MAX)))
            .is_none()
        {
            return Err(invalid("target_spacing", "too large for block timestamps"));
        }
        for (algo, params) in self.algorithms.iter() {
            if params.pow_limit.is_zero() {
                return Err(invalid("pow_limit", format!("zero limit for {algo}")));
            }
            if params.work_factor == 0 {
                return Err(invalid("work_factor", format!("zero factor for {algo}")));
            }
        }
        Ok(())
    }

    /// Easiest allowed target for `algo`.
    pub fn pow_limit(&self, algo: PowAlgorithm) -> ArithU256 {
        self.algorithms.get(algo).pow_limit
    }

    /// `pow_limit(algo)` in compact form.
    pub fn pow_limit_compact(&self, algo: PowAlgorithm) -> u32 {
        encode_compact(self.pow_limit(algo))
    }

    /// Work normalisation factor for `algo`.
    pub fn work_factor(&self, algo: PowAlgorithm) -> u64 {
        self.algorithms.get(algo).work_factor
    }

    /// Blocks between min-difficulty checkpoints; also the averaging window.
    pub fn retarget_interval(&self) -> i64 {
        self.target_timespan / self.target_spacing
    }

    /// Adjustment bounds in force for a block at `height`.
    pub fn adjustment_bounds(&self, height: u64) -> AdjustmentBounds {
        if height >= self.diff_adjust_v2_height {
            self.adjust_v2
        } else {
            self.adjust_v1
        }
    }
}

impl Default for ConsensusParameters {
    fn default() -> Self {
        Self::main()
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidParameter {
        field,
        reason: reason.into(),
    }
}
