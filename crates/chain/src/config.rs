//! Chain configuration.

use powledger_consensus::{Difficulty, Miner, PowError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Whether a new chain starts with a genesis block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenesisPolicy {
    /// Mine a genesis block when the chain is created.
    #[default]
    Seeded,
    /// Start with no blocks; the first append links to the zero hash.
    Empty,
}

/// Chain configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    /// Difficulty every block hash must satisfy.
    pub difficulty: Difficulty,
    /// Genesis seeding policy.
    pub genesis: GenesisPolicy,
    /// Upper bound for a single proof-of-work search, in milliseconds.
    /// `None` searches without limit.
    pub mining_timeout_ms: Option<u64>,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            genesis: GenesisPolicy::Seeded,
            mining_timeout_ms: None,
        }
    }
}

impl ChainConfig {
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_genesis(mut self, genesis: GenesisPolicy) -> Self {
        self.genesis = genesis;
        self
    }

    pub fn with_mining_timeout(mut self, timeout: Duration) -> Self {
        self.mining_timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    pub fn mining_timeout(&self) -> Option<Duration> {
        self.mining_timeout_ms.map(Duration::from_millis)
    }

    /// Check that the configured difficulty can be met.
    pub fn validate(&self) -> Result<(), PowError> {
        self.difficulty.validate()
    }

    /// Build the miner this configuration describes.
    pub fn miner(&self) -> Miner {
        let miner = Miner::new(self.difficulty.clone());
        match self.mining_timeout() {
            Some(timeout) => miner.with_timeout(timeout),
            None => miner,
        }
    }
}
