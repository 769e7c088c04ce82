//! Chain options shared by the commands that build a chain.

use anyhow::{Context, Result};
use clap::Args;
use powledger_chain::{Chain, ChainConfig};
use powledger_consensus::Difficulty;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Args)]
pub struct ChainArgs {
    /// Load chain configuration from a JSON file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Leading zero hex digits required in every block hash
    #[arg(short, long)]
    difficulty: Option<u32>,

    /// Exact hex prefix required in every block hash
    #[arg(long, conflicts_with = "difficulty")]
    prefix: Option<String>,

    /// Give up mining a block after this many milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,
}

impl ChainArgs {
    /// Configuration file (if any) with command-line overrides applied.
    pub fn to_config(&self) -> Result<ChainConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let raw = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config file: {:?}", path))?;
                serde_json::from_str(&raw)
                    .with_context(|| format!("Invalid config file: {:?}", path))?
            }
            None => ChainConfig::default(),
        };

        if let Some(zeros) = self.difficulty {
            config = config.with_difficulty(Difficulty::LeadingZeros(zeros));
        }
        if let Some(prefix) = &self.prefix {
            config = config.with_difficulty(Difficulty::HexPrefix(prefix.clone()));
        }
        if let Some(ms) = self.timeout_ms {
            config = config.with_mining_timeout(Duration::from_millis(ms));
        }

        Ok(config)
    }

    pub fn open_chain(&self) -> Result<Chain> {
        let config = self.to_config()?;
        Chain::new(config).context("Failed to create chain")
    }
}
