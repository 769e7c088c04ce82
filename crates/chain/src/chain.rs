//! The append-only chain.
//!
//! `append` is the only way to grow a chain. It verifies the sender's
//! signature, mines a block on top of the current tip and pushes it; if any
//! step fails the chain is left exactly as it was.

use crate::config::{ChainConfig, GenesisPolicy};
use powledger_consensus::{
    BlockValidator, Miner, PowError, TransactionValidator, ValidationError,
};
use powledger_core::{
    current_timestamp, Block, CandidateBlock, Hash, Payload, PublicKey, Signature, Transaction,
};
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during chain operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChainError {
    #[error("transaction signature verification failed")]
    InvalidSignature,

    #[error("sender key is not the transaction payer")]
    PayerMismatch,

    #[error("proof-of-work timed out after {attempts} attempts")]
    ProofOfWorkTimeout { attempts: u64 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(#[source] PowError),

    #[error("chain lock poisoned")]
    LockPoisoned,
}

pub type Result<T> = std::result::Result<T, ChainError>;

impl From<PowError> for ChainError {
    fn from(err: PowError) -> Self {
        match err {
            PowError::Timeout { attempts } => ChainError::ProofOfWorkTimeout { attempts },
            other => ChainError::InvalidConfig(other),
        }
    }
}

/// First broken link found by [`Chain::validate`].
#[derive(Debug, Error, PartialEq, Eq)]
#[error("chain integrity violated at block {index}: {reason}")]
pub struct ChainIntegrityViolation {
    /// Position of the offending block.
    pub index: usize,
    #[source]
    pub reason: ValidationError,
}

/// An ordered, append-only sequence of proof-of-work sealed blocks.
#[derive(Debug, Clone)]
pub struct Chain {
    blocks: Vec<Block>,
    config: ChainConfig,
    miner: Miner,
}

impl Chain {
    /// Create a chain. With [`GenesisPolicy::Seeded`] a genesis block is
    /// mined immediately under the configured difficulty.
    pub fn new(config: ChainConfig) -> Result<Self> {
        config.validate().map_err(ChainError::InvalidConfig)?;

        let mut chain = Self {
            blocks: Vec::new(),
            miner: config.miner(),
            config,
        };

        if chain.config.genesis == GenesisPolicy::Seeded {
            let genesis = chain.miner.mine(CandidateBlock::genesis(current_timestamp()))?;
            info!(hash = %genesis.hash(), nonce = genesis.nonce(), "mined genesis block");
            chain.blocks.push(genesis);
        }

        Ok(chain)
    }

    /// Adopt an existing block sequence as-is.
    ///
    /// Nothing is verified here; call [`Chain::validate`] to check the
    /// blocks.
    pub fn from_blocks(config: ChainConfig, blocks: Vec<Block>) -> Result<Self> {
        config.validate().map_err(ChainError::InvalidConfig)?;
        Ok(Self {
            blocks,
            miner: config.miner(),
            config,
        })
    }

    /// Verify, mine and append a transfer. Returns the new block's hash.
    pub fn append(
        &mut self,
        transaction: Transaction,
        sender: &PublicKey,
        signature: &Signature,
    ) -> Result<Hash> {
        let tx_hash = transaction.hash();

        if let Err(err) = TransactionValidator::validate_with_signature(&transaction, sender, signature) {
            warn!(tx = %tx_hash, error = %err, "rejected transaction");
            return Err(match err {
                ValidationError::PayerMismatch => ChainError::PayerMismatch,
                _ => ChainError::InvalidSignature,
            });
        }

        let candidate = CandidateBlock::new(
            self.tip_hash(),
            Payload::Transfer(transaction),
            current_timestamp(),
        );

        debug!(tx = %tx_hash, difficulty = %self.config.difficulty, "mining block");
        let started = Instant::now();
        let block = self.miner.mine(candidate).map_err(|err| {
            warn!(tx = %tx_hash, error = %err, "mining failed");
            ChainError::from(err)
        })?;

        let hash = block.hash();
        info!(
            height = self.blocks.len(),
            hash = %hash,
            nonce = block.nonce(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "appended block"
        );
        self.blocks.push(block);

        Ok(hash)
    }

    /// The most recent block, if any.
    pub fn last_block(&self) -> Option<&Block> {
        self.blocks.last()
    }

    /// Hash a new block must link to: the tip's hash, or zero when empty.
    pub fn tip_hash(&self) -> Hash {
        self.last_block().map(Block::hash).unwrap_or(Hash::ZERO)
    }

    /// Read-only view of all blocks, genesis first.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    /// Check every block against its parent: stored hash, linkage and
    /// proof-of-work. A genesis block 0 is taken as given; a transfer at
    /// index 0 must link to the zero hash. Stops at the first violation.
    pub fn validate(&self) -> std::result::Result<(), ChainIntegrityViolation> {
        if let Some(first) = self.blocks.first() {
            if first.transaction().is_some() {
                BlockValidator::validate_full(first, Hash::ZERO, &self.config.difficulty)
                    .map_err(|reason| ChainIntegrityViolation { index: 0, reason })?;
            }
        }

        for (i, pair) in self.blocks.windows(2).enumerate() {
            let (parent, block) = (&pair[0], &pair[1]);
            BlockValidator::validate_full(block, parent.hash(), &self.config.difficulty)
                .map_err(|reason| ChainIntegrityViolation {
                    index: i + 1,
                    reason,
                })?;
        }
        Ok(())
    }

    /// Whether [`Chain::validate`] passes.
    pub fn is_valid(&self) -> bool {
        match self.validate() {
            Ok(()) => true,
            Err(violation) => {
                warn!(index = violation.index, reason = %violation.reason, "chain integrity check failed");
                false
            }
        }
    }

    /// Chain statistics.
    pub fn stats(&self) -> ChainStats {
        ChainStats {
            length: self.blocks.len(),
            tip_hash: self.tip_hash(),
            tip_timestamp: self.last_block().map(Block::timestamp),
            transfers: self.blocks.iter().filter(|b| b.transaction().is_some()).count(),
            total_transferred: self
                .blocks
                .iter()
                .filter_map(Block::transaction)
                .map(Transaction::amount)
                .fold(0u64, u64::saturating_add),
        }
    }
}

/// Chain statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainStats {
    /// Number of blocks, genesis included.
    pub length: usize,
    /// Hash of the latest block (zero when empty).
    pub tip_hash: Hash,
    /// Timestamp of the latest block.
    pub tip_timestamp: Option<u64>,
    /// Number of transfer blocks.
    pub transfers: usize,
    /// Sum of all transferred amounts.
    pub total_transferred: u64,
}
