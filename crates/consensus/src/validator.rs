//! Transaction and block validation rules.

use crate::pow::DifficultyPredicate;
use powledger_core::{Block, Hash, PublicKey, Signature, Transaction};
use thiserror::Error;

/// Errors that can occur during validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("transaction signature verification failed")]
    InvalidSignature,

    #[error("sender key is not the transaction payer")]
    PayerMismatch,

    #[error("stored block hash does not match block content")]
    HashMismatch,

    #[error("block previous_hash does not match parent hash")]
    InvalidPrevHash,

    #[error("block hash does not meet the difficulty")]
    InsufficientWork,

    #[error("genesis payload found after the first block")]
    UnexpectedGenesis,
}

pub type Result<T> = std::result::Result<T, ValidationError>;

/// Transaction validator.
pub struct TransactionValidator;

impl TransactionValidator {
    /// Check that `signature` is `sender`'s signature over the transaction's
    /// canonical bytes, and that `sender` is the payer.
    pub fn validate_with_signature(
        tx: &Transaction,
        sender: &PublicKey,
        signature: &Signature,
    ) -> Result<()> {
        tx.verify(sender, signature)
            .map_err(|_| ValidationError::InvalidSignature)?;

        if tx.payer() != sender {
            return Err(ValidationError::PayerMismatch);
        }

        Ok(())
    }
}

/// Block validator.
pub struct BlockValidator;

impl BlockValidator {
    /// The cached hash must equal the hash recomputed from the fields.
    pub fn validate_seal(block: &Block) -> Result<()> {
        if !block.has_valid_hash() {
            return Err(ValidationError::HashMismatch);
        }
        Ok(())
    }

    /// The block must point at its parent by hash.
    pub fn validate_extends_parent(block: &Block, parent_hash: Hash) -> Result<()> {
        if block.previous_hash() != parent_hash {
            return Err(ValidationError::InvalidPrevHash);
        }
        Ok(())
    }

    /// The block hash must satisfy the difficulty.
    pub fn validate_proof_of_work<P>(block: &Block, difficulty: &P) -> Result<()>
    where
        P: DifficultyPredicate + ?Sized,
    {
        if !difficulty.is_satisfied_by(&block.hash()) {
            return Err(ValidationError::InsufficientWork);
        }
        Ok(())
    }

    /// Full validation of a non-genesis block against its parent.
    pub fn validate_full<P>(block: &Block, parent_hash: Hash, difficulty: &P) -> Result<()>
    where
        P: DifficultyPredicate + ?Sized,
    {
        if block.transaction().is_none() {
            return Err(ValidationError::UnexpectedGenesis);
        }
        Self::validate_seal(block)?;
        Self::validate_extends_parent(block, parent_hash)?;
        Self::validate_proof_of_work(block, difficulty)?;
        Ok(())
    }
}
