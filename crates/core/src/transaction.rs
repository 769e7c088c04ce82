//! Value-transfer transactions and their canonical encoding.

use crate::crypto::{CryptoError, Keypair, PublicKey, Signature};
use crate::hash::{hash, Hash};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during transaction operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransactionError {
    #[error("transfer amount must be positive")]
    InvalidAmount,
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),
}

/// A transfer of `amount` from `payer` to `payee`.
///
/// Fields are private: a transaction cannot change after construction, so
/// its canonical bytes (and any signature over them) stay valid. Decoding
/// goes through [`Transaction::new`] as well.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TransactionFields")]
pub struct Transaction {
    amount: u64,
    payer: PublicKey,
    payee: PublicKey,
}

/// Unchecked decoded fields, same layout as [`Transaction`].
#[derive(Deserialize)]
struct TransactionFields {
    amount: u64,
    payer: PublicKey,
    payee: PublicKey,
}

impl TryFrom<TransactionFields> for Transaction {
    type Error = TransactionError;

    fn try_from(fields: TransactionFields) -> Result<Self, Self::Error> {
        Transaction::new(fields.amount, fields.payer, fields.payee)
    }
}

impl Transaction {
    /// Create a new transfer. The amount must be non-zero.
    pub fn new(amount: u64, payer: PublicKey, payee: PublicKey) -> Result<Self, TransactionError> {
        if amount == 0 {
            return Err(TransactionError::InvalidAmount);
        }
        Ok(Self {
            amount,
            payer,
            payee,
        })
    }

    pub fn amount(&self) -> u64 {
        self.amount
    }

    pub fn payer(&self) -> &PublicKey {
        &self.payer
    }

    pub fn payee(&self) -> &PublicKey {
        &self.payee
    }

    /// Deterministic encoding of `(amount, payer, payee)`.
    ///
    /// This is the exact message that gets signed and verified, and the
    /// payload bytes that go into a block hash.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        bincode::serialize(self).expect("serialization should not fail")
    }

    /// Transaction id: hash of the canonical bytes.
    pub fn hash(&self) -> Hash {
        hash(&self.canonical_bytes())
    }

    /// Sign the canonical bytes with the given keypair.
    pub fn sign(&self, keypair: &Keypair) -> Signature {
        keypair.sign(&self.canonical_bytes())
    }

    /// Verify a signature over the canonical bytes.
    pub fn verify(&self, public_key: &PublicKey, signature: &Signature) -> Result<(), TransactionError> {
        public_key.verify(&self.canonical_bytes(), signature)?;
        Ok(())
    }
}
