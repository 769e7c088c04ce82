//! Core ledger primitives for powledger.
//!
//! This crate provides the fundamental types used throughout the ledger:
//! - Cryptographic primitives (hashing, signing, addresses)
//! - Value-transfer transactions and their canonical encoding
//! - Candidate and sealed blocks

pub mod block;
pub mod crypto;
pub mod hash;
pub mod transaction;

// Re-export commonly used types at the crate root
pub use block::{current_timestamp, Block, BlockParts, CandidateBlock, Payload};
pub use crypto::{Address, CryptoError, Keypair, PublicKey, Signature};
pub use hash::{hash, hash_concat, Hash, H256};
pub use transaction::{Transaction, TransactionError};
