//! Proof-of-work consensus for powledger.
//!
//! This crate provides:
//! - Difficulty predicates and the nonce search ([`ProofOfWork`], [`Miner`])
//! - A standalone hash puzzle that is not bound to block content ([`puzzle`])
//! - Transaction and block validation rules
//!
//! # Example
//!
//! ```rust,no_run
//! use powledger_consensus::{Difficulty, Miner};
//! use powledger_core::{current_timestamp, CandidateBlock};
//!
//! let miner = Miner::new(Difficulty::LeadingZeros(3));
//! let genesis = miner.mine(CandidateBlock::genesis(current_timestamp())).unwrap();
//! assert!(genesis.hash().to_hex().starts_with("000"));
//! ```

pub mod pow;
pub mod puzzle;
pub mod validator;

// Re-export commonly used types
pub use pow::{Difficulty, DifficultyPredicate, Miner, PowError, ProofOfWork};
pub use validator::{BlockValidator, TransactionValidator, ValidationError};
