//! Append-only proof-of-work chain for powledger.
//!
//! This crate owns the single source of truth for the ledger:
//! - **Chain**: signature-gated, proof-of-work-sealed appends
//! - **Validation**: on-demand end-to-end integrity checks
//! - **Config**: difficulty, genesis policy and mining time limits
//! - **SharedChain**: a locked handle for callers on several threads
//!
//! # Example
//!
//! ```rust,no_run
//! use powledger_chain::{Chain, ChainConfig};
//! use powledger_consensus::Difficulty;
//! use powledger_core::{Keypair, Transaction};
//!
//! let mut chain = Chain::new(ChainConfig::default().with_difficulty(Difficulty::LeadingZeros(3))).unwrap();
//!
//! let alice = Keypair::generate();
//! let bob = Keypair::generate();
//! let tx = Transaction::new(10, alice.public_key.clone(), bob.public_key.clone()).unwrap();
//! let signature = tx.sign(&alice);
//!
//! chain.append(tx, &alice.public_key, &signature).unwrap();
//! assert!(chain.is_valid());
//! ```

pub mod chain;
pub mod config;
pub mod shared;

// Re-export commonly used types
pub use chain::{Chain, ChainError, ChainIntegrityViolation, ChainStats};
pub use config::{ChainConfig, GenesisPolicy};
pub use shared::SharedChain;
