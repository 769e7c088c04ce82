//! Identities with locally cached balances for powledger.
//!
//! A [`Wallet`] signs transfers and submits them to a chain. Its balance is
//! an optimistic local cache: it only changes after the chain has accepted
//! the transfer.

pub mod wallet;

pub use wallet::{Wallet, WalletError};
