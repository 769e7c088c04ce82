//! Wallet: a keypair plus a cached balance.

use powledger_chain::{Chain, ChainError, SharedChain};
use powledger_core::{Address, Hash, Keypair, PublicKey, Signature, Transaction};
use std::fmt;
use thiserror::Error;
use tracing::{info, warn};

/// Errors that can occur when sending from a wallet.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WalletError {
    #[error("transfer amount must be positive")]
    InvalidAmount,

    #[error("insufficient funds (required {required}, available {available})")]
    InsufficientFunds { required: u64, available: u64 },

    #[error("chain rejected transfer: {0}")]
    Chain(#[from] ChainError),
}

pub type Result<T> = std::result::Result<T, WalletError>;

/// An identity that can sign and send transfers.
pub struct Wallet {
    keypair: Keypair,
    balance: u64,
}

impl Wallet {
    /// Create a wallet with a fresh keypair.
    pub fn new(balance: u64) -> Self {
        Self::from_keypair(Keypair::generate(), balance)
    }

    /// Create a wallet around an existing keypair.
    pub fn from_keypair(keypair: Keypair, balance: u64) -> Self {
        Self { keypair, balance }
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.keypair.public_key
    }

    pub fn address(&self) -> Address {
        self.keypair.address()
    }

    /// The locally cached balance.
    pub fn balance(&self) -> u64 {
        self.balance
    }

    /// Check funds, then build and sign a transfer to `payee`.
    fn prepare(&self, amount: u64, payee: &PublicKey) -> Result<(Transaction, Signature)> {
        if amount == 0 {
            return Err(WalletError::InvalidAmount);
        }
        if self.balance < amount {
            return Err(WalletError::InsufficientFunds {
                required: amount,
                available: self.balance,
            });
        }

        let tx = Transaction::new(amount, self.public_key().clone(), payee.clone())
            .map_err(|_| WalletError::InvalidAmount)?;
        let signature = tx.sign(&self.keypair);
        Ok((tx, signature))
    }

    /// Move the cached balance once the chain has accepted a transfer.
    fn settle(&mut self, amount: u64, payee: &mut Wallet, block: Hash) {
        self.balance -= amount;
        payee.balance = payee.balance.saturating_add(amount);
        info!(
            from = %self.address(),
            to = %payee.address(),
            amount,
            block = %block,
            "transfer confirmed"
        );
    }

    fn log_rejection(&self, amount: u64, payee: &Wallet, err: &WalletError) {
        warn!(
            from = %self.address(),
            to = %payee.address(),
            amount,
            error = %err,
            "transfer rejected"
        );
    }

    /// Send `amount` to `payee` through `chain`.
    ///
    /// Balances are untouched unless the chain appends the transfer.
    pub fn send(&mut self, amount: u64, payee: &mut Wallet, chain: &mut Chain) -> Result<Hash> {
        let outcome = self.prepare(amount, payee.public_key()).and_then(|(tx, sig)| {
            chain
                .append(tx, self.public_key(), &sig)
                .map_err(WalletError::from)
        });
        self.finish(amount, payee, outcome)
    }

    /// Like [`Wallet::send`], through a shared chain handle.
    pub fn send_shared(&mut self, amount: u64, payee: &mut Wallet, chain: &SharedChain) -> Result<Hash> {
        let outcome = self.prepare(amount, payee.public_key()).and_then(|(tx, sig)| {
            chain
                .append(tx, self.public_key(), &sig)
                .map_err(WalletError::from)
        });
        self.finish(amount, payee, outcome)
    }

    fn finish(&mut self, amount: u64, payee: &mut Wallet, outcome: Result<Hash>) -> Result<Hash> {
        match outcome {
            Ok(block) => {
                self.settle(amount, payee, block);
                Ok(block)
            }
            Err(err) => {
                self.log_rejection(amount, payee, &err);
                Err(err)
            }
        }
    }
}

impl fmt::Debug for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address())
            .field("balance", &self.balance)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use powledger_chain::ChainConfig;
    use powledger_consensus::Difficulty;

    fn setup_chain() -> Chain {
        Chain::new(ChainConfig::default().with_difficulty(Difficulty::LeadingZeros(1))).unwrap()
    }

    #[test]
    fn test_new_wallet() {
        let wallet = Wallet::new(100);
        assert_eq!(wallet.balance(), 100);
        assert_eq!(wallet.address(), wallet.public_key().to_address());
    }

    #[test]
    fn test_from_keypair_keeps_identity() {
        let keypair = Keypair::from_private_key(&[9u8; 32]);
        let expected = keypair.public_key.clone();
        let wallet = Wallet::from_keypair(keypair, 5);
        assert_eq!(wallet.public_key(), &expected);
    }

    #[test]
    fn test_send_moves_balance() {
        let mut chain = setup_chain();
        let mut alice = Wallet::new(100);
        let mut bob = Wallet::new(0);

        let hash = alice.send(40, &mut bob, &mut chain).unwrap();

        assert_eq!(alice.balance(), 60);
        assert_eq!(bob.balance(), 40);
        assert_eq!(chain.tip_hash(), hash);
        let tx = chain.last_block().unwrap().transaction().unwrap();
        assert_eq!(tx.payer(), alice.public_key());
        assert_eq!(tx.payee(), bob.public_key());
        assert_eq!(tx.amount(), 40);
    }

    #[test]
    fn test_zero_amount_rejected_before_chain() {
        let mut chain = setup_chain();
        let mut alice = Wallet::new(100);
        let mut bob = Wallet::new(0);

        assert_eq!(
            alice.send(0, &mut bob, &mut chain),
            Err(WalletError::InvalidAmount)
        );
        assert_eq!(chain.len(), 1);
        assert_eq!(alice.balance(), 100);
    }

    #[test]
    fn test_insufficient_funds_rejected_before_chain() {
        let mut chain = setup_chain();
        let mut alice = Wallet::new(10);
        let mut bob = Wallet::new(0);

        assert_eq!(
            alice.send(11, &mut bob, &mut chain),
            Err(WalletError::InsufficientFunds {
                required: 11,
                available: 10
            })
        );
        assert_eq!(chain.len(), 1);
        assert_eq!(alice.balance(), 10);
        assert_eq!(bob.balance(), 0);
    }

    #[test]
    fn test_exact_balance_can_be_sent() {
        let mut chain = setup_chain();
        let mut alice = Wallet::new(10);
        let mut bob = Wallet::new(0);

        alice.send(10, &mut bob, &mut chain).unwrap();
        assert_eq!(alice.balance(), 0);
        assert_eq!(bob.balance(), 10);
    }
}
