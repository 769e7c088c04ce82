//! A chain handle that several producers can append through.

use crate::chain::{Chain, ChainError, Result};
use powledger_core::{Hash, PublicKey, Signature, Transaction};
use std::sync::{Arc, Mutex, MutexGuard};

/// Cloneable handle to one chain behind a mutex.
///
/// The lock is held for the whole of [`Chain::append`] (verify, mine, push),
/// so two producers never mine on top of the same tip.
#[derive(Debug, Clone)]
pub struct SharedChain {
    inner: Arc<Mutex<Chain>>,
}

impl SharedChain {
    pub fn new(chain: Chain) -> Self {
        Self {
            inner: Arc::new(Mutex::new(chain)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Chain>> {
        self.inner.lock().map_err(|_| ChainError::LockPoisoned)
    }

    /// Append under the lock. See [`Chain::append`].
    pub fn append(
        &self,
        transaction: Transaction,
        sender: &PublicKey,
        signature: &Signature,
    ) -> Result<Hash> {
        self.lock()?.append(transaction, sender, signature)
    }

    /// Run a read-only closure against the chain.
    pub fn read<R>(&self, f: impl FnOnce(&Chain) -> R) -> Result<R> {
        let chain = self.lock()?;
        Ok(f(&*chain))
    }

    pub fn len(&self) -> Result<usize> {
        self.read(Chain::len)
    }

    pub fn is_valid(&self) -> Result<bool> {
        self.read(Chain::is_valid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChainConfig;
    use powledger_consensus::Difficulty;
    use powledger_core::Keypair;
    use std::thread;

    #[test]
    fn test_concurrent_producers_keep_chain_linear() {
        let chain = Chain::new(ChainConfig::default().with_difficulty(Difficulty::LeadingZeros(1))).unwrap();
        let shared = SharedChain::new(chain);

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let shared = shared.clone();
                thread::spawn(move || {
                    let payer = Keypair::generate();
                    let payee = Keypair::generate();
                    for amount in 1..=3 {
                        let tx = Transaction::new(amount, payer.public_key.clone(), payee.public_key.clone())
                            .unwrap();
                        let sig = tx.sign(&payer);
                        shared.append(tx, &payer.public_key, &sig).unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(shared.len().unwrap(), 1 + 4 * 3);
        assert!(shared.is_valid().unwrap());
    }

    #[test]
    fn test_rejection_through_handle() {
        let chain = Chain::new(ChainConfig::default().with_difficulty(Difficulty::LeadingZeros(0))).unwrap();
        let shared = SharedChain::new(chain);
        let (a, b) = (Keypair::generate(), Keypair::generate());
        let tx = Transaction::new(1, a.public_key.clone(), b.public_key.clone()).unwrap();
        let forged = tx.sign(&b);

        assert_eq!(
            shared.append(tx, &a.public_key, &forged),
            Err(ChainError::InvalidSignature)
        );
        assert_eq!(shared.len().unwrap(), 1);
        assert_eq!(shared.read(|c| c.tip_hash()).unwrap(), shared.read(|c| c.blocks()[0].hash()).unwrap());
    }
}
