use powledger_chain::{Chain, ChainConfig, ChainError, GenesisPolicy, SharedChain};
use powledger_consensus::Difficulty;
use powledger_wallet::{Wallet, WalletError};
use std::time::Duration;

fn setup_chain() -> Chain {
    Chain::new(ChainConfig::default().with_difficulty(Difficulty::LeadingZeros(2))).unwrap()
}

#[test]
fn test_full_balance_transfer_then_overdraft() {
    let mut chain = setup_chain();
    let mut a = Wallet::new(100);
    let mut b = Wallet::new(0);
    let mut c = Wallet::new(0);

    a.send(100, &mut b, &mut chain).unwrap();

    assert_eq!(a.balance(), 0);
    assert_eq!(b.balance(), 100);
    assert_eq!(chain.len(), 2);
    assert!(chain.is_valid());

    let result = a.send(50, &mut c, &mut chain);
    assert!(matches!(result, Err(WalletError::InsufficientFunds { .. })));
    assert_eq!(chain.len(), 2);
    assert_eq!(a.balance(), 0);
    assert_eq!(c.balance(), 0);
    assert!(chain.is_valid());
}

#[test]
fn test_balances_conserved_over_many_sends() {
    let mut chain = setup_chain();
    let mut a = Wallet::new(500);
    let mut b = Wallet::new(250);

    for amount in [10, 20, 30] {
        a.send(amount, &mut b, &mut chain).unwrap();
    }
    b.send(5, &mut a, &mut chain).unwrap();

    assert_eq!(a.balance(), 500 - 60 + 5);
    assert_eq!(b.balance(), 250 + 60 - 5);
    assert_eq!(a.balance() + b.balance(), 750);
    assert_eq!(chain.len(), 5);
    assert_eq!(chain.stats().total_transferred, 65);
    assert!(chain.is_valid());
}

#[test]
fn test_chain_rejection_leaves_balances_unchanged() {
    let config = ChainConfig::default()
        .with_genesis(GenesisPolicy::Empty)
        .with_difficulty(Difficulty::LeadingZeros(64))
        .with_mining_timeout(Duration::ZERO);
    let mut chain = Chain::new(config).unwrap();
    let mut a = Wallet::new(100);
    let mut b = Wallet::new(0);

    let result = a.send(30, &mut b, &mut chain);

    assert!(matches!(
        result,
        Err(WalletError::Chain(ChainError::ProofOfWorkTimeout { .. }))
    ));
    assert_eq!(a.balance(), 100);
    assert_eq!(b.balance(), 0);
    assert!(chain.is_empty());
}

#[test]
fn test_send_through_shared_chain() {
    let shared = SharedChain::new(setup_chain());
    let mut a = Wallet::new(100);
    let mut b = Wallet::new(0);

    a.send_shared(25, &mut b, &shared).unwrap();
    a.send_shared(25, &mut b, &shared).unwrap();

    assert_eq!(a.balance(), 50);
    assert_eq!(b.balance(), 50);
    assert_eq!(shared.len().unwrap(), 3);
    assert!(shared.is_valid().unwrap());
}
