//! Wallet scenario: a full-balance transfer followed by an overdraft.

use super::chain_args::ChainArgs;
use super::display::{print_chain, print_validity, print_wallet};
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use powledger_chain::Chain;
use powledger_core::{Block, Payload, Transaction};
use powledger_wallet::Wallet;

#[derive(Args)]
pub struct DemoArgs {
    #[command(flatten)]
    chain: ChainArgs,

    /// Starting balance of the sending wallet
    #[arg(short, long, default_value = "100")]
    balance: u64,

    /// Afterwards, rewrite the last transfer's amount and re-validate
    #[arg(long)]
    tamper: bool,
}

pub fn run(args: DemoArgs) -> Result<()> {
    let mut chain = args.chain.open_chain()?;

    println!("{}", "Running wallet demo...".bold().cyan());
    println!("  Difficulty: {}", chain.config().difficulty.to_string().bright_cyan());
    println!();

    let mut alice = Wallet::new(args.balance);
    let mut bob = Wallet::new(0);
    let mut carol = Wallet::new(0);

    println!("{}", "Wallets:".bold());
    print_wallet("alice", &alice);
    print_wallet("bob", &bob);
    print_wallet("carol", &carol);
    println!();

    let amount = args.balance;
    match alice.send(amount, &mut bob, &mut chain) {
        Ok(hash) => println!(
            "{}  alice -> bob {} confirmed in block {}",
            "✓".green().bold(),
            amount,
            hash.to_hex()[..16].bright_yellow()
        ),
        Err(e) => println!("{}  alice -> bob {} rejected: {}", "✗".red().bold(), amount, e),
    }

    let amount = (args.balance / 2).max(1);
    match alice.send(amount, &mut carol, &mut chain) {
        Ok(hash) => println!(
            "{}  alice -> carol {} confirmed in block {}",
            "✓".green().bold(),
            amount,
            hash.to_hex()[..16].bright_yellow()
        ),
        Err(e) => println!("{}  alice -> carol {} rejected: {}", "✗".red().bold(), amount, e),
    }

    print_chain(&chain);

    println!("{}", "Balances:".bold());
    print_wallet("alice", &alice);
    print_wallet("bob", &bob);
    print_wallet("carol", &carol);
    println!();

    print_validity(&chain);

    if args.tamper {
        println!();
        println!("{}", "Tampering with the last transfer...".bold().yellow());
        let tampered = tamper_last_transfer(&chain)?;
        print_validity(&tampered);
    }

    Ok(())
}

/// Copy of `chain` whose last transfer claims ten times its real amount.
fn tamper_last_transfer(chain: &Chain) -> Result<Chain> {
    let mut blocks = chain.blocks().to_vec();
    let index = blocks
        .iter()
        .rposition(|b| b.transaction().is_some())
        .context("No transfer block to tamper with")?;

    let mut parts = blocks[index].clone().into_parts();
    if let Payload::Transfer(tx) = &parts.payload {
        let inflated = Transaction::new(
            tx.amount().saturating_mul(10),
            tx.payer().clone(),
            tx.payee().clone(),
        )?;
        parts.payload = Payload::Transfer(inflated);
    }
    blocks[index] = Block::from_parts(parts);

    Ok(Chain::from_blocks(chain.config().clone(), blocks)?)
}
