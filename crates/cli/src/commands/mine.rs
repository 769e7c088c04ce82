//! Append a batch of transfers and report the mining work.

use super::chain_args::ChainArgs;
use super::display::{print_block, print_validity};
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use powledger_wallet::Wallet;
use std::time::Instant;

#[derive(Args)]
pub struct MineArgs {
    #[command(flatten)]
    chain: ChainArgs,

    /// Number of transfer blocks to mine
    #[arg(short, long, default_value = "5")]
    count: u64,
}

pub fn run(args: MineArgs) -> Result<()> {
    let mut chain = args.chain.open_chain()?;

    println!(
        "{} {} blocks at {}",
        "Mining".bold().cyan(),
        args.count,
        chain.config().difficulty.to_string().bright_cyan()
    );
    println!();

    let funds = (1..=args.count).sum::<u64>().max(1);
    let mut payer = Wallet::new(funds);
    let mut payee = Wallet::new(0);
    let started = Instant::now();

    for amount in 1..=args.count {
        let block_started = Instant::now();
        payer
            .send(amount, &mut payee, &mut chain)
            .with_context(|| format!("Failed to append transfer {}", amount))?;

        let index = chain.len() - 1;
        if let Some(block) = chain.last_block() {
            print_block(index, block);
        }
        println!(
            "     mined in {}",
            format!("{:.2?}", block_started.elapsed()).bright_black()
        );
    }

    let stats = chain.stats();
    println!();
    println!("  Blocks:      {}", stats.length.to_string().bright_cyan());
    println!("  Transferred: {}", stats.total_transferred.to_string().bright_cyan());
    println!("  Total time:  {}", format!("{:.2?}", started.elapsed()).bright_black());
    println!();

    print_validity(&chain);
    Ok(())
}
