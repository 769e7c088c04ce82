//! Console rendering of blocks and wallets.

use chrono::DateTime;
use colored::Colorize;
use powledger_chain::Chain;
use powledger_core::{Block, PublicKey};
use powledger_wallet::Wallet;

fn format_timestamp(timestamp: u64) -> String {
    i64::try_from(timestamp)
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

fn short_key(key: &PublicKey) -> String {
    key.to_address().to_hex()[..12].to_string()
}

pub fn print_block(index: usize, block: &Block) {
    let label = match block.transaction() {
        Some(tx) => format!(
            "{} -> {}  amount {}",
            short_key(tx.payer()),
            short_key(tx.payee()),
            tx.amount()
        ),
        None => "genesis".to_string(),
    };

    println!(
        "  {} {} {}",
        format!("#{}", index).bright_black(),
        block.hash().to_hex()[..16].bright_yellow(),
        label
    );
    println!(
        "     prev {}  nonce {}  {}",
        block.previous_hash().to_hex()[..16].bright_black(),
        block.nonce().to_string().bright_cyan(),
        format_timestamp(block.timestamp()).bright_black()
    );
}

pub fn print_chain(chain: &Chain) {
    println!();
    println!("{}", "Blocks:".bold().cyan());
    for (index, block) in chain.blocks().iter().enumerate() {
        print_block(index, block);
    }
    println!();
}

pub fn print_wallet(name: &str, wallet: &Wallet) {
    println!(
        "  {:<6} {}  balance {}",
        name,
        wallet.address().to_hex()[..12].bright_black(),
        wallet.balance().to_string().bright_cyan()
    );
}

pub fn print_validity(chain: &Chain) {
    match chain.validate() {
        Ok(()) => println!("{}  Chain is valid", "✓".green().bold()),
        Err(violation) => println!("{}  {}", "✗".red().bold(), violation.to_string().red()),
    }
}
