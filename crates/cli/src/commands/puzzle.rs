//! Solve the standalone seed/solution hash puzzle.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use powledger_consensus::puzzle;
use std::time::Instant;

#[derive(Args)]
pub struct PuzzleArgs {
    /// Puzzle seed
    #[arg(short, long, default_value = "0")]
    seed: u64,

    /// Hex prefix the puzzle hash must start with
    #[arg(short, long, default_value = "0000")]
    prefix: String,
}

pub fn run(args: PuzzleArgs) -> Result<()> {
    println!(
        "{} seed {} for prefix {}",
        "Solving".bold().cyan(),
        args.seed,
        args.prefix.bright_yellow()
    );

    let started = Instant::now();
    let solved = puzzle::solve(args.seed, &args.prefix)?;

    println!();
    println!("  Solution: {}", solved.solution.to_string().bright_cyan());
    println!("  Hash:     {}", solved.hash.to_hex().bright_yellow());
    println!("  Time:     {}", format!("{:.2?}", started.elapsed()).bright_black());
    println!();
    println!(
        "{}",
        "Note: this puzzle covers only seed and solution, never block content.".bright_black()
    );

    Ok(())
}
