//! CLI commands module.

use anyhow::Result;
use clap::Subcommand;

mod chain_args;
mod demo;
mod display;
mod mine;
mod puzzle;

#[derive(Subcommand)]
pub enum Commands {
    /// Run the two-transfer wallet scenario
    Demo(demo::DemoArgs),
    /// Append a batch of transfers and report the mining work
    Mine(mine::MineArgs),
    /// Solve the standalone seed/solution hash puzzle
    Puzzle(puzzle::PuzzleArgs),
}

pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Demo(args) => demo::run(args),
        Commands::Mine(args) => mine::run(args),
        Commands::Puzzle(args) => puzzle::run(args),
    }
}
