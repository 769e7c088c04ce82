//! A standalone hash puzzle over `seed || solution`.
//!
//! Unlike [`Miner`](crate::Miner), the puzzle hash covers only a seed and the
//! candidate solution, not any block content. A solved puzzle proves that work
//! was spent, but it says nothing about the integrity of a block, so it is
//! never used to seal chain blocks. It exists for demos and benchmarks of the
//! search itself.

use crate::pow::{Difficulty, DifficultyPredicate, ProofOfWork, Result};
use powledger_core::{hash_concat, Hash};

/// Solutions are tried from here upwards.
pub const FIRST_SOLUTION: u64 = 1;

/// A solved puzzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PuzzleSolution {
    pub solution: u64,
    pub hash: Hash,
}

fn puzzle_hash(seed: u64, solution: u64) -> Hash {
    hash_concat(&[&seed.to_le_bytes(), &solution.to_le_bytes()])
}

/// Find the smallest solution `>= 1` whose hash starts with `prefix`.
pub fn solve(seed: u64, prefix: &str) -> Result<PuzzleSolution> {
    let difficulty = Difficulty::HexPrefix(prefix.to_string());
    difficulty.validate()?;

    let (solution, hash) =
        ProofOfWork::search(FIRST_SOLUTION, &difficulty, |s| puzzle_hash(seed, s));
    Ok(PuzzleSolution { solution, hash })
}

/// Check a claimed solution.
pub fn verify(seed: u64, solution: u64, prefix: &str) -> bool {
    Difficulty::HexPrefix(prefix.to_string()).is_satisfied_by(&puzzle_hash(seed, solution))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solve_and_verify() {
        let solved = solve(42, "00").unwrap();
        assert!(solved.solution >= FIRST_SOLUTION);
        assert!(solved.hash.to_hex().starts_with("00"));
        assert!(verify(42, solved.solution, "00"));
    }

    #[test]
    fn test_solution_is_smallest() {
        let solved = solve(7, "0").unwrap();
        for s in FIRST_SOLUTION..solved.solution {
            assert!(!verify(7, s, "0"));
        }
    }

    #[test]
    fn test_empty_prefix_returns_first_solution() {
        assert_eq!(solve(1, "").unwrap().solution, FIRST_SOLUTION);
    }

    #[test]
    fn test_solve_is_deterministic() {
        assert_eq!(solve(100, "000").unwrap(), solve(100, "000").unwrap());
    }

    #[test]
    fn test_invalid_prefix_rejected() {
        assert!(solve(1, "zz").is_err());
    }
}
