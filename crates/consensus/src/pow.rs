//! Proof-of-work: difficulty predicates and the nonce search.
//!
//! The search is synchronous and CPU-bound. Without a timeout it runs until a
//! solution is found; with one it gives up once the deadline has passed.

use powledger_core::{Block, CandidateBlock, Hash};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};
use thiserror::Error;

/// How many attempts run between two deadline checks.
pub const DEADLINE_CHECK_INTERVAL: u64 = 1024;

/// Number of hex characters in a hash.
const HEX_LEN: usize = 64;

/// Errors that can occur during proof-of-work.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PowError {
    #[error("proof-of-work search timed out after {attempts} attempts")]
    Timeout { attempts: u64 },

    #[error("difficulty can never be satisfied: {0}")]
    Unsatisfiable(String),
}

pub type Result<T> = std::result::Result<T, PowError>;

/// Decides whether a hash is a valid proof of work.
pub trait DifficultyPredicate {
    fn is_satisfied_by(&self, hash: &Hash) -> bool;
}

impl<F> DifficultyPredicate for F
where
    F: Fn(&Hash) -> bool,
{
    fn is_satisfied_by(&self, hash: &Hash) -> bool {
        self(hash)
    }
}

/// The configurable difficulty schemes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    /// The first `n` hex characters of the hash are `0`.
    LeadingZeros(u32),
    /// The hex hash starts with this exact lowercase string.
    HexPrefix(String),
}

impl Difficulty {
    /// Reject schemes that no hash can ever satisfy, since searching for
    /// them would never terminate.
    pub fn validate(&self) -> Result<()> {
        match self {
            Difficulty::LeadingZeros(n) if *n as usize > HEX_LEN => Err(PowError::Unsatisfiable(
                format!("{n} leading zeros exceed the {HEX_LEN} hex characters of a hash"),
            )),
            Difficulty::HexPrefix(prefix) if prefix.len() > HEX_LEN => Err(PowError::Unsatisfiable(
                format!("prefix of {} characters is longer than a hash", prefix.len()),
            )),
            Difficulty::HexPrefix(prefix)
                if !prefix.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')) =>
            {
                Err(PowError::Unsatisfiable(format!(
                    "prefix {prefix:?} is not lowercase hex"
                )))
            }
            _ => Ok(()),
        }
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::LeadingZeros(2)
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::LeadingZeros(n) => write!(f, "{n} leading zeros"),
            Difficulty::HexPrefix(prefix) => write!(f, "prefix {prefix:?}"),
        }
    }
}

impl DifficultyPredicate for Difficulty {
    fn is_satisfied_by(&self, hash: &Hash) -> bool {
        match self {
            Difficulty::LeadingZeros(n) => hash.leading_zero_nibbles() >= *n,
            Difficulty::HexPrefix(prefix) => prefix.chars().enumerate().all(|(i, c)| {
                let Some(byte) = hash.as_bytes().get(i / 2) else {
                    return false;
                };
                let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0F };
                c.to_digit(16) == Some(u32::from(nibble)) && !c.is_ascii_uppercase()
            }),
        }
    }
}

/// The nonce search itself, independent of what is being hashed.
pub struct ProofOfWork;

impl ProofOfWork {
    /// Try `start, start + 1, ...` until `hash_at(solution)` satisfies the
    /// predicate. Returns the first such solution and its hash.
    pub fn search<P, H>(start: u64, predicate: &P, hash_at: H) -> (u64, Hash)
    where
        P: DifficultyPredicate + ?Sized,
        H: Fn(u64) -> Hash,
    {
        let mut solution = start;
        loop {
            let hash = hash_at(solution);
            if predicate.is_satisfied_by(&hash) {
                return (solution, hash);
            }
            solution = solution.wrapping_add(1);
        }
    }

    /// Like [`ProofOfWork::search`], but fails once `deadline` has passed.
    ///
    /// The clock is read every [`DEADLINE_CHECK_INTERVAL`] attempts, after
    /// the attempt itself, so a solution found on the first try is always
    /// returned.
    pub fn search_until<P, H>(
        start: u64,
        predicate: &P,
        hash_at: H,
        deadline: Instant,
    ) -> Result<(u64, Hash)>
    where
        P: DifficultyPredicate + ?Sized,
        H: Fn(u64) -> Hash,
    {
        let mut solution = start;
        let mut attempts: u64 = 0;
        loop {
            let hash = hash_at(solution);
            attempts += 1;
            if predicate.is_satisfied_by(&hash) {
                return Ok((solution, hash));
            }
            if attempts % DEADLINE_CHECK_INTERVAL == 0 && Instant::now() >= deadline {
                return Err(PowError::Timeout { attempts });
            }
            solution = solution.wrapping_add(1);
        }
    }
}

/// Seals candidate blocks by searching for a nonce over the full block
/// content.
#[derive(Debug, Clone)]
pub struct Miner {
    difficulty: Difficulty,
    timeout: Option<Duration>,
}

impl Miner {
    /// Create a miner with no time limit.
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            timeout: None,
        }
    }

    /// Bound every search to `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn difficulty(&self) -> &Difficulty {
        &self.difficulty
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Search nonces from the candidate's current nonce upwards and seal the
    /// block with the first one whose hash meets the difficulty.
    pub fn mine(&self, candidate: CandidateBlock) -> Result<Block> {
        self.difficulty.validate()?;
        let start = candidate.nonce();
        let hash_at = |nonce| candidate.hash_with_nonce(nonce);

        // a deadline too far out to represent is no deadline
        let deadline = self.timeout.and_then(|t| Instant::now().checked_add(t));
        let (nonce, _) = match deadline {
            None => ProofOfWork::search(start, &self.difficulty, hash_at),
            Some(deadline) => {
                ProofOfWork::search_until(start, &self.difficulty, hash_at, deadline)?
            }
        };

        Ok(candidate.seal(nonce))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use powledger_core::{hash, Keypair, Payload, Transaction};

    fn transfer_candidate() -> CandidateBlock {
        let a = Keypair::from_private_key(&[1u8; 32]);
        let b = Keypair::from_private_key(&[2u8; 32]);
        let tx = Transaction::new(10, a.public_key, b.public_key).unwrap();
        CandidateBlock::new(Hash::from_bytes([3u8; 32]), Payload::Transfer(tx), 1_700_000_000)
    }

    #[test]
    fn test_leading_zeros_predicate() {
        let mut bytes = [0xABu8; 32];
        bytes[0] = 0x00;
        bytes[1] = 0x0A;
        let h = Hash::from_bytes(bytes);

        assert!(Difficulty::LeadingZeros(0).is_satisfied_by(&h));
        assert!(Difficulty::LeadingZeros(3).is_satisfied_by(&h));
        assert!(!Difficulty::LeadingZeros(4).is_satisfied_by(&h));
        assert!(Difficulty::LeadingZeros(64).is_satisfied_by(&Hash::ZERO));
    }

    #[test]
    fn test_hex_prefix_predicate() {
        let h = hash(b"prefix test");
        let hex = h.to_hex();

        assert!(Difficulty::HexPrefix(String::new()).is_satisfied_by(&h));
        assert!(Difficulty::HexPrefix(hex[..5].to_string()).is_satisfied_by(&h));
        assert!(Difficulty::HexPrefix(hex.clone()).is_satisfied_by(&h));
        assert!(!Difficulty::HexPrefix(format!("{hex}0")).is_satisfied_by(&h));
    }

    #[test]
    fn test_hex_prefix_agrees_with_string_prefix() {
        for i in 0u32..200 {
            let h = hash(&i.to_le_bytes());
            let predicate = Difficulty::HexPrefix("a".to_string());
            assert_eq!(predicate.is_satisfied_by(&h), h.to_hex().starts_with('a'));
        }
    }

    #[test]
    fn test_validate_rejects_unsatisfiable() {
        assert!(Difficulty::LeadingZeros(64).validate().is_ok());
        assert!(Difficulty::LeadingZeros(65).validate().is_err());
        assert!(Difficulty::HexPrefix("00ff".into()).validate().is_ok());
        assert!(Difficulty::HexPrefix("00FF".into()).validate().is_err());
        assert!(Difficulty::HexPrefix("xyz".into()).validate().is_err());
        assert!(Difficulty::HexPrefix("0".repeat(65)).validate().is_err());
    }

    #[test]
    fn test_search_returns_smallest_solution() {
        // solution 7 is the first value above the threshold
        let predicate = |h: &Hash| h.as_bytes()[0] >= 7;
        let (solution, h) = ProofOfWork::search(0, &predicate, |n| {
            let mut bytes = [0u8; 32];
            bytes[0] = n as u8;
            Hash::from_bytes(bytes)
        });
        assert_eq!(solution, 7);
        assert_eq!(h.as_bytes()[0], 7);
    }

    #[test]
    fn test_search_is_deterministic() {
        let seed: &[u8] = b"seed";
        let hash_at = |n: u64| powledger_core::hash_concat(&[seed, &n.to_le_bytes()[..]]);
        let difficulty = Difficulty::LeadingZeros(2);

        let first = ProofOfWork::search(0, &difficulty, hash_at);
        let second = ProofOfWork::search(0, &difficulty, hash_at);
        assert_eq!(first, second);
        assert!(difficulty.is_satisfied_by(&first.1));
    }

    #[test]
    fn test_search_until_times_out() {
        let never = |_: &Hash| false;
        let result = ProofOfWork::search_until(0, &never, |n| hash(&n.to_le_bytes()), Instant::now());
        assert_eq!(
            result,
            Err(PowError::Timeout {
                attempts: DEADLINE_CHECK_INTERVAL
            })
        );
    }

    #[test]
    fn test_search_until_accepts_first_attempt_after_deadline() {
        let always = |_: &Hash| true;
        let result = ProofOfWork::search_until(5, &always, |n| hash(&n.to_le_bytes()), Instant::now());
        assert_eq!(result.unwrap().0, 5);
    }

    #[test]
    fn test_mine_zero_difficulty_is_immediate() {
        let block = Miner::new(Difficulty::LeadingZeros(0))
            .mine(transfer_candidate())
            .unwrap();
        assert_eq!(block.nonce(), 0);
        assert!(block.has_valid_hash());
    }

    #[test]
    fn test_mine_meets_difficulty() {
        let difficulty = Difficulty::LeadingZeros(3);
        let block = Miner::new(difficulty.clone()).mine(transfer_candidate()).unwrap();

        assert!(block.hash().to_hex().starts_with("000"));
        assert!(difficulty.is_satisfied_by(&block.hash()));
        assert!(block.has_valid_hash());
    }

    #[test]
    fn test_mine_finds_first_nonce() {
        let difficulty = Difficulty::LeadingZeros(2);
        let candidate = transfer_candidate();
        let block = Miner::new(difficulty.clone()).mine(candidate.clone()).unwrap();

        for nonce in 0..block.nonce() {
            assert!(!difficulty.is_satisfied_by(&candidate.hash_with_nonce(nonce)));
        }
    }

    #[test]
    fn test_mine_refuses_unsatisfiable_difficulty() {
        let miner = Miner::new(Difficulty::HexPrefix("not hex".into()));
        assert!(matches!(
            miner.mine(transfer_candidate()),
            Err(PowError::Unsatisfiable(_))
        ));
    }

    #[test]
    fn test_mine_with_unbounded_timeout() {
        let block = Miner::new(Difficulty::LeadingZeros(1))
            .with_timeout(Duration::MAX)
            .mine(transfer_candidate())
            .unwrap();
        assert!(block.hash().to_hex().starts_with('0'));
    }

    #[test]
    fn test_mine_with_timeout() {
        let miner = Miner::new(Difficulty::LeadingZeros(64)).with_timeout(Duration::ZERO);
        assert!(matches!(
            miner.mine(transfer_candidate()),
            Err(PowError::Timeout { .. })
        ));
    }
}
