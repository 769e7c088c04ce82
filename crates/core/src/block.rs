//! Candidate and sealed blocks.
//!
//! A block goes through two phases. A [`CandidateBlock`] is the mutable
//! working copy a miner varies the nonce on; once a nonce is chosen it is
//! converted into an immutable [`Block`] whose cached hash is computed from
//! its own fields at that moment and never changes afterwards.

use crate::hash::{hash_concat, Hash};
use crate::transaction::Transaction;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Get the current Unix timestamp in seconds.
pub fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_secs()
}

/// What a block carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Payload {
    /// Marker carried only by the first block of a chain.
    Genesis,
    /// A signed value transfer.
    Transfer(Transaction),
}

impl Payload {
    /// Deterministic encoding of the payload (variant tag, then contents).
    pub fn canonical_bytes(&self) -> Vec<u8> {
        bincode::serialize(self).expect("serialization should not fail")
    }

    /// The transfer carried by this payload, if any.
    pub fn transaction(&self) -> Option<&Transaction> {
        match self {
            Payload::Genesis => None,
            Payload::Transfer(tx) => Some(tx),
        }
    }
}

/// Hash of `previous_hash || payload || timestamp || nonce`.
///
/// The payload is the only variable-length part and sits between fixed-width
/// fields, so distinct field values cannot produce the same preimage.
fn block_hash(previous_hash: &Hash, payload_bytes: &[u8], timestamp: u64, nonce: u64) -> Hash {
    hash_concat(&[
        previous_hash.as_ref(),
        payload_bytes,
        &timestamp.to_le_bytes(),
        &nonce.to_le_bytes(),
    ])
}

/// A block under construction. Only the nonce can change.
#[derive(Debug, Clone)]
pub struct CandidateBlock {
    previous_hash: Hash,
    payload: Payload,
    payload_bytes: Vec<u8>,
    timestamp: u64,
    nonce: u64,
}

impl CandidateBlock {
    /// Create a candidate on top of `previous_hash`. The nonce starts at 0.
    pub fn new(previous_hash: Hash, payload: Payload, timestamp: u64) -> Self {
        let payload_bytes = payload.canonical_bytes();
        Self {
            previous_hash,
            payload,
            payload_bytes,
            timestamp,
            nonce: 0,
        }
    }

    /// Create a genesis candidate (zero predecessor, genesis marker).
    pub fn genesis(timestamp: u64) -> Self {
        Self::new(Hash::ZERO, Payload::Genesis, timestamp)
    }

    pub fn previous_hash(&self) -> Hash {
        self.previous_hash
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn set_nonce(&mut self, nonce: u64) {
        self.nonce = nonce;
    }

    /// Hash of the candidate with its current nonce.
    pub fn calculate_hash(&self) -> Hash {
        self.hash_with_nonce(self.nonce)
    }

    /// Hash the candidate would have with `nonce`, without changing it.
    pub fn hash_with_nonce(&self, nonce: u64) -> Hash {
        block_hash(&self.previous_hash, &self.payload_bytes, self.timestamp, nonce)
    }

    /// Fix the nonce and freeze the block.
    pub fn seal(mut self, nonce: u64) -> Block {
        self.nonce = nonce;
        let hash = self.calculate_hash();
        Block {
            previous_hash: self.previous_hash,
            payload: self.payload,
            timestamp: self.timestamp,
            nonce: self.nonce,
            hash,
        }
    }
}

/// A sealed block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    previous_hash: Hash,
    payload: Payload,
    timestamp: u64,
    nonce: u64,
    hash: Hash,
}

/// The raw fields of a block, for taking one apart or reassembling one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockParts {
    pub previous_hash: Hash,
    pub payload: Payload,
    pub timestamp: u64,
    pub nonce: u64,
    pub hash: Hash,
}

impl Block {
    /// Reassemble a block from raw parts, e.g. received from elsewhere.
    ///
    /// Nothing is checked: the stored hash is kept as given. Use
    /// [`Block::has_valid_hash`] or chain validation to detect tampering.
    pub fn from_parts(parts: BlockParts) -> Self {
        Self {
            previous_hash: parts.previous_hash,
            payload: parts.payload,
            timestamp: parts.timestamp,
            nonce: parts.nonce,
            hash: parts.hash,
        }
    }

    pub fn into_parts(self) -> BlockParts {
        BlockParts {
            previous_hash: self.previous_hash,
            payload: self.payload,
            timestamp: self.timestamp,
            nonce: self.nonce,
            hash: self.hash,
        }
    }

    pub fn previous_hash(&self) -> Hash {
        self.previous_hash
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// The transfer in this block, `None` for genesis.
    pub fn transaction(&self) -> Option<&Transaction> {
        self.payload.transaction()
    }

    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    /// The cached hash fixed when the block was sealed.
    pub fn hash(&self) -> Hash {
        self.hash
    }

    /// Recompute the hash from the current field values.
    pub fn calculate_hash(&self) -> Hash {
        block_hash(
            &self.previous_hash,
            &self.payload.canonical_bytes(),
            self.timestamp,
            self.nonce,
        )
    }

    /// Check that the cached hash matches the block's content.
    pub fn has_valid_hash(&self) -> bool {
        self.hash == self.calculate_hash()
    }

    /// Check if this is a genesis block.
    pub fn is_genesis(&self) -> bool {
        self.payload == Payload::Genesis && self.previous_hash == Hash::ZERO
    }
}
