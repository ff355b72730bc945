//! Error types for the ledger.
//!
//! Integrity failures ([`IntegrityError`]) are the reason `validate` says
//! `false`; they describe a chain that was tampered with, not a bug in the
//! caller. Precondition failures ([`LinkError`]) come from the fail-fast
//! append path and mean the caller handed over a block that does not belong
//! at the tip.

use thiserror::Error;

use crate::hash::{BlockHash, Link};

/// Why a sealed block or a chain failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntegrityError {
    /// The block's `prev_hash` is not the hash of the block before it.
    /// Points at reordering, insertion, deletion, or an edited `prev_hash`.
    #[error("block {index} link mismatch: expected prev {expected}, found {found}")]
    LinkMismatch {
        /// Position of the offending block in the chain.
        index: usize,
        /// Hash of the actual predecessor (or the genesis marker).
        expected: Link,
        /// The `prev_hash` stored on the block.
        found: Link,
    },

    /// The stored hash does not match the recomputed one.
    /// Points at an edited index, timestamp, or payload.
    #[error("block {index} hash mismatch: stored={stored}, computed={computed}")]
    HashMismatch {
        /// Position of the offending block in the chain.
        index: usize,
        stored: BlockHash,
        computed: BlockHash,
    },
}

impl IntegrityError {
    /// Position of the first block that failed.
    pub fn index(&self) -> usize {
        match self {
            IntegrityError::LinkMismatch { index, .. } | IntegrityError::HashMismatch { index, .. } => {
                *index
            }
        }
    }
}

/// A block rejected by [`Chain::append_checked`](crate::Chain::append_checked)
/// or [`Chain::mint_next`](crate::Chain::mint_next).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkError {
    /// The block's index is not the next index of the chain.
    #[error("index gap: expected block {expected}, got {found}")]
    IndexGap { expected: u64, found: u64 },

    /// The block does not point at the current tip.
    #[error("block {index} does not extend the tip: expected prev {expected}, found {found}")]
    BrokenLink {
        index: u64,
        expected: Link,
        found: Link,
    },

    /// The block already holds the last representable index; nothing can
    /// follow it.
    #[error("block {index} is the last representable index; cannot mint a successor")]
    IndexOverflow { index: u64 },
}

/// Failure to parse a hex-encoded hash or link.
#[derive(Debug, Error)]
pub enum HashParseError {
    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("invalid length: expected 32 bytes, got {0}")]
    Length(usize),
}
