//! # Block Structure
//!
//! A block records one payload reading, the moment it was taken, its
//! position in the chain, and a hash that binds all of that to the block
//! before it.
//!
//! Blocks exist in two states, and each state is its own type:
//!
//! ```text
//! PendingBlock ──seal()──▶ Block
//!  index                    index
//!  timestamp                timestamp
//!  payload (mutable)        payload
//!  prev_hash                prev_hash
//!                           hash
//! ```
//!
//! A `PendingBlock` has no hash and its payload can still be set. Sealing
//! consumes it and freezes the hash. A `Block` exposes read-only accessors
//! and is the only type that can be validated, so "validate before seal"
//! cannot be written.
//!
//! ## Hash Computation
//!
//! See [`crate::hash`] for the two-stage digest. The body string is
//! `"{index},{timestamp},{payload}"` with the timestamp rendered by
//! [`body_timestamp`].

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{
    BODY_FIELD_SEPARATOR, BODY_TIMESTAMP_PRECISION, DEFAULT_PAYLOAD, GENESIS_INDEX,
};
use crate::error::IntegrityError;
use crate::hash::{body_digest, link_digest, BlockHash, Link};

/// Render a timestamp the way it enters the hashed body.
///
/// RFC 3339, UTC, nine fractional digits, `Z` suffix. Fixed width, so the
/// same instant always produces the same bytes.
pub fn body_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(BODY_TIMESTAMP_PRECISION, true)
}

/// Serialize the hashed body `index,timestamp,payload`.
pub fn body_string(index: u64, timestamp: &DateTime<Utc>, payload: i64) -> String {
    format!(
        "{index}{sep}{ts}{sep}{payload}",
        sep = BODY_FIELD_SEPARATOR,
        ts = body_timestamp(timestamp),
    )
}

/// Compute a block hash from its constituent fields.
pub fn compute_block_hash(
    index: u64,
    timestamp: &DateTime<Utc>,
    payload: i64,
    prev_hash: &Link,
) -> BlockHash {
    let body = body_digest(&body_string(index, timestamp, payload));
    link_digest(prev_hash.as_bytes(), &body)
}

// ---------------------------------------------------------------------------
// PendingBlock
// ---------------------------------------------------------------------------

/// An unsealed block: the chain's pending tail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingBlock {
    index: u64,
    timestamp: DateTime<Utc>,
    payload: i64,
    prev_hash: Link,
}

impl PendingBlock {
    /// Construct an unsealed block from raw fields.
    pub fn new(index: u64, timestamp: DateTime<Utc>, payload: i64, prev_hash: Link) -> Self {
        PendingBlock {
            index,
            timestamp,
            payload,
            prev_hash,
        }
    }

    /// The first block of a chain, stamped now.
    pub fn genesis(payload: i64) -> Self {
        Self::genesis_at(Utc::now(), payload)
    }

    /// The first block of a chain with an explicit timestamp.
    pub fn genesis_at(timestamp: DateTime<Utc>, payload: i64) -> Self {
        Self::new(GENESIS_INDEX, timestamp, payload, Link::Genesis)
    }

    /// Successor of `parent`, linked to its hash, with the default payload.
    /// `None` if `parent` already holds the last representable index.
    pub(crate) fn successor(parent: &Block, timestamp: DateTime<Utc>) -> Option<Self> {
        let index = parent.index.checked_add(1)?;
        Some(Self::new(
            index,
            timestamp,
            DEFAULT_PAYLOAD,
            Link::Parent(parent.hash),
        ))
    }

    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn payload(&self) -> i64 {
        self.payload
    }

    pub fn prev_hash(&self) -> &Link {
        &self.prev_hash
    }

    /// Set the payload. Only possible before sealing.
    pub fn set_payload(&mut self, payload: i64) {
        self.payload = payload;
    }

    /// Builder-style [`set_payload`](Self::set_payload).
    pub fn with_payload(mut self, payload: i64) -> Self {
        self.payload = payload;
        self
    }

    /// Hash this block would get if sealed right now.
    pub fn compute_hash(&self) -> BlockHash {
        compute_block_hash(self.index, &self.timestamp, self.payload, &self.prev_hash)
    }

    /// Compute and freeze the hash.
    pub fn seal(self) -> Block {
        let hash = self.compute_hash();
        tracing::debug!(index = self.index, hash = %hash, "sealed block");
        Block {
            index: self.index,
            timestamp: self.timestamp,
            payload: self.payload,
            hash,
            prev_hash: self.prev_hash,
        }
    }
}

impl fmt::Display for PendingBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Index: {}, TimeStamp: {}, Payload: {}, Hash: <unsealed>, PrevHash: {}",
            self.index,
            body_timestamp(&self.timestamp),
            self.payload,
            self.prev_hash,
        )
    }
}

// ---------------------------------------------------------------------------
// Block
// ---------------------------------------------------------------------------

/// A sealed block.
///
/// Fields are private. Inside a [`Chain`](crate::Chain) the only way to
/// change one is the test-only tamper harness; anything that does so leaves
/// `hash` stale, which [`Block::validate`] reports.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    index: u64,
    timestamp: DateTime<Utc>,
    payload: i64,
    hash: BlockHash,
    prev_hash: Link,
}

impl Block {
    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn payload(&self) -> i64 {
        self.payload
    }

    /// The hash frozen at seal time.
    pub fn hash(&self) -> &BlockHash {
        &self.hash
    }

    pub fn prev_hash(&self) -> &Link {
        &self.prev_hash
    }

    /// Whether this block claims to open a chain.
    pub fn is_genesis(&self) -> bool {
        self.prev_hash.is_genesis()
    }

    /// Recompute the hash from the current field values.
    ///
    /// Equal to [`hash`](Self::hash) unless the block was edited after
    /// sealing.
    pub fn compute_hash(&self) -> BlockHash {
        compute_block_hash(self.index, &self.timestamp, self.payload, &self.prev_hash)
    }

    /// Check linkage and content against the expected predecessor link.
    ///
    /// Linkage is checked first. `position` is the block's place in the
    /// sequence being walked, used only for the report.
    ///
    /// # Errors
    ///
    /// [`IntegrityError::LinkMismatch`] if `prev_hash != expected_prev`,
    /// otherwise [`IntegrityError::HashMismatch`] if the stored hash is stale.
    pub fn check(&self, position: usize, expected_prev: &Link) -> Result<(), IntegrityError> {
        if self.prev_hash != *expected_prev {
            return Err(IntegrityError::LinkMismatch {
                index: position,
                expected: *expected_prev,
                found: self.prev_hash,
            });
        }

        let computed = self.compute_hash();
        if self.hash != computed {
            return Err(IntegrityError::HashMismatch {
                index: position,
                stored: self.hash,
                computed,
            });
        }

        Ok(())
    }

    /// `true` iff `prev_hash == expected_prev` and the stored hash matches a
    /// fresh recomputation. No side effects.
    pub fn validate(&self, expected_prev: &Link) -> bool {
        self.prev_hash == *expected_prev && self.hash == self.compute_hash()
    }

    // Tamper harness hooks.

    #[cfg(any(test, feature = "tamper"))]
    pub(crate) fn set_payload_unchecked(&mut self, payload: i64) {
        self.payload = payload;
    }

    #[cfg(any(test, feature = "tamper"))]
    pub(crate) fn set_timestamp_unchecked(&mut self, timestamp: DateTime<Utc>) {
        self.timestamp = timestamp;
    }

    #[cfg(any(test, feature = "tamper"))]
    pub(crate) fn set_prev_hash_unchecked(&mut self, prev_hash: Link) {
        self.prev_hash = prev_hash;
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Index: {}, TimeStamp: {}, Payload: {}, Hash: {}, PrevHash: {}",
            self.index,
            body_timestamp(&self.timestamp),
            self.payload,
            self.hash,
            self.prev_hash,
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
