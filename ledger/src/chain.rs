//! In-memory chain management with validation.
//!
//! The chain owns every sealed block. Callers hold only the pending tail,
//! and hand it back through [`Chain::mint_next`], which seals it, appends it
//! and returns its successor. Linkage is not checked on the way in (unless
//! the caller opts into [`Chain::append_checked`]); it is a property of the
//! whole sequence and [`Chain::validate`] checks it on demand.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::block::{Block, PendingBlock};
use crate::error::{IntegrityError, LinkError};
use crate::hash::Link;

/// Ordered chain of sealed blocks. Insertion order is index order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Chain {
    blocks: Vec<Block>,
}

impl Chain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a sealed block to the chain tip. No linkage check.
    pub fn append(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Appends a sealed block only if it extends the current tip.
    ///
    /// The block's index must equal [`len`](Self::len) and its `prev_hash`
    /// must be the tip's hash (the genesis marker on an empty chain). On
    /// rejection the chain is unchanged.
    pub fn append_checked(&mut self, block: Block) -> Result<(), LinkError> {
        let expected_index = self.blocks.len() as u64;
        if block.index() != expected_index {
            return Err(LinkError::IndexGap {
                expected: expected_index,
                found: block.index(),
            });
        }

        let expected = self.tip_link();
        if *block.prev_hash() != expected {
            return Err(LinkError::BrokenLink {
                index: block.index(),
                expected,
                found: *block.prev_hash(),
            });
        }

        self.blocks.push(block);
        Ok(())
    }

    /// Seals `pending`, appends it, and returns its unsealed successor
    /// stamped with the current time.
    ///
    /// # Errors
    ///
    /// [`LinkError::IndexOverflow`] if `pending` already holds `u64::MAX`.
    /// The chain is left unchanged.
    pub fn mint_next(&mut self, pending: PendingBlock) -> Result<PendingBlock, LinkError> {
        self.mint_next_at(pending, Utc::now())
    }

    /// [`mint_next`](Self::mint_next) with an explicit timestamp for the
    /// successor.
    pub fn mint_next_at(
        &mut self,
        pending: PendingBlock,
        timestamp: DateTime<Utc>,
    ) -> Result<PendingBlock, LinkError> {
        let index = pending.index();
        let sealed = pending.seal();
        let next = PendingBlock::successor(&sealed, timestamp)
            .ok_or(LinkError::IndexOverflow { index })?;
        tracing::debug!(
            index = sealed.index(),
            payload = sealed.payload(),
            next_index = next.index(),
            "minted block"
        );
        self.blocks.push(sealed);
        Ok(next)
    }

    /// Walks the chain front to back and reports the first integrity failure.
    ///
    /// The expected link starts at the genesis marker and advances to each
    /// block's stored hash after that block passes.
    pub fn verify(&self) -> Result<(), IntegrityError> {
        let mut expected = Link::Genesis;
        for (position, block) in self.blocks.iter().enumerate() {
            if let Err(err) = block.check(position, &expected) {
                tracing::debug!(%err, "chain integrity check failed");
                return Err(err);
            }
            expected = Link::Parent(*block.hash());
        }
        Ok(())
    }

    /// `true` iff every block links to its predecessor and carries an
    /// up-to-date hash. An empty chain is valid.
    pub fn validate(&self) -> bool {
        self.verify().is_ok()
    }

    /// Read-only view of the stored blocks.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Block> {
        self.blocks.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    /// Returns the latest block, if any.
    pub fn tip(&self) -> Option<&Block> {
        self.blocks.last()
    }

    /// Link a block appended now would need.
    pub fn tip_link(&self) -> Link {
        self.tip()
            .map(|block| Link::Parent(*block.hash()))
            .unwrap_or(Link::Genesis)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Returns the chain height (number of blocks).
    pub fn height(&self) -> u64 {
        self.blocks.len() as u64
    }

    /// Direct access to stored blocks, bypassing the sealed-block contract.
    #[cfg(any(test, feature = "tamper"))]
    pub fn tamper(&mut self) -> Tamper<'_> {
        Tamper {
            blocks: &mut self.blocks,
        }
    }
}

impl<'a> IntoIterator for &'a Chain {
    type Item = &'a Block;
    type IntoIter = std::slice::Iter<'a, Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, block) in self.blocks.iter().enumerate() {
            write!(f, " {} ({}),", i, block)?;
        }
        write!(f, "]")
    }
}

// ---------------------------------------------------------------------------
// Tamper harness
// ---------------------------------------------------------------------------

/// Mutable handle over a chain's storage.
///
/// Every edit leaves stored hashes untouched, which is the point: the result
/// is a chain that [`Chain::validate`] must reject. Methods panic on
/// out-of-range positions, like slice indexing.
#[cfg(any(test, feature = "tamper"))]
pub struct Tamper<'a> {
    blocks: &'a mut Vec<Block>,
}

#[cfg(any(test, feature = "tamper"))]
impl Tamper<'_> {
    pub fn set_payload(&mut self, position: usize, payload: i64) -> &mut Self {
        self.blocks[position].set_payload_unchecked(payload);
        self
    }

    pub fn set_timestamp(&mut self, position: usize, timestamp: DateTime<Utc>) -> &mut Self {
        self.blocks[position].set_timestamp_unchecked(timestamp);
        self
    }

    pub fn set_prev_hash(&mut self, position: usize, prev_hash: Link) -> &mut Self {
        self.blocks[position].set_prev_hash_unchecked(prev_hash);
        self
    }

    pub fn swap(&mut self, a: usize, b: usize) -> &mut Self {
        self.blocks.swap(a, b);
        self
    }

    pub fn remove(&mut self, position: usize) -> Block {
        self.blocks.remove(position)
    }

    pub fn insert(&mut self, position: usize, block: Block) -> &mut Self {
        self.blocks.insert(position, block);
        self
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
