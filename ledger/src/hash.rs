//! # Hashing
//!
//! Digest primitives for block sealing, plus the two value types that carry
//! digests around the ledger:
//!
//! - [`BlockHash`]: a 32-byte SHA-256 output, rendered as lowercase hex.
//! - [`Link`]: what a block points back at: either the genesis marker or
//!   the hash of its predecessor.
//!
//! ## Two-stage construction
//!
//! A block hash is never a single digest over all fields. It is
//!
//! ```text
//! body = SHA-256("{index},{timestamp},{payload}")
//! hash = SHA-256(prev_hash_bytes || body)
//! ```
//!
//! The body digest is computed over the text form of the fields, then the
//! link digest binds it to the predecessor. Both stages are part of the
//! stability contract: collapsing them into one pass would change every hash.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::config::{GENESIS_MARKER, HASH_OUTPUT_LENGTH};
use crate::error::HashParseError;

/// Compute the SHA-256 hash of the input data.
pub fn sha256(data: &[u8]) -> [u8; HASH_OUTPUT_LENGTH] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Inner stage: digest of the serialized block body.
pub fn body_digest(body: &str) -> [u8; HASH_OUTPUT_LENGTH] {
    sha256(body.as_bytes())
}

/// Outer stage: digest of `prev || body_digest`.
///
/// Feeds both parts into one hasher rather than concatenating into a buffer;
/// the output is identical.
pub fn link_digest(prev: &[u8], body_digest: &[u8; HASH_OUTPUT_LENGTH]) -> BlockHash {
    let mut hasher = Sha256::new();
    hasher.update(prev);
    hasher.update(body_digest);
    BlockHash(hasher.finalize().into())
}

// ---------------------------------------------------------------------------
// BlockHash
// ---------------------------------------------------------------------------

/// The sealed content hash of a block.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockHash([u8; HASH_OUTPUT_LENGTH]);

impl BlockHash {
    /// Wrap raw digest bytes.
    pub const fn from_bytes(bytes: [u8; HASH_OUTPUT_LENGTH]) -> Self {
        BlockHash(bytes)
    }

    /// Raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; HASH_OUTPUT_LENGTH] {
        &self.0
    }

    /// Lowercase hex rendering.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockHash({})", self.to_hex())
    }
}

impl FromStr for BlockHash {
    type Err = HashParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s)?;
        let array: [u8; HASH_OUTPUT_LENGTH] = bytes
            .try_into()
            .map_err(|b: Vec<u8>| HashParseError::Length(b.len()))?;
        Ok(BlockHash(array))
    }
}

impl Serialize for BlockHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for BlockHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Link
// ---------------------------------------------------------------------------

/// A block's reference to its predecessor.
///
/// `Genesis` is the reserved "no predecessor" marker. Its byte form is
/// [`GENESIS_MARKER`], which is what enters the outer digest for the first
/// block. It is a distinct variant so it can never be mistaken for a hash.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Link {
    /// No predecessor: this block opens the chain.
    Genesis,
    /// Hash of the immediately preceding block.
    Parent(BlockHash),
}

impl Link {
    /// Bytes fed into the outer digest.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Link::Genesis => &GENESIS_MARKER,
            Link::Parent(hash) => hash.as_bytes(),
        }
    }

    pub fn is_genesis(&self) -> bool {
        matches!(self, Link::Genesis)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.as_bytes())
    }
}

impl From<BlockHash> for Link {
    fn from(hash: BlockHash) -> Self {
        Link::Parent(hash)
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Link {
    type Err = HashParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s)?;
        if bytes == GENESIS_MARKER {
            return Ok(Link::Genesis);
        }
        let array: [u8; HASH_OUTPUT_LENGTH] = bytes
            .try_into()
            .map_err(|b: Vec<u8>| HashParseError::Length(b.len()))?;
        Ok(Link::Parent(BlockHash(array)))
    }
}

impl Serialize for Link {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Link {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_known_vector() {
        // SHA-256 of the empty string.
        let expected =
            hex::decode("e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855")
                .unwrap();
        assert_eq!(sha256(b"").to_vec(), expected);
    }

    #[test]
    fn link_digest_matches_concatenation() {
        let body = body_digest("0,2026-01-01T00:00:00.000000000Z,42");
        let mut concatenated = GENESIS_MARKER.to_vec();
        concatenated.extend_from_slice(&body);

        let streamed = link_digest(&GENESIS_MARKER, &body);
        assert_eq!(streamed.as_bytes(), &sha256(&concatenated));
    }

    #[test]
    fn link_digest_depends_on_prev() {
        let body = body_digest("1,2026-01-01T00:00:00.000000000Z,7");
        let a = link_digest(&GENESIS_MARKER, &body);
        let b = link_digest(&[1u8; 32], &body);
        assert_ne!(a, b);
    }

    #[test]
    fn genesis_link_bytes_are_marker() {
        assert_eq!(Link::Genesis.as_bytes(), &[0u8]);
        assert_eq!(Link::Genesis.to_hex(), "00");
    }

    #[test]
    fn link_parses_marker_and_hashes() {
        assert_eq!("00".parse::<Link>().unwrap(), Link::Genesis);

        let hash = BlockHash::from_bytes([0xab; 32]);
        let parsed: Link = hash.to_hex().parse().unwrap();
        assert_eq!(parsed, Link::Parent(hash));
    }

    #[test]
    fn link_rejects_odd_lengths() {
        assert!(matches!(
            "0000".parse::<Link>(),
            Err(HashParseError::Length(2))
        ));
        assert!(matches!("zz".parse::<Link>(), Err(HashParseError::Hex(_))));
    }

    #[test]
    fn block_hash_serde_is_hex_string() {
        let hash = BlockHash::from_bytes([0x0f; 32]);
        let json = serde_json::to_string(&hash).unwrap();
        assert_eq!(json, format!("\"{}\"", "0f".repeat(32)));

        let back: BlockHash = serde_json::from_str(&json).unwrap();
        assert_eq!(back, hash);
    }

    #[test]
    fn zeroed_hash_is_not_genesis() {
        // A 32-byte all-zero value is a (bogus) parent hash, not the marker.
        let link: Link = "00".repeat(32).parse().unwrap();
        assert!(!link.is_genesis());
    }
}
