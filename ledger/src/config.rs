//! # Ledger Constants
//!
//! Every value that feeds into a block hash lives here. Changing any of them
//! changes every hash downstream, which silently invalidates every chain
//! already written out. Treat this file as a wire format.

use chrono::SecondsFormat;

// ---------------------------------------------------------------------------
// Hashing
// ---------------------------------------------------------------------------

/// Name of the digest used for both hashing stages.
pub const HASH_ALGORITHM: &str = "SHA-256";

/// Digest output length in bytes.
pub const HASH_OUTPUT_LENGTH: usize = 32;

/// Byte form of the genesis marker: the `prev_hash` of the first block.
///
/// This is a reserved value, not a digest. It is one byte long, so no real
/// hash (always [`HASH_OUTPUT_LENGTH`] bytes) can ever equal it.
pub const GENESIS_MARKER: [u8; 1] = [0];

/// Separator between the fields of the hashed body `index,timestamp,payload`.
pub const BODY_FIELD_SEPARATOR: char = ',';

// ---------------------------------------------------------------------------
// Timestamps
// ---------------------------------------------------------------------------

/// Fractional-second precision of timestamps inside the hashed body.
///
/// Bodies render timestamps as RFC 3339 in UTC with exactly nine fractional
/// digits and a `Z` suffix, e.g. `2026-10-16T09:30:00.000000000Z`. Two
/// renderings of the same instant that differ in precision or offset style
/// would hash differently, so this is fixed.
pub const BODY_TIMESTAMP_PRECISION: SecondsFormat = SecondsFormat::Nanos;

/// Index of the first block in every chain.
pub const GENESIS_INDEX: u64 = 0;

/// Payload a freshly minted block carries until the caller sets one.
pub const DEFAULT_PAYLOAD: i64 = 0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn genesis_marker_cannot_be_a_digest() {
        assert_ne!(GENESIS_MARKER.len(), HASH_OUTPUT_LENGTH);
    }

    #[test]
    fn genesis_marker_is_single_zero_byte() {
        assert_eq!(GENESIS_MARKER, [0u8]);
    }
}
