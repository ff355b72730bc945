// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Pulse Ledger: Core Library
//!
//! A hash-linked ledger: an append-only sequence of blocks, each bound to
//! its predecessor by a content hash, and a validator that notices when any
//! stored block was edited, dropped, inserted, or moved.
//!
//! ## Architecture
//!
//! - **hash**: SHA-256 primitives, [`BlockHash`] and [`Link`].
//! - **block**: [`PendingBlock`] (unsealed) and [`Block`] (sealed).
//! - **chain**: [`Chain`]: minting, appending, validation.
//! - **config**: constants that feed into every hash.
//! - **error**: integrity and precondition errors.
//!
//! ## Usage
//!
//! ```
//! use pulse_ledger::{Chain, LinkError, PendingBlock};
//!
//! let mut chain = Chain::new();
//! let mut next = chain.mint_next(PendingBlock::genesis(42))?;
//! next.set_payload(100);
//! let _pending = chain.mint_next(next)?;
//!
//! assert_eq!(chain.len(), 2);
//! assert!(chain.validate());
//! # Ok::<(), LinkError>(())
//! ```
//!
//! Single owner, single thread, no I/O. Tampering is never blocked at the
//! point of mutation; it is detected when [`Chain::validate`] recomputes the
//! hashes.

pub mod block;
pub mod chain;
pub mod config;
pub mod error;
pub mod hash;

pub use block::{Block, PendingBlock};
pub use chain::Chain;
#[cfg(any(test, feature = "tamper"))]
pub use chain::Tamper;
pub use error::{HashParseError, IntegrityError, LinkError};
pub use hash::{BlockHash, Link};
