//! Core types for ledger signing-order resolution.
//!
//! This crate provides the foundational types shared by the lookup and
//! resolver crates:
//! - Entity identifiers (`AccountId`, `FileId`, etc.) and transaction ids
//! - The recursive [`KeyNode`] model with equality up to decodability
//! - Transaction bodies for every operation kind
//! - The [`KeyOrderingFailure`] taxonomy
//! - Configuration of well-known entities and waivers
//! - Postcard codec helpers

#![deny(unsafe_code)]

pub mod codec;
pub mod config;
pub mod error;
pub mod key;
pub mod transaction;
pub mod types;

// Re-export commonly used types at crate root
pub use codec::{CodecError, decode, encode};
pub use error::KeyOrderingFailure;
pub use key::{KeyAlgorithm, KeyError, KeyList, KeyNode, LeafKey, MAX_KEY_DEPTH, ThresholdKey};
pub use transaction::{Transaction, TransactionBody};
pub use types::*;
