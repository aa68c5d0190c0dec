//! Signing metadata lookups for ledger signing-order resolution.
//!
//! This crate sits between stored ledger state and the resolver, providing:
//!
//! - The [`SigMetadataLookup`] capability and its error type
//! - Per-entity signing metadata projections
//! - Stored entity records and their projections
//! - Immutable, postcard-encoded [`StateSnapshot`]s
//! - [`LedgerState`], which publishes snapshots atomically

#![deny(unsafe_code)]

mod lookup;
mod metadata;
mod records;
mod snapshot;
mod state;

pub use lookup::{DelegatingSigMetadataLookup, LookupError, LookupResult, SigMetadataLookup};
pub use metadata::{
    AccountSigningMetadata, ContractSigningMetadata, FileSigningMetadata,
    ScheduleSigningMetadata, TokenSigningMetadata, TopicSigningMetadata,
};
pub use records::{
    AccountRecord, ContractRecord, FileRecord, ScheduleRecord, TokenRecord, TopicRecord,
};
pub use snapshot::{SnapshotBuilder, StateSnapshot};
pub use state::{LedgerState, StateError};
