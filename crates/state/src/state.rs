//! Atomically published ledger state.
//!
//! Readers take the current [`StateSnapshot`] without locking and keep a
//! consistent view for as long as they hold it. Writers are serialized and
//! publish a whole new snapshot per commit.

use std::sync::Arc;

use arc_swap::ArcSwap;
use ledger_sigs_types::CodecError;
use parking_lot::Mutex;
use snafu::{ResultExt, Snafu};
use tracing::info;

use crate::snapshot::{SnapshotBuilder, StateSnapshot};

/// State publication error types.
#[derive(Debug, Snafu)]
pub enum StateError {
    /// A record could not be encoded while building the next snapshot.
    #[snafu(display("Codec error: {source}"))]
    Codec {
        /// The underlying codec error.
        source: CodecError,
    },
}

/// Result type for state operations.
pub type Result<T> = std::result::Result<T, StateError>;

/// Holds the latest published [`StateSnapshot`].
///
/// # Performance
///
/// - **Reads**: Lock-free via `ArcSwap`. A reader never waits for a commit.
/// - **Writes**: Serialized by a mutex; each commit copies the record map.
#[derive(Debug)]
pub struct LedgerState {
    current: ArcSwap<StateSnapshot>,
    writer: Mutex<()>,
}

impl LedgerState {
    /// Creates a state publishing `initial`.
    #[must_use]
    pub fn new(initial: StateSnapshot) -> Self {
        Self { current: ArcSwap::from_pointee(initial), writer: Mutex::new(()) }
    }

    /// Returns the current snapshot.
    ///
    /// The snapshot stays valid and unchanged even if a commit publishes a
    /// newer one while it is held.
    #[must_use]
    pub fn snapshot(&self) -> Arc<StateSnapshot> {
        self.current.load_full()
    }

    /// Applies `apply` to a copy of the current snapshot and publishes the
    /// result. Returns the new sequence number.
    ///
    /// Nothing is published if `apply` fails.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::Codec`] if `apply` fails to encode a record.
    pub fn commit<F>(&self, apply: F) -> Result<u64>
    where
        F: FnOnce(&mut SnapshotBuilder) -> std::result::Result<(), CodecError>,
    {
        let _guard = self.writer.lock();
        let mut builder = self.current.load().to_builder();
        apply(&mut builder).context(CodecSnafu)?;
        let next = builder.build();
        let sequence = next.sequence();
        let entities = next.len();
        self.current.store(Arc::new(next));
        info!(sequence, entities, "Published state snapshot");
        Ok(sequence)
    }
}

impl Default for LedgerState {
    fn default() -> Self {
        Self::new(StateSnapshot::default())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::disallowed_methods)]
mod tests {
    use std::thread;

    use ledger_sigs_types::{AccountId, KeyNode};

    use super::*;
    use crate::{lookup::SigMetadataLookup, records::AccountRecord};

    fn record(seed: u8) -> AccountRecord {
        AccountRecord::builder().key(KeyNode::ed25519([seed; 32])).build()
    }

    #[test]
    fn test_commit_publishes_new_snapshot() {
        let state = LedgerState::default();
        let before = state.snapshot();

        let sequence = state
            .commit(|builder| {
                builder.put_account(AccountId::num_only(1001), &record(1))?;
                Ok(())
            })
            .unwrap();

        assert_eq!(sequence, 1);
        assert!(before.account_signing_meta(AccountId::num_only(1001)).is_err());
        let after = state.snapshot();
        assert_eq!(after.sequence(), 1);
        assert!(after.account_signing_meta(AccountId::num_only(1001)).is_ok());
    }

    #[test]
    fn test_held_snapshot_is_stable() {
        let state = LedgerState::default();
        state.commit(|b| b.put_account(AccountId::num_only(1), &record(1)).map(|_| ())).unwrap();
        let held = state.snapshot();

        state.commit(|b| b.put_account(AccountId::num_only(1), &record(2)).map(|_| ())).unwrap();

        let old = held.account_signing_meta(AccountId::num_only(1)).unwrap();
        let new = state.snapshot().account_signing_meta(AccountId::num_only(1)).unwrap();
        assert_eq!(old.key, KeyNode::ed25519([1; 32]));
        assert_eq!(new.key, KeyNode::ed25519([2; 32]));
    }

    #[test]
    fn test_concurrent_commits_are_serialized() {
        let state = Arc::new(LedgerState::default());
        let handles: Vec<_> = (0..8u8)
            .map(|i| {
                let state = Arc::clone(&state);
                thread::spawn(move || {
                    state
                        .commit(|b| {
                            b.put_account(AccountId::num_only(u64::from(i) + 1), &record(i))
                                .map(|_| ())
                        })
                        .unwrap()
                })
            })
            .collect();
        let mut sequences: Vec<u64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        sequences.sort_unstable();

        assert_eq!(sequences, (1..=8).collect::<Vec<_>>());
        assert_eq!(state.snapshot().len(), 8);
    }
}
