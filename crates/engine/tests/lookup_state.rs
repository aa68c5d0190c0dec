//! Resolution against evolving ledger state and faulty lookups.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use ledger_sigs_engine::{
    NoSigWaivers, PrecheckResultFactory, ResponseCode, SigningOrderResolver,
};
use ledger_sigs_state::{AccountRecord, AccountSigningMetadata, DelegatingSigMetadataLookup, LookupError};
use ledger_sigs_test_utils::*;
use ledger_sigs_types::{
    KeyOrderingFailure,
    transaction::{AccountAmount, CryptoTransfer},
};
use tracing_subscriber::layer::SubscriberExt;

/// Counts WARN events.
struct WarnCounter {
    count: Arc<AtomicUsize>,
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for WarnCounter {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        if *event.metadata().level() == tracing::Level::WARN {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }
}

fn with_warn_counter<F, R>(f: F) -> (R, usize)
where
    F: FnOnce() -> R,
{
    let count = Arc::new(AtomicUsize::new(0));
    let subscriber = tracing_subscriber::registry().with(WarnCounter { count: count.clone() });
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, count.load(Ordering::SeqCst))
}

fn misc_to(receiver: ledger_sigs_types::AccountId) -> CryptoTransfer {
    CryptoTransfer::builder()
        .transfers(vec![AccountAmount::new(MISC_ACCOUNT, -10), AccountAmount::new(receiver, 10)])
        .build()
}

// =============================================================================
// Snapshot publication
// =============================================================================

#[test]
fn test_resolution_sees_committed_state_only_through_new_snapshot() {
    let state = scenario_state();
    let config = test_signing_config();
    let before = SigningOrderResolver::from_config(state.snapshot(), &config);
    let txn = txn(DEFAULT_PAYER, misc_to(NO_RECEIVER_SIG));

    let sequence = state
        .commit(|builder| {
            let record = AccountRecord::builder()
                .key(fixture_key(labels::NO_RECEIVER_SIG))
                .receiver_sig_required(true)
                .build();
            builder.put_account(NO_RECEIVER_SIG, &record)?;
            Ok(())
        })
        .unwrap();
    assert_eq!(sequence, 1);

    let old: Vec<_> = before.keys_for_other_parties(&txn, &PrecheckResultFactory).keys().cloned().collect();
    assert_eq!(old, vec![fixture_key(labels::MISC_ACCOUNT)]);

    let after = SigningOrderResolver::from_config(state.snapshot(), &config);
    let new: Vec<_> = after.keys_for_other_parties(&txn, &PrecheckResultFactory).keys().cloned().collect();
    assert_eq!(new, vec![fixture_key(labels::MISC_ACCOUNT), fixture_key(labels::NO_RECEIVER_SIG)]);
}

#[test]
fn test_removed_account_becomes_missing() {
    let state = scenario_state();
    state
        .commit(|builder| {
            assert!(builder.remove(NO_RECEIVER_SIG));
            Ok(())
        })
        .unwrap();
    let resolver = SigningOrderResolver::from_config(state.snapshot(), &test_signing_config());
    let txn = txn(DEFAULT_PAYER, misc_to(NO_RECEIVER_SIG));
    let rejection =
        resolver.keys_for_other_parties(&txn, &PrecheckResultFactory).into_result().unwrap_err();
    assert_eq!(rejection.failure.reason, KeyOrderingFailure::MissingAccount);
}

#[test]
fn test_resolver_shared_across_threads() {
    let resolver = SigningOrderResolver::from_config(scenario_snapshot(), &test_signing_config());
    let txn = txn(DEFAULT_PAYER, misc_to(RECEIVER_SIG));
    let expected = resolver.keys_for_other_parties(&txn, &PrecheckResultFactory);
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| resolver.keys_for_other_parties(&txn, &PrecheckResultFactory)))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

// =============================================================================
// Lookup faults
// =============================================================================

#[test]
fn test_corrupt_record_is_general_error() {
    let state = scenario_state();
    state
        .commit(|builder| {
            builder.put_encoded(RECEIVER_SIG, vec![0xFF, 0xFF, 0xFF]);
            Ok(())
        })
        .unwrap();
    let resolver = SigningOrderResolver::from_config(state.snapshot(), &test_signing_config());
    let txn = txn(DEFAULT_PAYER, misc_to(RECEIVER_SIG));

    let (result, warnings) =
        with_warn_counter(|| resolver.keys_for_other_parties(&txn, &PrecheckResultFactory));
    let rejection = result.into_result().unwrap_err();
    assert_eq!(rejection.failure.reason, KeyOrderingFailure::GeneralError);
    assert_eq!(rejection.code, ResponseCode::Unknown);
    assert!(warnings >= 1, "backend fault should be logged at WARN");
}

#[test]
fn test_corrupt_payer_is_general_payer_error() {
    let state = scenario_state();
    state
        .commit(|builder| {
            builder.put_encoded(DEFAULT_PAYER, Vec::new());
            Ok(())
        })
        .unwrap();
    let resolver = SigningOrderResolver::from_config(state.snapshot(), &test_signing_config());
    let rejection = resolver
        .keys_for_payer(&txn(DEFAULT_PAYER, misc_to(RECEIVER_SIG)), &PrecheckResultFactory)
        .into_result()
        .unwrap_err();
    assert_eq!(rejection.failure.reason, KeyOrderingFailure::GeneralPayerError);
}

#[test]
fn test_unexpected_failure_kind_is_general_error() {
    let lookup = DelegatingSigMetadataLookup::new().with_accounts(|id| {
        if id == MISC_ACCOUNT {
            Ok(AccountSigningMetadata { key: fixture_key(labels::MISC_ACCOUNT), receiver_sig_required: false })
        } else {
            Err(LookupError::failure(KeyOrderingFailure::MissingFile, id))
        }
    });
    let resolver = SigningOrderResolver::new(lookup, NoSigWaivers);
    let txn = txn(DEFAULT_PAYER, misc_to(RECEIVER_SIG));
    let rejection =
        resolver.keys_for_other_parties(&txn, &PrecheckResultFactory).into_result().unwrap_err();
    assert_eq!(rejection.failure.reason, KeyOrderingFailure::GeneralError);
    assert_eq!(rejection.failure.entity, Some(RECEIVER_SIG.into()));
}

#[test]
fn test_delegating_lookup_defaults_to_missing() {
    let resolver = SigningOrderResolver::new(DelegatingSigMetadataLookup::new(), NoSigWaivers);
    let txn = txn(DEFAULT_PAYER, misc_to(RECEIVER_SIG));
    let rejection = resolver.keys_for_payer(&txn, &PrecheckResultFactory).into_result().unwrap_err();
    assert_eq!(rejection.failure.reason, KeyOrderingFailure::InvalidPayerAccount);
}
