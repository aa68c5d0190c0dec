//! Shared helpers for signing-order integration tests.

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use ledger_sigs_engine::{
    OrderedKey, PolicyBasedSigWaivers, PrecheckResultFactory, SigningOrderResolver,
};
use ledger_sigs_state::StateSnapshot;
use ledger_sigs_test_utils::{fixture_key, fixture_list, scenario_snapshot, test_signing_config};
use ledger_sigs_types::{KeyNode, KeyOrderingFailure, Transaction};
use tracing_subscriber::EnvFilter;

pub type ScenarioResolver = SigningOrderResolver<StateSnapshot, PolicyBasedSigWaivers>;

/// Installs a test-writer subscriber once; honours `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A resolver over the scenario ledger with the scenario configuration.
pub fn resolver() -> ScenarioResolver {
    init_tracing();
    SigningOrderResolver::from_config(scenario_snapshot(), &test_signing_config())
}

/// Non-payer keys of `txn`, panicking on failure.
pub fn ordered(txn: &Transaction) -> Vec<OrderedKey> {
    let result = resolver().keys_for_other_parties(txn, &PrecheckResultFactory);
    match result.into_result() {
        Ok(keys) => keys,
        Err(rejection) => panic!("expected a signing order, got {}", rejection.failure),
    }
}

/// Non-payer keys of `txn` without their scope tags.
pub fn keys(txn: &Transaction) -> Vec<KeyNode> {
    ordered(txn).into_iter().map(|ordered| ordered.key).collect()
}

/// The failure resolving non-payer keys of `txn`, panicking on success.
pub fn failure(txn: &Transaction) -> KeyOrderingFailure {
    let result = resolver().keys_for_other_parties(txn, &PrecheckResultFactory);
    match result.into_result() {
        Ok(keys) => panic!("expected a failure, got {} keys", keys.len()),
        Err(rejection) => rejection.failure.reason,
    }
}

/// Fixture keys for `labels`, in order.
pub fn expected(labels: &[&str]) -> Vec<KeyNode> {
    labels.iter().map(|label| fixture_key(label)).collect()
}

/// A WACL of fixture keys as it appears in a signing order.
pub fn wacl(labels: &[&str]) -> KeyNode {
    KeyNode::List(fixture_list(labels))
}
