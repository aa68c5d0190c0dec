//! Property tests for signing-order resolution over the scenario ledger.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::collections::HashSet;

use common::resolver;
use ledger_sigs_engine::{
    DefaultActivation, KeyScope, PrecheckResultFactory, RevocationCharacteristics, is_key_active,
};
use ledger_sigs_test_utils::{
    strategies::{arb_crypto_transfer, arb_key_node, arb_scenario_account, arb_scenario_body, arb_unknown_account},
    txn,
};
use ledger_sigs_types::{KeyList, KeyNode, KeyOrderingFailure, LeafKey, TransactionBody};
use proptest::prelude::*;

fn leaves(key: &KeyNode) -> Vec<LeafKey> {
    match key {
        KeyNode::Leaf(leaf) => vec![leaf.clone()],
        KeyNode::List(list) => list.iter().flat_map(leaves).collect(),
        KeyNode::Threshold(threshold) => threshold.keys().iter().flat_map(leaves).collect(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Resolving the same transaction twice against unchanged state yields
    /// the same outcome, including order.
    #[test]
    fn prop_resolution_is_deterministic(payer in arb_scenario_account(), body in arb_scenario_body()) {
        let resolver = resolver();
        let txn = txn(payer, body);
        let first = resolver.keys_for_other_parties(&txn, &PrecheckResultFactory);
        let second = resolver.keys_for_other_parties(&txn, &PrecheckResultFactory);
        prop_assert_eq!(first, second);
    }

    /// No key appears twice within one scope, up to decodability.
    #[test]
    fn prop_no_duplicates_within_scope(payer in arb_scenario_account(), body in arb_scenario_body()) {
        let txn = txn(payer, body);
        let result = resolver().keys_for_other_parties(&txn, &PrecheckResultFactory);
        let mut seen = HashSet::new();
        for ordered in result.ordered_keys() {
            prop_assert!(seen.insert((ordered.scope, ordered.key.canonical())), "duplicate {:?}", ordered.key);
        }
    }

    /// A failed resolution never carries keys.
    #[test]
    fn prop_failure_has_no_keys(payer in arb_scenario_account(), body in arb_scenario_body()) {
        let txn = txn(payer, body);
        let result = resolver().keys_for_other_parties(&txn, &PrecheckResultFactory);
        if result.has_error_report() {
            prop_assert!(result.ordered_keys().is_empty());
        }
    }

    /// Keys of a schedule's inner body follow every key of the schedule
    /// operation itself, and only schedule operations produce scheduled keys.
    #[test]
    fn prop_scheduled_keys_follow_outer_keys(payer in arb_scenario_account(), body in arb_scenario_body()) {
        let is_schedule_op = !body.is_schedulable();
        let txn = txn(payer, body);
        let result = resolver().keys_for_other_parties(&txn, &PrecheckResultFactory);
        let scopes: Vec<KeyScope> = result.ordered_keys().iter().map(|ordered| ordered.scope).collect();
        let mut sorted = scopes.clone();
        sorted.sort();
        prop_assert_eq!(&scopes, &sorted);
        if !is_schedule_op {
            prop_assert!(scopes.iter().all(|scope| *scope == KeyScope::OuterTransaction));
        }
    }

    /// Every debited account of a transfer signs, ahead of every receiver.
    #[test]
    fn prop_transfer_senders_all_sign(payer in arb_scenario_account(), body in arb_crypto_transfer()) {
        let snapshot = ledger_sigs_test_utils::scenario_snapshot();
        let txn = txn(payer, TransactionBody::from(body.clone()));
        let keys: Vec<KeyNode> =
            resolver().keys_for_other_parties(&txn, &PrecheckResultFactory).keys().cloned().collect();
        for adjust in body.transfers.iter().filter(|adjust| adjust.amount < 0) {
            let meta = ledger_sigs_state::SigMetadataLookup::account_signing_meta(&snapshot, adjust.account)
                .unwrap();
            prop_assert!(keys.contains(&meta.key));
        }
    }

    /// Known payers resolve to exactly their own key; unknown payers fail
    /// with the payer-specific reason.
    #[test]
    fn prop_payer_resolution(known in arb_scenario_account(), unknown in arb_unknown_account()) {
        let body = TransactionBody::from(ledger_sigs_types::transaction::CryptoTransfer::default());
        let resolver = resolver();

        let result = resolver.keys_for_payer(&txn(known, body.clone()), &PrecheckResultFactory);
        prop_assert_eq!(result.ordered_keys().len(), 1);

        let result = resolver.keys_for_payer(&txn(unknown, body), &PrecheckResultFactory);
        let rejection = result.error_report().unwrap();
        prop_assert_eq!(rejection.failure.reason, KeyOrderingFailure::InvalidPayerAccount);
    }

    /// Re-asserting a WACL needs a single active member; any other list of
    /// the same members plus one needs all of them.
    #[test]
    fn prop_revocation_relaxes_only_the_wacl(members in proptest::collection::vec(arb_key_node(), 2..5)) {
        let wacl = KeyList::new(members.clone()).unwrap();
        let characteristics = RevocationCharacteristics::for_top_level_file(wacl.clone());
        let first_signs: HashSet<LeafKey> = leaves(&members[0]).into_iter().collect();
        let has_sig = |leaf: &LeafKey| first_signs.contains(leaf);

        let same = KeyNode::List(wacl);
        prop_assert!(is_key_active(&same, &has_sig, &characteristics));

        let mut extended = members;
        extended.push(KeyNode::ed25519([0xEE; 32]));
        let other = KeyNode::list(extended).unwrap();
        prop_assert!(!is_key_active(&other, &has_sig, &characteristics));
        prop_assert!(!is_key_active(&other, &has_sig, &DefaultActivation));
    }
}
