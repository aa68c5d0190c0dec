//! Proptest strategies for signing-order property tests.
//!
//! Key strategies produce well-formed trees only: lists are never empty and
//! thresholds are always satisfiable. Body strategies reference scenario
//! entities, so every generated transaction resolves against
//! [`crate::scenario_snapshot`].
//!
//! # Usage
//!
//! ```no_run
//! use ledger_sigs_test_utils::strategies::arb_key_node;
//! use proptest::prelude::*;
//!
//! proptest! {
//!     #[test]
//!     fn canonical_is_idempotent(key in arb_key_node()) {
//!         prop_assert_eq!(key.canonical().canonical(), key.canonical());
//!     }
//! }
//! ```

use ledger_sigs_types::{
    AccountId, KeyAlgorithm, KeyNode, LeafKey, TransactionBody,
    transaction::{
        AccountAmount, CryptoTransfer, CryptoUpdate, FileAppend, FileDelete, NftTransfer,
        ScheduleCreate, ScheduleDelete, ScheduleSign, SubmitMessage, TokenAccountOp,
        TokenTransferList, TopicDelete,
    },
};
use proptest::prelude::*;

use crate::scenarios::{
    DEFAULT_PAYER, DILIGENT_SIGNING_PAYER, EXISTING_TOPIC, FEE_COLLECTOR, KNOWN_SCHEDULE_IMMUTABLE,
    KNOWN_SCHEDULE_WITH_ADMIN, KNOWN_TOKEN_NO_SPECIAL_KEYS, KNOWN_TOKEN_WITH_KEYS, MISC_ACCOUNT,
    MISC_FILE, NO_RECEIVER_SIG, RECEIVER_SIG, RECEIVER_SIG_FEE_COLLECTOR, TOKEN_TREASURY,
};

/// Accounts that exist in the scenario ledger and may appear in transfers.
pub const TRANSFER_ACCOUNTS: [AccountId; 8] = [
    DEFAULT_PAYER,
    MISC_ACCOUNT,
    RECEIVER_SIG,
    NO_RECEIVER_SIG,
    DILIGENT_SIGNING_PAYER,
    TOKEN_TREASURY,
    FEE_COLLECTOR,
    RECEIVER_SIG_FEE_COLLECTOR,
];

// ============================================================================
// Keys
// ============================================================================

/// Generates an ed25519 leaf with uniform random bytes.
pub fn arb_ed25519_leaf() -> impl Strategy<Value = LeafKey> {
    proptest::array::uniform32(any::<u8>()).prop_map(LeafKey::ed25519)
}

/// Generates a leaf of any signing algorithm.
///
/// ECDSA leaves are 33-byte compressed points; the leading byte is always
/// `0x02` or `0x03`.
pub fn arb_leaf() -> impl Strategy<Value = LeafKey> {
    prop_oneof![
        3 => arb_ed25519_leaf(),
        1 => (prop::bool::ANY, proptest::array::uniform32(any::<u8>())).prop_filter_map(
            "valid secp256k1 point encoding",
            |(odd, tail)| {
                let mut bytes = Vec::with_capacity(33);
                bytes.push(if odd { 0x03 } else { 0x02 });
                bytes.extend_from_slice(&tail);
                LeafKey::new(KeyAlgorithm::EcdsaSecp256k1, bytes).ok()
            }
        ),
    ]
}

/// Generates a key tree of depth at most 4 with at most 24 leaves.
pub fn arb_key_node() -> impl Strategy<Value = KeyNode> {
    arb_leaf().prop_map(KeyNode::Leaf).prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 1..4)
                .prop_filter_map("non-empty list", |keys| KeyNode::list(keys).ok()),
            proptest::collection::vec(inner, 1..4)
                .prop_flat_map(|keys| {
                    let len = u32::try_from(keys.len()).unwrap_or(1);
                    (1..=len, Just(keys))
                })
                .prop_filter_map("satisfiable threshold", |(threshold, keys)| {
                    KeyNode::threshold(threshold, keys).ok()
                }),
        ]
    })
}

// ============================================================================
// Ids
// ============================================================================

/// Picks one of [`TRANSFER_ACCOUNTS`].
pub fn arb_scenario_account() -> impl Strategy<Value = AccountId> + Clone {
    prop::sample::select(TRANSFER_ACCOUNTS.to_vec())
}

/// Generates an account id outside every reserved and scenario range.
pub fn arb_unknown_account() -> impl Strategy<Value = AccountId> {
    (5_000_000u64..6_000_000).prop_map(AccountId::num_only)
}

// ============================================================================
// Bodies
// ============================================================================

/// Generates a non-zero hbar amount.
fn arb_amount() -> impl Strategy<Value = i64> + Clone {
    prop_oneof![-1_000_000i64..0, 1i64..1_000_000]
}

/// Generates a transfer among scenario accounts with hbar, fungible token
/// and NFT adjustments.
pub fn arb_crypto_transfer() -> impl Strategy<Value = CryptoTransfer> {
    let adjustment = (arb_scenario_account(), arb_amount())
        .prop_map(|(account, amount)| AccountAmount::new(account, amount));
    let nft = (arb_scenario_account(), arb_scenario_account(), 1u64..1_000)
        .prop_map(|(sender, receiver, serial)| NftTransfer { sender, receiver, serial });
    let token_list = (
        prop::sample::select(vec![KNOWN_TOKEN_WITH_KEYS, KNOWN_TOKEN_NO_SPECIAL_KEYS]),
        proptest::collection::vec(adjustment.clone(), 0..4),
        proptest::collection::vec(nft, 0..3),
    )
        .prop_map(|(token, transfers, nft_transfers)| {
            TokenTransferList::builder()
                .token(token)
                .transfers(transfers)
                .nft_transfers(nft_transfers)
                .build()
        });
    (proptest::collection::vec(adjustment, 0..6), proptest::collection::vec(token_list, 0..3))
        .prop_map(|(transfers, token_transfers)| {
            CryptoTransfer::builder().transfers(transfers).token_transfers(token_transfers).build()
        })
}

/// Generates a body that can be scheduled and resolves against the scenario
/// ledger.
pub fn arb_schedulable_body() -> impl Strategy<Value = TransactionBody> {
    prop_oneof![
        arb_crypto_transfer().prop_map(TransactionBody::from),
        (arb_scenario_account(), proptest::option::of(arb_key_node())).prop_map(
            |(account, key)| {
                TransactionBody::from(CryptoUpdate::builder().account(account).maybe_key(key).build())
            }
        ),
        prop::collection::vec(any::<u8>(), 0..16)
            .prop_map(|contents| TransactionBody::FileAppend(FileAppend { file: MISC_FILE, contents })),
        Just(TransactionBody::FileDelete(FileDelete { file: MISC_FILE })),
        Just(TransactionBody::TopicDelete(TopicDelete { topic: EXISTING_TOPIC })),
        prop::collection::vec(any::<u8>(), 0..16).prop_map(|message| {
            TransactionBody::SubmitMessage(SubmitMessage { topic: EXISTING_TOPIC, message })
        }),
        arb_scenario_account().prop_map(|account| {
            TransactionBody::TokenFreeze(TokenAccountOp { token: KNOWN_TOKEN_WITH_KEYS, account })
        }),
    ]
}

/// Generates any body referencing scenario entities, including schedule
/// operations that wrap a schedulable body.
pub fn arb_scenario_body() -> impl Strategy<Value = TransactionBody> {
    prop_oneof![
        4 => arb_schedulable_body(),
        1 => (arb_schedulable_body(), proptest::option::of(arb_key_node())).prop_map(
            |(inner, admin_key)| {
                TransactionBody::from(
                    ScheduleCreate::builder().scheduled(inner).maybe_admin_key(admin_key).build(),
                )
            }
        ),
        1 => prop::sample::select(vec![KNOWN_SCHEDULE_IMMUTABLE, KNOWN_SCHEDULE_WITH_ADMIN])
            .prop_map(|schedule| TransactionBody::ScheduleSign(ScheduleSign { schedule })),
        1 => Just(TransactionBody::ScheduleDelete(ScheduleDelete {
            schedule: KNOWN_SCHEDULE_WITH_ADMIN,
        })),
    ]
}
