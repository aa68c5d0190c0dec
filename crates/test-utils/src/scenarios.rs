//! A canonical ledger for signing-order tests.
//!
//! [`scenario_snapshot`] holds one entity per interesting signing situation:
//! receivers that do and do not require signatures, immutable files and
//! contracts, tokens with and without role keys, pending schedules with and
//! without admin keys. Every key is a [`fixture_key`] of the label in
//! [`labels`], so tests can name the key they expect without reading state.
//!
//! Well-known system numbers match `EntityNumbers::default()`.
//!
//! # Example
//!
//! ```
//! use ledger_sigs_test_utils::{fixture_key, labels, scenario_snapshot, MISC_ACCOUNT};
//!
//! let snapshot = scenario_snapshot();
//! assert!(snapshot.contains(MISC_ACCOUNT));
//! let _expected = fixture_key(labels::MISC_ACCOUNT);
//! ```

// Fixtures are expected to panic on malformed setup
#![allow(clippy::expect_used)]

use chrono::{DateTime, TimeZone, Utc};
use ledger_sigs_state::{
    AccountRecord, ContractRecord, FileRecord, LedgerState, ScheduleRecord, SnapshotBuilder,
    StateSnapshot, TokenRecord, TopicRecord,
};
use ledger_sigs_types::{
    AccountId, ContractId, FileId, KeyNode, LeafKey, ScheduleId, TokenId, TopicId, Transaction,
    TransactionBody, TransactionId,
    transaction::{AccountAmount, CryptoTransfer},
};

use crate::keys::{fixture_key, fixture_list};

/// Labels of every fixture key in the scenario ledger.
pub mod labels {
    pub const DEFAULT_PAYER: &str = "default-payer";
    pub const MISC_ACCOUNT: &str = "misc-account";
    pub const RECEIVER_SIG: &str = "receiver-sig";
    pub const NO_RECEIVER_SIG: &str = "no-receiver-sig";
    pub const DILIGENT_SIGNING_PAYER: &str = "diligent-signing-payer";
    pub const TOKEN_TREASURY: &str = "token-treasury";
    pub const DELETED_ACCOUNT: &str = "deleted-account";
    pub const FEE_COLLECTOR: &str = "fee-collector";
    pub const RECEIVER_SIG_FEE_COLLECTOR: &str = "receiver-sig-fee-collector";
    pub const SYS_ACCOUNT: &str = "sys-account";
    pub const TREASURY: &str = "treasury";
    pub const MASTER_PAYER: &str = "master-payer";
    pub const ADDRESS_BOOK_ADMIN: &str = "address-book-admin";
    pub const FEE_SCHEDULES_ADMIN: &str = "fee-schedules-admin";
    pub const EXCHANGE_RATES_ADMIN: &str = "exchange-rates-admin";
    pub const WAIVED_PAYER: &str = "waived-payer";

    pub const MISC_CONTRACT_ADMIN: &str = "misc-contract-admin";
    pub const RECEIVER_SIG_CONTRACT_ADMIN: &str = "receiver-sig-contract-admin";

    pub const MISC_FILE_WACL: [&str; 2] = ["misc-file-wacl-1", "misc-file-wacl-2"];
    pub const SYS_FILE_WACL: [&str; 1] = ["sys-file-wacl"];

    pub const TOPIC_ADMIN: &str = "topic-admin";
    pub const TOPIC_SUBMIT: &str = "topic-submit";

    pub const TOKEN_ADMIN: &str = "token-admin";
    pub const TOKEN_KYC: &str = "token-kyc";
    pub const TOKEN_FREEZE: &str = "token-freeze";
    pub const TOKEN_WIPE: &str = "token-wipe";
    pub const TOKEN_SUPPLY: &str = "token-supply";
    pub const TOKEN_FEE_SCHEDULE: &str = "token-fee-schedule";

    pub const SCHEDULE_ADMIN: &str = "schedule-admin";
}

// ============================================================================
// Accounts
// ============================================================================

pub const DEFAULT_PAYER: AccountId = AccountId::num_only(13257);
pub const MISC_ACCOUNT: AccountId = AccountId::num_only(1337);
/// Requires a signature to receive funds.
pub const RECEIVER_SIG: AccountId = AccountId::num_only(1338);
pub const NO_RECEIVER_SIG: AccountId = AccountId::num_only(1339);
/// Designated payer of [`KNOWN_SCHEDULE_WITH_ADMIN`].
pub const DILIGENT_SIGNING_PAYER: AccountId = AccountId::num_only(1340);
/// Treasury of every scenario token.
pub const TOKEN_TREASURY: AccountId = AccountId::num_only(1341);
/// Present in state but marked deleted.
pub const DELETED_ACCOUNT: AccountId = AccountId::num_only(1342);
pub const FEE_COLLECTOR: AccountId = AccountId::num_only(1343);
pub const RECEIVER_SIG_FEE_COLLECTOR: AccountId = AccountId::num_only(1344);
/// A system account that is not a superuser.
pub const SYS_ACCOUNT: AccountId = AccountId::num_only(666);
pub const TREASURY: AccountId = AccountId::num_only(2);
pub const MASTER_PAYER: AccountId = AccountId::num_only(50);
pub const ADDRESS_BOOK_ADMIN: AccountId = AccountId::num_only(55);
pub const FEE_SCHEDULES_ADMIN: AccountId = AccountId::num_only(56);
pub const EXCHANGE_RATES_ADMIN: AccountId = AccountId::num_only(57);
/// Listed as a waived payer in [`crate::test_signing_config`].
pub const WAIVED_PAYER: AccountId = AccountId::num_only(58);
pub const MISSING_ACCOUNT: AccountId = AccountId::num_only(404_040);

// ============================================================================
// Contracts
// ============================================================================

pub const MISC_CONTRACT: ContractId = ContractId::num_only(1400);
pub const RECEIVER_SIG_CONTRACT: ContractId = ContractId::num_only(1401);
pub const IMMUTABLE_CONTRACT: ContractId = ContractId::num_only(1402);
/// Admin key is the legacy contract-id form.
pub const DEPRECATED_KEY_CONTRACT: ContractId = ContractId::num_only(1403);
pub const DELETED_CONTRACT: ContractId = ContractId::num_only(1404);
pub const MISSING_CONTRACT: ContractId = ContractId::num_only(404_041);

// ============================================================================
// Files
// ============================================================================

pub const MISC_FILE: FileId = FileId::num_only(1500);
pub const IMMUTABLE_FILE: FileId = FileId::num_only(1501);
/// The fee schedules file.
pub const SYS_FILE: FileId = FileId::num_only(111);
pub const MISSING_FILE: FileId = FileId::num_only(404_042);

// ============================================================================
// Topics, tokens and schedules
// ============================================================================

pub const EXISTING_TOPIC: TopicId = TopicId::num_only(1600);
pub const MISSING_TOPIC: TopicId = TopicId::num_only(404_043);

pub const KNOWN_TOKEN_WITH_KEYS: TokenId = TokenId::num_only(1700);
pub const KNOWN_TOKEN_NO_SPECIAL_KEYS: TokenId = TokenId::num_only(1701);
pub const MISSING_TOKEN: TokenId = TokenId::num_only(404_044);

pub const KNOWN_SCHEDULE_IMMUTABLE: ScheduleId = ScheduleId::num_only(1800);
pub const KNOWN_SCHEDULE_WITH_ADMIN: ScheduleId = ScheduleId::num_only(1801);
/// Designated payer is [`DELETED_ACCOUNT`].
pub const KNOWN_SCHEDULE_WITH_NOW_INVALID_PAYER: ScheduleId = ScheduleId::num_only(1802);
pub const EXECUTED_SCHEDULE: ScheduleId = ScheduleId::num_only(1803);
pub const MISSING_SCHEDULE: ScheduleId = ScheduleId::num_only(404_045);

/// Valid start shared by every scenario transaction.
pub const VALID_START_SECS: i64 = 1_600_000_000;

// ============================================================================
// Builders
// ============================================================================

/// The transfer every scenario schedule wraps: [`MISC_ACCOUNT`] pays
/// [`RECEIVER_SIG`].
#[must_use]
pub fn scheduled_transfer() -> CryptoTransfer {
    CryptoTransfer::builder()
        .transfers(vec![
            AccountAmount::new(MISC_ACCOUNT, -1_000),
            AccountAmount::new(RECEIVER_SIG, 1_000),
        ])
        .build()
}

/// Builds the canonical scenario ledger.
///
/// # Panics
///
/// Panics if a fixture record fails to encode.
#[must_use]
pub fn scenario_snapshot() -> StateSnapshot {
    let mut builder = SnapshotBuilder::new();
    put_accounts(&mut builder);
    put_contracts(&mut builder);
    put_files(&mut builder);
    put_topics_and_tokens(&mut builder);
    put_schedules(&mut builder);
    builder.build()
}

/// Wraps [`scenario_snapshot`] in a publishable ledger state.
#[must_use]
pub fn scenario_state() -> LedgerState {
    LedgerState::new(scenario_snapshot())
}

/// The transaction id `payer` would use for a scenario transaction.
#[must_use]
pub fn txn_id(payer: AccountId) -> TransactionId {
    TransactionId::builder().payer(payer).valid_start(valid_start()).build()
}

/// Builds an outer transaction paid by `payer`.
#[must_use]
pub fn txn(payer: AccountId, body: impl Into<TransactionBody>) -> Transaction {
    Transaction::new(txn_id(payer), body)
}

/// Builds the inner transaction a schedule would execute on behalf of `payer`.
#[must_use]
pub fn scheduled_txn(payer: AccountId, body: impl Into<TransactionBody>) -> Transaction {
    Transaction::new(txn_id(payer).as_scheduled(payer), body)
}

fn valid_start() -> DateTime<Utc> {
    Utc.timestamp_opt(VALID_START_SECS, 0).single().expect("valid fixture timestamp")
}

fn account(label: &str) -> AccountRecord {
    AccountRecord::builder().key(fixture_key(label)).balance(10_000).build()
}

fn put_accounts(builder: &mut SnapshotBuilder) {
    let plain = [
        (DEFAULT_PAYER, labels::DEFAULT_PAYER),
        (MISC_ACCOUNT, labels::MISC_ACCOUNT),
        (NO_RECEIVER_SIG, labels::NO_RECEIVER_SIG),
        (DILIGENT_SIGNING_PAYER, labels::DILIGENT_SIGNING_PAYER),
        (TOKEN_TREASURY, labels::TOKEN_TREASURY),
        (FEE_COLLECTOR, labels::FEE_COLLECTOR),
        (SYS_ACCOUNT, labels::SYS_ACCOUNT),
        (TREASURY, labels::TREASURY),
        (MASTER_PAYER, labels::MASTER_PAYER),
        (ADDRESS_BOOK_ADMIN, labels::ADDRESS_BOOK_ADMIN),
        (FEE_SCHEDULES_ADMIN, labels::FEE_SCHEDULES_ADMIN),
        (EXCHANGE_RATES_ADMIN, labels::EXCHANGE_RATES_ADMIN),
        (WAIVED_PAYER, labels::WAIVED_PAYER),
    ];
    for (id, label) in plain {
        builder.put_account(id, &account(label)).expect("encode account");
    }

    for (id, label) in [
        (RECEIVER_SIG, labels::RECEIVER_SIG),
        (RECEIVER_SIG_FEE_COLLECTOR, labels::RECEIVER_SIG_FEE_COLLECTOR),
    ] {
        let record = AccountRecord { receiver_sig_required: true, ..account(label) };
        builder.put_account(id, &record).expect("encode account");
    }

    let deleted = AccountRecord { deleted: true, ..account(labels::DELETED_ACCOUNT) };
    builder.put_account(DELETED_ACCOUNT, &deleted).expect("encode account");
}

fn put_contracts(builder: &mut SnapshotBuilder) {
    let contracts = [
        (MISC_CONTRACT, ContractRecord::builder().admin_key(fixture_key(labels::MISC_CONTRACT_ADMIN)).build()),
        (
            RECEIVER_SIG_CONTRACT,
            ContractRecord::builder()
                .admin_key(fixture_key(labels::RECEIVER_SIG_CONTRACT_ADMIN))
                .receiver_sig_required(true)
                .build(),
        ),
        (IMMUTABLE_CONTRACT, ContractRecord::builder().build()),
        (
            DEPRECATED_KEY_CONTRACT,
            ContractRecord::builder()
                .admin_key(KeyNode::Leaf(LeafKey::contract_id(DEPRECATED_KEY_CONTRACT)))
                .build(),
        ),
        (
            DELETED_CONTRACT,
            ContractRecord::builder()
                .admin_key(fixture_key(labels::MISC_CONTRACT_ADMIN))
                .deleted(true)
                .build(),
        ),
    ];
    for (id, record) in &contracts {
        builder.put_contract(*id, record).expect("encode contract");
    }
}

fn put_files(builder: &mut SnapshotBuilder) {
    let files = [
        (MISC_FILE, FileRecord::builder().wacl(fixture_list(&labels::MISC_FILE_WACL)).build()),
        (IMMUTABLE_FILE, FileRecord::builder().contents(b"immutable".to_vec()).build()),
        (SYS_FILE, FileRecord::builder().wacl(fixture_list(&labels::SYS_FILE_WACL)).build()),
    ];
    for (id, record) in &files {
        builder.put_file(*id, record).expect("encode file");
    }
}

fn put_topics_and_tokens(builder: &mut SnapshotBuilder) {
    let topic = TopicRecord::builder()
        .admin_key(fixture_key(labels::TOPIC_ADMIN))
        .submit_key(fixture_key(labels::TOPIC_SUBMIT))
        .auto_renew_account(MISC_ACCOUNT)
        .build();
    builder.put_topic(EXISTING_TOPIC, &topic).expect("encode topic");

    let with_keys = TokenRecord::builder()
        .treasury(TOKEN_TREASURY)
        .symbol("KEYS".to_owned())
        .admin_key(fixture_key(labels::TOKEN_ADMIN))
        .kyc_key(fixture_key(labels::TOKEN_KYC))
        .freeze_key(fixture_key(labels::TOKEN_FREEZE))
        .wipe_key(fixture_key(labels::TOKEN_WIPE))
        .supply_key(fixture_key(labels::TOKEN_SUPPLY))
        .fee_schedule_key(fixture_key(labels::TOKEN_FEE_SCHEDULE))
        .build();
    builder.put_token(KNOWN_TOKEN_WITH_KEYS, &with_keys).expect("encode token");

    let bare = TokenRecord::builder().treasury(TOKEN_TREASURY).symbol("BARE".to_owned()).build();
    builder.put_token(KNOWN_TOKEN_NO_SPECIAL_KEYS, &bare).expect("encode token");
}

fn put_schedules(builder: &mut SnapshotBuilder) {
    let body = TransactionBody::from(scheduled_transfer());
    let schedules = [
        (
            KNOWN_SCHEDULE_IMMUTABLE,
            ScheduleRecord::builder()
                .scheduled_body(body.clone())
                .scheduled_by(DEFAULT_PAYER)
                .build(),
        ),
        (
            KNOWN_SCHEDULE_WITH_ADMIN,
            ScheduleRecord::builder()
                .scheduled_body(body.clone())
                .admin_key(fixture_key(labels::SCHEDULE_ADMIN))
                .designated_payer(DILIGENT_SIGNING_PAYER)
                .scheduled_by(DEFAULT_PAYER)
                .build(),
        ),
        (
            KNOWN_SCHEDULE_WITH_NOW_INVALID_PAYER,
            ScheduleRecord::builder()
                .scheduled_body(body.clone())
                .designated_payer(DELETED_ACCOUNT)
                .scheduled_by(DEFAULT_PAYER)
                .build(),
        ),
        (
            EXECUTED_SCHEDULE,
            ScheduleRecord::builder()
                .scheduled_body(body)
                .admin_key(fixture_key(labels::SCHEDULE_ADMIN))
                .scheduled_by(DEFAULT_PAYER)
                .executed(true)
                .build(),
        ),
    ];
    for (id, record) in &schedules {
        builder.put_schedule(*id, record).expect("encode schedule");
    }
}
