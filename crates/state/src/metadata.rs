//! Minimal per-entity projections consulted by signing-order resolution.

use ledger_sigs_types::{AccountId, KeyList, KeyNode, TransactionBody};

/// What the resolver needs to know about an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSigningMetadata {
    /// The account's key.
    pub key: KeyNode,
    /// Whether the account must sign transfers it receives.
    pub receiver_sig_required: bool,
}

/// What the resolver needs to know about a contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractSigningMetadata {
    /// The contract's admin key, if any.
    pub key: Option<KeyNode>,
    /// Whether the contract must sign transfers it receives.
    pub receiver_sig_required: bool,
}

impl ContractSigningMetadata {
    /// Whether the contract lacks a usable admin key.
    ///
    /// A legacy contract-id key cannot sign, so it counts as absent.
    pub fn is_immutable(&self) -> bool {
        self.admin_key().is_none()
    }

    /// The admin key, if present and not the legacy contract-id marker.
    pub fn admin_key(&self) -> Option<&KeyNode> {
        self.key.as_ref().filter(|key| !key.is_deprecated_contract_key())
    }
}

/// What the resolver needs to know about a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSigningMetadata {
    /// The file's WACL; `None` for an immutable file.
    pub wacl: Option<KeyList>,
}

impl FileSigningMetadata {
    /// Whether the file has no WACL.
    pub fn is_immutable(&self) -> bool {
        self.wacl.is_none()
    }
}

/// What the resolver needs to know about a topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicSigningMetadata {
    /// Admin key, if any.
    pub admin_key: Option<KeyNode>,
    /// Submit key, if any.
    pub submit_key: Option<KeyNode>,
}

/// What the resolver needs to know about a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSigningMetadata {
    /// Current treasury.
    pub treasury: AccountId,
    /// Admin key, if any.
    pub admin_key: Option<KeyNode>,
    /// KYC key, if any.
    pub kyc_key: Option<KeyNode>,
    /// Freeze key, if any.
    pub freeze_key: Option<KeyNode>,
    /// Wipe key, if any.
    pub wipe_key: Option<KeyNode>,
    /// Supply key, if any.
    pub supply_key: Option<KeyNode>,
    /// Fee-schedule key, if any.
    pub fee_schedule_key: Option<KeyNode>,
}

/// What the resolver needs to know about a schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleSigningMetadata {
    /// Admin key, if any.
    pub admin_key: Option<KeyNode>,
    /// Explicitly designated payer of the scheduled transaction, if any.
    pub designated_payer: Option<AccountId>,
    /// The deferred transaction.
    pub scheduled_body: TransactionBody,
}
