//! Stored entity records.
//!
//! Records are what the ledger persists per entity. Each one projects onto
//! the much smaller signing metadata consulted by the resolver; fields the
//! resolver never reads are carried so records survive a round trip.

use ledger_sigs_types::{AccountId, KeyList, KeyNode, TransactionBody};
use serde::{Deserialize, Serialize};

use crate::metadata::{
    AccountSigningMetadata, ContractSigningMetadata, FileSigningMetadata,
    ScheduleSigningMetadata, TokenSigningMetadata, TopicSigningMetadata,
};

/// A crypto account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bon::Builder)]
pub struct AccountRecord {
    /// Account key.
    pub key: KeyNode,
    /// Whether incoming transfers need the account's signature.
    #[builder(default)]
    pub receiver_sig_required: bool,
    /// Balance in tinybars.
    #[builder(default)]
    pub balance: u64,
    /// Whether the account has been deleted.
    #[builder(default)]
    pub deleted: bool,
}

impl AccountRecord {
    /// Projects the fields that influence signing order.
    pub fn signing_meta(&self) -> AccountSigningMetadata {
        AccountSigningMetadata {
            key: self.key.clone(),
            receiver_sig_required: self.receiver_sig_required,
        }
    }
}

/// A smart contract instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bon::Builder)]
pub struct ContractRecord {
    /// Admin key; may be the legacy contract-id marker.
    pub admin_key: Option<KeyNode>,
    /// Whether incoming transfers need the contract's signature.
    #[builder(default)]
    pub receiver_sig_required: bool,
    /// Whether the contract has been deleted.
    #[builder(default)]
    pub deleted: bool,
}

impl ContractRecord {
    /// Projects the fields that influence signing order.
    pub fn signing_meta(&self) -> ContractSigningMetadata {
        ContractSigningMetadata {
            key: self.admin_key.clone(),
            receiver_sig_required: self.receiver_sig_required,
        }
    }
}

/// A file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bon::Builder)]
pub struct FileRecord {
    /// Write access control list; absent for immutable files.
    pub wacl: Option<KeyList>,
    /// File contents.
    #[builder(default)]
    pub contents: Vec<u8>,
    /// Whether the file has been deleted.
    #[builder(default)]
    pub deleted: bool,
}

impl FileRecord {
    /// Projects the fields that influence signing order.
    pub fn signing_meta(&self) -> FileSigningMetadata {
        FileSigningMetadata { wacl: self.wacl.clone() }
    }
}

/// A consensus topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bon::Builder)]
pub struct TopicRecord {
    /// Admin key.
    pub admin_key: Option<KeyNode>,
    /// Submit key.
    pub submit_key: Option<KeyNode>,
    /// Account charged for auto-renewal.
    pub auto_renew_account: Option<AccountId>,
    /// Whether the topic has been deleted.
    #[builder(default)]
    pub deleted: bool,
}

impl TopicRecord {
    /// Projects the fields that influence signing order.
    pub fn signing_meta(&self) -> TopicSigningMetadata {
        TopicSigningMetadata {
            admin_key: self.admin_key.clone(),
            submit_key: self.submit_key.clone(),
        }
    }
}

/// A token type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bon::Builder)]
pub struct TokenRecord {
    /// Treasury account.
    pub treasury: AccountId,
    /// Symbol.
    #[builder(default)]
    pub symbol: String,
    /// Admin key.
    pub admin_key: Option<KeyNode>,
    /// KYC key.
    pub kyc_key: Option<KeyNode>,
    /// Freeze key.
    pub freeze_key: Option<KeyNode>,
    /// Wipe key.
    pub wipe_key: Option<KeyNode>,
    /// Supply key.
    pub supply_key: Option<KeyNode>,
    /// Fee-schedule key.
    pub fee_schedule_key: Option<KeyNode>,
    /// Whether the token has been deleted.
    #[builder(default)]
    pub deleted: bool,
}

impl TokenRecord {
    /// Projects the fields that influence signing order.
    pub fn signing_meta(&self) -> TokenSigningMetadata {
        TokenSigningMetadata {
            treasury: self.treasury,
            admin_key: self.admin_key.clone(),
            kyc_key: self.kyc_key.clone(),
            freeze_key: self.freeze_key.clone(),
            wipe_key: self.wipe_key.clone(),
            supply_key: self.supply_key.clone(),
            fee_schedule_key: self.fee_schedule_key.clone(),
        }
    }
}

/// A schedule wrapping a deferred transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bon::Builder)]
pub struct ScheduleRecord {
    /// The deferred transaction body.
    #[builder(into)]
    pub scheduled_body: TransactionBody,
    /// Admin key.
    pub admin_key: Option<KeyNode>,
    /// Explicitly designated payer of the deferred transaction.
    pub designated_payer: Option<AccountId>,
    /// Account that created the schedule.
    pub scheduled_by: AccountId,
    /// Whether the schedule has been deleted.
    #[builder(default)]
    pub deleted: bool,
    /// Whether the deferred transaction has already run.
    #[builder(default)]
    pub executed: bool,
}

impl ScheduleRecord {
    /// Projects the fields that influence signing order.
    pub fn signing_meta(&self) -> ScheduleSigningMetadata {
        ScheduleSigningMetadata {
            admin_key: self.admin_key.clone(),
            designated_payer: self.designated_payer,
            scheduled_body: self.scheduled_body.clone(),
        }
    }

    /// Whether the schedule can still collect signatures.
    pub fn is_pending(&self) -> bool {
        !self.deleted && !self.executed
    }
}
