//! Transaction bodies as seen by signing-order resolution.
//!
//! Bodies arrive already deserialized from the transport layer. Only the
//! fields that influence which keys must sign are modelled; amounts, memos
//! and similar payload are carried so bodies round-trip, but are never
//! consulted for ordering.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    key::{KeyList, KeyNode},
    types::{AccountId, ContractId, FileId, ScheduleId, TokenId, TopicId, TransactionId},
};

/// A transaction submitted to the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Payer and valid-start identifier.
    pub id: TransactionId,
    /// The operation requested.
    pub body: TransactionBody,
}

impl Transaction {
    /// Creates a transaction from its id and body.
    pub fn new(id: TransactionId, body: impl Into<TransactionBody>) -> Self {
        Self { id, body: body.into() }
    }

    /// Returns the account paying for this transaction.
    #[inline]
    pub fn payer(&self) -> AccountId {
        self.id.payer
    }
}

// ============================================================================
// Transaction Body
// ============================================================================

/// Every operation kind the ledger accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionBody {
    // --- Crypto ---
    /// Creates an account.
    CryptoCreate(CryptoCreate),
    /// Moves hbar and tokens between accounts.
    CryptoTransfer(CryptoTransfer),
    /// Changes an account's key or properties.
    CryptoUpdate(CryptoUpdate),
    /// Deletes an account, sweeping its balance to another.
    CryptoDelete(CryptoDelete),

    // --- File ---
    /// Creates a file.
    FileCreate(FileCreate),
    /// Appends to a file.
    FileAppend(FileAppend),
    /// Replaces a file's contents, WACL or expiry.
    FileUpdate(FileUpdate),
    /// Deletes a file.
    FileDelete(FileDelete),

    // --- Contract ---
    /// Instantiates a contract.
    ContractCreate(ContractCreate),
    /// Changes contract properties.
    ContractUpdate(ContractUpdate),
    /// Deletes a contract, sweeping its balance to an obtainer.
    ContractDelete(ContractDelete),
    /// Calls a contract function.
    ContractCall(ContractCall),

    // --- Consensus ---
    /// Creates a topic.
    TopicCreate(TopicCreate),
    /// Changes topic properties.
    TopicUpdate(TopicUpdate),
    /// Deletes a topic.
    TopicDelete(TopicDelete),
    /// Submits a message to a topic.
    SubmitMessage(SubmitMessage),

    // --- Token ---
    /// Creates a token.
    TokenCreate(TokenCreate),
    /// Changes token properties.
    TokenUpdate(TokenUpdate),
    /// Deletes a token.
    TokenDelete(TokenDelete),
    /// Freezes an account's token relationship.
    TokenFreeze(TokenAccountOp),
    /// Unfreezes an account's token relationship.
    TokenUnfreeze(TokenAccountOp),
    /// Grants KYC to an account for a token.
    TokenGrantKyc(TokenAccountOp),
    /// Revokes KYC from an account for a token.
    TokenRevokeKyc(TokenAccountOp),
    /// Wipes tokens from an account.
    TokenWipe(TokenWipe),
    /// Mints new supply.
    TokenMint(TokenMint),
    /// Burns treasury supply.
    TokenBurn(TokenBurn),
    /// Associates tokens with an account.
    TokenAssociate(TokenAssociation),
    /// Dissociates tokens from an account.
    TokenDissociate(TokenAssociation),
    /// Replaces a token's custom fee schedule.
    TokenFeeScheduleUpdate(TokenFeeScheduleUpdate),

    // --- Schedule ---
    /// Creates a schedule wrapping a deferred transaction.
    ScheduleCreate(ScheduleCreate),
    /// Adds signatures to an existing schedule.
    ScheduleSign(ScheduleSign),
    /// Deletes a schedule.
    ScheduleDelete(ScheduleDelete),

    // --- System ---
    /// Administratively deletes a file or contract.
    SystemDelete(SystemDelete),
    /// Reverses a system delete.
    SystemUndelete(SystemUndelete),
    /// Schedules a network freeze.
    Freeze(Freeze),
}

impl TransactionBody {
    /// Name of the operation kind, for logging.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::CryptoCreate(_) => "CryptoCreate",
            Self::CryptoTransfer(_) => "CryptoTransfer",
            Self::CryptoUpdate(_) => "CryptoUpdate",
            Self::CryptoDelete(_) => "CryptoDelete",
            Self::FileCreate(_) => "FileCreate",
            Self::FileAppend(_) => "FileAppend",
            Self::FileUpdate(_) => "FileUpdate",
            Self::FileDelete(_) => "FileDelete",
            Self::ContractCreate(_) => "ContractCreate",
            Self::ContractUpdate(_) => "ContractUpdate",
            Self::ContractDelete(_) => "ContractDelete",
            Self::ContractCall(_) => "ContractCall",
            Self::TopicCreate(_) => "TopicCreate",
            Self::TopicUpdate(_) => "TopicUpdate",
            Self::TopicDelete(_) => "TopicDelete",
            Self::SubmitMessage(_) => "SubmitMessage",
            Self::TokenCreate(_) => "TokenCreate",
            Self::TokenUpdate(_) => "TokenUpdate",
            Self::TokenDelete(_) => "TokenDelete",
            Self::TokenFreeze(_) => "TokenFreeze",
            Self::TokenUnfreeze(_) => "TokenUnfreeze",
            Self::TokenGrantKyc(_) => "TokenGrantKyc",
            Self::TokenRevokeKyc(_) => "TokenRevokeKyc",
            Self::TokenWipe(_) => "TokenWipe",
            Self::TokenMint(_) => "TokenMint",
            Self::TokenBurn(_) => "TokenBurn",
            Self::TokenAssociate(_) => "TokenAssociate",
            Self::TokenDissociate(_) => "TokenDissociate",
            Self::TokenFeeScheduleUpdate(_) => "TokenFeeScheduleUpdate",
            Self::ScheduleCreate(_) => "ScheduleCreate",
            Self::ScheduleSign(_) => "ScheduleSign",
            Self::ScheduleDelete(_) => "ScheduleDelete",
            Self::SystemDelete(_) => "SystemDelete",
            Self::SystemUndelete(_) => "SystemUndelete",
            Self::Freeze(_) => "Freeze",
        }
    }

    /// Whether this body may be wrapped in a schedule.
    ///
    /// Schedule operations themselves cannot be scheduled.
    pub const fn is_schedulable(&self) -> bool {
        !matches!(self, Self::ScheduleCreate(_) | Self::ScheduleSign(_) | Self::ScheduleDelete(_))
    }
}

macro_rules! impl_body_from {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for TransactionBody {
                fn from(op: $ty) -> Self {
                    Self::$variant(op)
                }
            }
        )*
    };
}

impl_body_from!(
    CryptoCreate(CryptoCreate),
    CryptoTransfer(CryptoTransfer),
    CryptoUpdate(CryptoUpdate),
    CryptoDelete(CryptoDelete),
    FileCreate(FileCreate),
    FileAppend(FileAppend),
    FileUpdate(FileUpdate),
    FileDelete(FileDelete),
    ContractCreate(ContractCreate),
    ContractUpdate(ContractUpdate),
    ContractDelete(ContractDelete),
    ContractCall(ContractCall),
    TopicCreate(TopicCreate),
    TopicUpdate(TopicUpdate),
    TopicDelete(TopicDelete),
    SubmitMessage(SubmitMessage),
    TokenCreate(TokenCreate),
    TokenUpdate(TokenUpdate),
    TokenDelete(TokenDelete),
    TokenWipe(TokenWipe),
    TokenMint(TokenMint),
    TokenBurn(TokenBurn),
    TokenFeeScheduleUpdate(TokenFeeScheduleUpdate),
    ScheduleCreate(ScheduleCreate),
    ScheduleSign(ScheduleSign),
    ScheduleDelete(ScheduleDelete),
    SystemDelete(SystemDelete),
    SystemUndelete(SystemUndelete),
    Freeze(Freeze),
);

// ============================================================================
// Crypto
// ============================================================================

/// Body of a CryptoCreate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bon::Builder)]
pub struct CryptoCreate {
    /// Key of the new account.
    pub key: KeyNode,
    /// Whether the new account must sign transfers it receives.
    #[builder(default)]
    pub receiver_sig_required: bool,
    /// Initial balance in tinybars.
    #[builder(default)]
    pub initial_balance: u64,
}

/// A signed hbar or fungible token adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountAmount {
    /// Account being adjusted.
    pub account: AccountId,
    /// Negative for debits, positive for credits.
    pub amount: i64,
}

impl AccountAmount {
    /// Creates an adjustment.
    pub const fn new(account: AccountId, amount: i64) -> Self {
        Self { account, amount }
    }
}

/// Ownership change of one NFT serial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NftTransfer {
    /// Current owner.
    pub sender: AccountId,
    /// New owner.
    pub receiver: AccountId,
    /// Serial number.
    pub serial: u64,
}

/// Adjustments of a single token type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bon::Builder)]
pub struct TokenTransferList {
    /// Token being moved.
    pub token: TokenId,
    /// Fungible adjustments, in submission order.
    #[builder(default)]
    pub transfers: Vec<AccountAmount>,
    /// NFT ownership changes, in submission order.
    #[builder(default)]
    pub nft_transfers: Vec<NftTransfer>,
}

/// Body of a CryptoTransfer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, bon::Builder)]
pub struct CryptoTransfer {
    /// Hbar adjustments, in submission order.
    #[builder(default)]
    pub transfers: Vec<AccountAmount>,
    /// Token adjustments, grouped by token.
    #[builder(default)]
    pub token_transfers: Vec<TokenTransferList>,
}

/// Body of a CryptoUpdate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bon::Builder)]
pub struct CryptoUpdate {
    /// Account being updated.
    pub account: AccountId,
    /// Replacement key, if any.
    pub key: Option<KeyNode>,
    /// New receiver-signature requirement, if changing.
    pub receiver_sig_required: Option<bool>,
    /// New expiry, if extending.
    pub expiration: Option<DateTime<Utc>>,
    /// New memo, if changing.
    pub memo: Option<String>,
}

/// Body of a CryptoDelete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CryptoDelete {
    /// Account being deleted.
    pub account: AccountId,
    /// Account receiving the remaining balance.
    pub transfer_account: AccountId,
}

// ============================================================================
// File
// ============================================================================

/// Body of a FileCreate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bon::Builder)]
pub struct FileCreate {
    /// WACL of the new file; `None` creates an immutable file.
    pub keys: Option<KeyList>,
    /// Initial contents.
    #[builder(default)]
    pub contents: Vec<u8>,
    /// Expiry of the new file.
    pub expiration: Option<DateTime<Utc>>,
}

/// Body of a FileAppend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAppend {
    /// File being appended to.
    pub file: FileId,
    /// Bytes to append.
    pub contents: Vec<u8>,
}

/// Body of a FileUpdate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bon::Builder)]
pub struct FileUpdate {
    /// File being updated.
    pub file: FileId,
    /// Replacement WACL, if any.
    pub keys: Option<KeyList>,
    /// Replacement contents, if any.
    pub contents: Option<Vec<u8>>,
    /// New expiry, if extending.
    pub expiration: Option<DateTime<Utc>>,
}

/// Body of a FileDelete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDelete {
    /// File being deleted.
    pub file: FileId,
}

// ============================================================================
// Contract
// ============================================================================

/// Body of a ContractCreate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bon::Builder)]
pub struct ContractCreate {
    /// Admin key of the new contract; absent makes it immutable.
    pub admin_key: Option<KeyNode>,
    /// File holding the initcode.
    pub bytecode_file: Option<FileId>,
    /// Gas offered for the constructor.
    #[builder(default)]
    pub gas: u64,
    /// Initial balance in tinybars.
    #[builder(default)]
    pub initial_balance: u64,
    /// Memo.
    #[builder(default)]
    pub memo: String,
}

/// Body of a ContractUpdate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bon::Builder)]
pub struct ContractUpdate {
    /// Contract being updated.
    pub contract: ContractId,
    /// Replacement admin key, if any.
    pub admin_key: Option<KeyNode>,
    /// New expiry, if extending.
    pub expiration: Option<DateTime<Utc>>,
    /// New auto-renew period in seconds.
    pub auto_renew_period: Option<u64>,
    /// New proxy account.
    pub proxy_account: Option<AccountId>,
    /// New bytecode file.
    pub file: Option<FileId>,
    /// New memo.
    pub memo: Option<String>,
}

impl ContractUpdate {
    /// Whether this update changes anything beyond the expiry and a
    /// deprecated contract-id admin key.
    ///
    /// An update that only extends expiry can be submitted by anyone.
    pub fn needs_current_admin_sig(&self) -> bool {
        let replaces_admin_key =
            self.admin_key.as_ref().is_some_and(|key| !key.is_deprecated_contract_key());
        self.expiration.is_none()
            || replaces_admin_key
            || self.proxy_account.is_some()
            || self.auto_renew_period.is_some()
            || self.file.is_some()
            || self.memo.as_ref().is_some_and(|memo| !memo.is_empty())
    }
}

/// Where a deleted contract's balance goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Obtainer {
    /// An account receives the balance.
    Account(AccountId),
    /// Another contract receives the balance.
    Contract(ContractId),
}

/// Body of a ContractDelete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractDelete {
    /// Contract being deleted.
    pub contract: ContractId,
    /// Recipient of the remaining balance.
    pub obtainer: Option<Obtainer>,
}

/// Body of a ContractCall.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractCall {
    /// Contract being called.
    pub contract: ContractId,
    /// Gas offered.
    pub gas: u64,
    /// Tinybars sent with the call.
    pub amount: u64,
    /// ABI-encoded call data.
    pub function_parameters: Vec<u8>,
}

// ============================================================================
// Consensus
// ============================================================================

/// Body of a TopicCreate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bon::Builder)]
pub struct TopicCreate {
    /// Admin key; absent makes the topic immutable.
    pub admin_key: Option<KeyNode>,
    /// Key gating message submission; absent allows anyone.
    pub submit_key: Option<KeyNode>,
    /// Account charged for auto-renewal.
    pub auto_renew_account: Option<AccountId>,
    /// Auto-renew period in seconds.
    #[builder(default = 7_776_000)]
    pub auto_renew_period: u64,
    /// Memo.
    #[builder(default)]
    pub memo: String,
}

/// Body of a TopicUpdate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bon::Builder)]
pub struct TopicUpdate {
    /// Topic being updated.
    pub topic: TopicId,
    /// Replacement admin key.
    pub admin_key: Option<KeyNode>,
    /// Replacement submit key.
    pub submit_key: Option<KeyNode>,
    /// New memo.
    pub memo: Option<String>,
    /// New expiry.
    pub expiration: Option<DateTime<Utc>>,
    /// New auto-renew period in seconds.
    pub auto_renew_period: Option<u64>,
    /// New auto-renew account; [`AccountId::SENTINEL`] clears it.
    pub auto_renew_account: Option<AccountId>,
}

impl TopicUpdate {
    /// Whether the update only extends the expiry.
    pub fn is_expiry_only(&self) -> bool {
        self.expiration.is_some()
            && self.admin_key.is_none()
            && self.submit_key.is_none()
            && self.memo.is_none()
            && self.auto_renew_period.is_none()
            && self.auto_renew_account.is_none()
    }
}

/// Body of a TopicDelete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicDelete {
    /// Topic being deleted.
    pub topic: TopicId,
}

/// Body of a SubmitMessage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitMessage {
    /// Destination topic.
    pub topic: TopicId,
    /// Message payload.
    pub message: Vec<u8>,
}

// ============================================================================
// Token
// ============================================================================

/// A fixed fee, in hbar or in units of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedFee {
    /// Amount charged.
    pub amount: u64,
    /// Denominating token; `None` for hbar, [`TokenId::SENTINEL`] for the
    /// token being created.
    pub denominating_token: Option<TokenId>,
}

/// A fee charged as a fraction of each transferred amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FractionalFee {
    /// Fraction numerator.
    pub numerator: u64,
    /// Fraction denominator.
    pub denominator: u64,
    /// Minimum charged.
    pub minimum: u64,
    /// Maximum charged; zero for unbounded.
    pub maximum: u64,
    /// Whether the sender pays on top of the transferred amount.
    pub net_of_transfers: bool,
}

/// A fee charged on NFT ownership changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoyaltyFee {
    /// Fraction numerator.
    pub numerator: u64,
    /// Fraction denominator.
    pub denominator: u64,
    /// Fee charged when no fungible value is exchanged.
    pub fallback: Option<FixedFee>,
}

/// Kind of a custom fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CustomFeeKind {
    /// A fixed fee.
    Fixed(FixedFee),
    /// A fractional fee.
    Fractional(FractionalFee),
    /// A royalty fee.
    Royalty(RoyaltyFee),
}

/// A custom fee and the account that collects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomFee {
    /// Collecting account.
    pub collector: AccountId,
    /// What is charged.
    pub kind: CustomFeeKind,
}

impl CustomFee {
    /// Creates a fixed fee.
    pub const fn fixed(collector: AccountId, amount: u64, denominating_token: Option<TokenId>) -> Self {
        Self { collector, kind: CustomFeeKind::Fixed(FixedFee { amount, denominating_token }) }
    }

    /// Creates a fractional fee with no bounds.
    pub const fn fractional(collector: AccountId, numerator: u64, denominator: u64) -> Self {
        Self {
            collector,
            kind: CustomFeeKind::Fractional(FractionalFee {
                numerator,
                denominator,
                minimum: 0,
                maximum: 0,
                net_of_transfers: false,
            }),
        }
    }

    /// Creates a royalty fee.
    pub const fn royalty(
        collector: AccountId,
        numerator: u64,
        denominator: u64,
        fallback: Option<FixedFee>,
    ) -> Self {
        Self {
            collector,
            kind: CustomFeeKind::Royalty(RoyaltyFee { numerator, denominator, fallback }),
        }
    }
}

/// Body of a TokenCreate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bon::Builder)]
pub struct TokenCreate {
    /// Token name.
    #[builder(default)]
    pub name: String,
    /// Token symbol.
    #[builder(default)]
    pub symbol: String,
    /// Account holding the initial supply.
    pub treasury: AccountId,
    /// Account charged for auto-renewal.
    pub auto_renew_account: Option<AccountId>,
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
    /// Custom fees, in declaration order.
    #[builder(default)]
    pub custom_fees: Vec<CustomFee>,
    /// Whether new relationships start frozen.
    #[builder(default)]
    pub freeze_default: bool,
}

/// Body of a TokenUpdate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bon::Builder)]
pub struct TokenUpdate {
    /// Token being updated.
    pub token: TokenId,
    /// Replacement treasury.
    pub treasury: Option<AccountId>,
    /// Replacement auto-renew account.
    pub auto_renew_account: Option<AccountId>,
    /// Replacement admin key.
    pub admin_key: Option<KeyNode>,
    /// Replacement KYC key.
    pub kyc_key: Option<KeyNode>,
    /// Replacement freeze key.
    pub freeze_key: Option<KeyNode>,
    /// Replacement wipe key.
    pub wipe_key: Option<KeyNode>,
    /// Replacement supply key.
    pub supply_key: Option<KeyNode>,
    /// New name.
    pub name: Option<String>,
    /// New symbol.
    pub symbol: Option<String>,
    /// New expiry.
    pub expiration: Option<DateTime<Utc>>,
}

/// Body of a TokenDelete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenDelete {
    /// Token being deleted.
    pub token: TokenId,
}

/// Body shared by freeze, unfreeze, grant-KYC and revoke-KYC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAccountOp {
    /// Token whose relationship changes.
    pub token: TokenId,
    /// Account whose relationship changes.
    pub account: AccountId,
}

/// Body of a TokenWipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenWipe {
    /// Token being wiped.
    pub token: TokenId,
    /// Account losing the units.
    pub account: AccountId,
    /// Fungible units to wipe.
    pub amount: u64,
    /// NFT serials to wipe.
    pub serials: Vec<u64>,
}

/// Body of a TokenMint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMint {
    /// Token being minted.
    pub token: TokenId,
    /// Fungible units to mint.
    pub amount: u64,
    /// Metadata of each NFT to mint.
    pub metadata: Vec<Vec<u8>>,
}

/// Body of a TokenBurn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenBurn {
    /// Token being burned.
    pub token: TokenId,
    /// Fungible units to burn.
    pub amount: u64,
    /// NFT serials to burn.
    pub serials: Vec<u64>,
}

/// Body shared by associate and dissociate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAssociation {
    /// Account whose relationships change.
    pub account: AccountId,
    /// Tokens to (dis)associate.
    pub tokens: Vec<TokenId>,
}

/// Body of a TokenFeeScheduleUpdate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenFeeScheduleUpdate {
    /// Token whose fees change.
    pub token: TokenId,
    /// Replacement fee schedule.
    pub custom_fees: Vec<CustomFee>,
}

// ============================================================================
// Schedule
// ============================================================================

/// Body of a ScheduleCreate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bon::Builder)]
pub struct ScheduleCreate {
    /// The deferred transaction.
    #[builder(into)]
    pub scheduled: Box<TransactionBody>,
    /// Admin key allowed to delete the schedule.
    pub admin_key: Option<KeyNode>,
    /// Account paying for the deferred transaction; defaults to the
    /// scheduling payer.
    pub payer: Option<AccountId>,
    /// Memo.
    #[builder(default)]
    pub memo: String,
}

/// Body of a ScheduleSign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSign {
    /// Schedule being signed.
    pub schedule: ScheduleId,
}

/// Body of a ScheduleDelete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleDelete {
    /// Schedule being deleted.
    pub schedule: ScheduleId,
}

// ============================================================================
// System
// ============================================================================

/// Target of a system delete or undelete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SystemTarget {
    /// A file.
    File(FileId),
    /// A contract.
    Contract(ContractId),
}

/// Body of a SystemDelete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemDelete {
    /// Entity being deleted.
    pub target: SystemTarget,
    /// When the entity is purged.
    pub expiration: Option<DateTime<Utc>>,
}

/// Body of a SystemUndelete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemUndelete {
    /// Entity being restored.
    pub target: SystemTarget,
}

/// Body of a Freeze.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Freeze {
    /// When the freeze begins.
    pub start: Option<DateTime<Utc>>,
    /// File with the upgrade to apply during the freeze.
    pub update_file: Option<FileId>,
}
