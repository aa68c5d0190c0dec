//! Turning resolution outcomes into caller-specific reports.
//!
//! The resolver is shared by the pre-consensus submission gate and the
//! consensus-time handler. Each wants failures in its own vocabulary, so it
//! supplies a [`SigningOrderResultFactory`] and gets back a
//! [`SigningOrderResult`] carrying its chosen report type.

use std::fmt;

use ledger_sigs_types::{EntityRef, KeyOrderingFailure, TransactionId};
use serde::{Deserialize, Serialize};

use crate::order::{OrderedKey, SigningOrderResult};

/// Everything known about a failed resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderingFailure {
    /// Classification of the failure.
    pub reason: KeyOrderingFailure,
    /// The entity that caused it, when one is known.
    pub entity: Option<EntityRef>,
    /// The transaction being resolved.
    pub txn_id: TransactionId,
}

impl fmt::Display for OrderingFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} for transaction {}", self.reason, self.txn_id)?;
        if let Some(entity) = &self.entity {
            write!(f, " ({entity})")?;
        }
        Ok(())
    }
}

/// Builds [`SigningOrderResult`]s with a caller-chosen failure report.
pub trait SigningOrderResultFactory {
    /// The caller's failure report.
    type Report;

    /// Builds the report for a failure.
    fn report(&self, failure: OrderingFailure) -> Self::Report;

    /// Wraps a successfully resolved order.
    fn for_valid_order(&self, keys: Vec<OrderedKey>) -> SigningOrderResult<Self::Report> {
        SigningOrderResult::Ordered(keys)
    }

    /// Wraps a failure.
    fn for_failure(&self, failure: OrderingFailure) -> SigningOrderResult<Self::Report> {
        SigningOrderResult::Failed(self.report(failure))
    }
}

// ============================================================================
// Response Codes
// ============================================================================

/// Status returned to clients for a rejected transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResponseCode {
    /// The payer account does not exist.
    PayerAccountNotFound,
    /// A referenced account does not exist.
    InvalidAccountId,
    /// A referenced file does not exist.
    InvalidFileId,
    /// A referenced contract does not exist.
    InvalidContractId,
    /// The contract has no admin key.
    ModifyingImmutableContract,
    /// A referenced topic does not exist.
    InvalidTopicId,
    /// An auto-renew account does not exist.
    InvalidAutorenewAccount,
    /// A referenced token does not exist.
    InvalidTokenId,
    /// A custom fee collector does not exist.
    InvalidCustomFeeCollector,
    /// A referenced schedule does not exist.
    InvalidScheduleId,
    /// The keys of a scheduled transaction could not be resolved.
    UnresolvableRequiredSigners,
    /// The wrapped transaction kind cannot be scheduled.
    ScheduledTransactionNotInWhitelist,
    /// The node failed to read its own state.
    Unknown,
}

impl ResponseCode {
    /// Stable upper-case name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PayerAccountNotFound => "PAYER_ACCOUNT_NOT_FOUND",
            Self::InvalidAccountId => "INVALID_ACCOUNT_ID",
            Self::InvalidFileId => "INVALID_FILE_ID",
            Self::InvalidContractId => "INVALID_CONTRACT_ID",
            Self::ModifyingImmutableContract => "MODIFYING_IMMUTABLE_CONTRACT",
            Self::InvalidTopicId => "INVALID_TOPIC_ID",
            Self::InvalidAutorenewAccount => "INVALID_AUTORENEW_ACCOUNT",
            Self::InvalidTokenId => "INVALID_TOKEN_ID",
            Self::InvalidCustomFeeCollector => "INVALID_CUSTOM_FEE_COLLECTOR",
            Self::InvalidScheduleId => "INVALID_SCHEDULE_ID",
            Self::UnresolvableRequiredSigners => "UNRESOLVABLE_REQUIRED_SIGNERS",
            Self::ScheduledTransactionNotInWhitelist => "SCHEDULED_TRANSACTION_NOT_IN_WHITELIST",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl From<KeyOrderingFailure> for ResponseCode {
    fn from(reason: KeyOrderingFailure) -> Self {
        match reason {
            KeyOrderingFailure::InvalidPayerAccount => Self::PayerAccountNotFound,
            KeyOrderingFailure::MissingAccount => Self::InvalidAccountId,
            KeyOrderingFailure::MissingFile => Self::InvalidFileId,
            KeyOrderingFailure::InvalidContract => Self::InvalidContractId,
            KeyOrderingFailure::ImmutableContract => Self::ModifyingImmutableContract,
            KeyOrderingFailure::MissingTopic => Self::InvalidTopicId,
            KeyOrderingFailure::MissingAutoRenewAccount
            | KeyOrderingFailure::InvalidAutoRenewAccount => Self::InvalidAutorenewAccount,
            KeyOrderingFailure::MissingToken => Self::InvalidTokenId,
            KeyOrderingFailure::InvalidFeeCollector => Self::InvalidCustomFeeCollector,
            KeyOrderingFailure::MissingSchedule => Self::InvalidScheduleId,
            KeyOrderingFailure::UnresolvableRequiredSigners => Self::UnresolvableRequiredSigners,
            KeyOrderingFailure::UnschedulableTransaction => {
                Self::ScheduledTransactionNotInWhitelist
            },
            KeyOrderingFailure::GeneralPayerError | KeyOrderingFailure::GeneralError => {
                Self::Unknown
            },
        }
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Precheck
// ============================================================================

/// Why the submission gate rejected a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrecheckRejection {
    /// Status returned to the client.
    pub code: ResponseCode,
    /// The underlying failure.
    pub failure: OrderingFailure,
}

/// Reports failures as [`PrecheckRejection`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrecheckResultFactory;

impl SigningOrderResultFactory for PrecheckResultFactory {
    type Report = PrecheckRejection;

    fn report(&self, failure: OrderingFailure) -> PrecheckRejection {
        PrecheckRejection { code: failure.reason.into(), failure }
    }
}

// ============================================================================
// Handle
// ============================================================================

/// Fine-grained signature status used while handling a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignatureStatusCode {
    /// The payer account does not exist.
    InvalidPayerId,
    /// Reading the payer failed.
    GeneralPayerError,
    /// A referenced account does not exist.
    InvalidAccountId,
    /// A referenced file does not exist.
    InvalidFileId,
    /// A referenced contract does not exist.
    InvalidContractId,
    /// The contract has no admin key.
    ImmutableContract,
    /// A referenced topic does not exist.
    InvalidTopicId,
    /// An auto-renew account does not exist.
    InvalidAutoRenewAccountId,
    /// A referenced token does not exist.
    InvalidTokenId,
    /// A custom fee collector does not exist.
    InvalidFeeCollector,
    /// A referenced schedule does not exist.
    InvalidScheduleId,
    /// The keys of a scheduled transaction could not be resolved.
    UnresolvableRequiredSigners,
    /// The wrapped transaction kind cannot be scheduled.
    UnschedulableTransaction,
    /// Reading state failed.
    GeneralError,
}

impl From<KeyOrderingFailure> for SignatureStatusCode {
    fn from(reason: KeyOrderingFailure) -> Self {
        match reason {
            KeyOrderingFailure::InvalidPayerAccount => Self::InvalidPayerId,
            KeyOrderingFailure::GeneralPayerError => Self::GeneralPayerError,
            KeyOrderingFailure::MissingAccount => Self::InvalidAccountId,
            KeyOrderingFailure::MissingFile => Self::InvalidFileId,
            KeyOrderingFailure::InvalidContract => Self::InvalidContractId,
            KeyOrderingFailure::ImmutableContract => Self::ImmutableContract,
            KeyOrderingFailure::MissingTopic => Self::InvalidTopicId,
            KeyOrderingFailure::MissingAutoRenewAccount
            | KeyOrderingFailure::InvalidAutoRenewAccount => Self::InvalidAutoRenewAccountId,
            KeyOrderingFailure::MissingToken => Self::InvalidTokenId,
            KeyOrderingFailure::InvalidFeeCollector => Self::InvalidFeeCollector,
            KeyOrderingFailure::MissingSchedule => Self::InvalidScheduleId,
            KeyOrderingFailure::UnresolvableRequiredSigners => Self::UnresolvableRequiredSigners,
            KeyOrderingFailure::UnschedulableTransaction => Self::UnschedulableTransaction,
            KeyOrderingFailure::GeneralError => Self::GeneralError,
        }
    }
}

/// Signature status reported to the consensus-time handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureStatus {
    /// Fine-grained status.
    pub code: SignatureStatusCode,
    /// Client-facing status, identical to what precheck reports.
    pub response: ResponseCode,
    /// Whether the status arose while handling a transaction at consensus.
    pub handling_txn: bool,
    /// The underlying failure.
    pub failure: OrderingFailure,
}

impl fmt::Display for SignatureStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let phase = if self.handling_txn { "handle" } else { "precheck" };
        write!(f, "{:?} ({}) during {phase}: {}", self.code, self.response, self.failure)
    }
}

/// Reports failures as [`SignatureStatus`]es.
#[derive(Debug, Clone, Copy)]
pub struct HandleResultFactory {
    handling_txn: bool,
}

impl HandleResultFactory {
    /// Creates a factory; `handling_txn` marks consensus-time use.
    pub const fn new(handling_txn: bool) -> Self {
        Self { handling_txn }
    }
}

impl Default for HandleResultFactory {
    fn default() -> Self {
        Self::new(true)
    }
}

impl SigningOrderResultFactory for HandleResultFactory {
    type Report = SignatureStatus;

    fn report(&self, failure: OrderingFailure) -> SignatureStatus {
        SignatureStatus {
            code: failure.reason.into(),
            response: failure.reason.into(),
            handling_txn: self.handling_txn,
            failure,
        }
    }
}
