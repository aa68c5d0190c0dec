//! Failure taxonomy for signing-order resolution.
//!
//! Every reason resolution can stop short of a key list maps to exactly one
//! [`KeyOrderingFailure`]. Failures are values, never panics: the resolver
//! returns them to its caller, which decides whether they become a precheck
//! rejection or a consensus-time status.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Why a signing order could not be resolved.
///
/// Codes are organized into ranges:
///
/// | Range     | Domain            | Examples                                  |
/// |-----------|-------------------|-------------------------------------------|
/// | 100–199   | Payer             | Missing payer, payer lookup fault         |
/// | 200–299   | Missing entities  | Account, file, topic, token, schedule     |
/// | 300–399   | Invalid references| Immutable contract, fee collector         |
/// | 400–499   | Scheduling        | Unresolvable inner signers                |
/// | 900–999   | Unexpected        | Lookup backend fault                      |
///
/// Use [`KeyOrderingFailure::as_u16`] for serialization and
/// [`KeyOrderingFailure::from_u16`] for deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum KeyOrderingFailure {
    // --- Payer (100–199) ---
    /// The payer account does not exist or is deleted.
    InvalidPayerAccount = 100,
    /// Looking up the payer failed unexpectedly.
    GeneralPayerError = 101,

    // --- Missing entities (200–299) ---
    /// A referenced account does not exist or is deleted.
    MissingAccount = 200,
    /// A referenced file does not exist or is deleted.
    MissingFile = 201,
    /// A referenced topic does not exist or is deleted.
    MissingTopic = 202,
    /// A referenced token does not exist or is deleted.
    MissingToken = 203,
    /// A referenced schedule does not exist, is deleted, or has executed.
    MissingSchedule = 204,
    /// A topic's auto-renew account does not exist.
    MissingAutoRenewAccount = 205,

    // --- Invalid references (300–399) ---
    /// A referenced contract does not exist or is deleted.
    InvalidContract = 300,
    /// The contract has no usable admin key and cannot be modified.
    ImmutableContract = 301,
    /// A custom fee names a collector that does not exist.
    InvalidFeeCollector = 302,
    /// A token's auto-renew account does not exist.
    InvalidAutoRenewAccount = 303,

    // --- Scheduling (400–499) ---
    /// The keys of a scheduled transaction could not be resolved.
    UnresolvableRequiredSigners = 400,
    /// The wrapped transaction kind cannot be scheduled.
    UnschedulableTransaction = 401,

    // --- Unexpected (900–999) ---
    /// A non-payer lookup failed unexpectedly.
    GeneralError = 900,
}

impl KeyOrderingFailure {
    /// Every failure, in code order.
    pub const ALL: [Self; 15] = [
        Self::InvalidPayerAccount,
        Self::GeneralPayerError,
        Self::MissingAccount,
        Self::MissingFile,
        Self::MissingTopic,
        Self::MissingToken,
        Self::MissingSchedule,
        Self::MissingAutoRenewAccount,
        Self::InvalidContract,
        Self::ImmutableContract,
        Self::InvalidFeeCollector,
        Self::InvalidAutoRenewAccount,
        Self::UnresolvableRequiredSigners,
        Self::UnschedulableTransaction,
        Self::GeneralError,
    ];

    /// Returns the numeric code value.
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    /// Converts a numeric code, returning `None` for unknown values.
    #[must_use]
    pub fn from_u16(code: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|failure| failure.as_u16() == code)
    }

    /// Stable upper-case name used in logs and status messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidPayerAccount => "INVALID_PAYER_ACCOUNT",
            Self::GeneralPayerError => "GENERAL_PAYER_ERROR",
            Self::MissingAccount => "MISSING_ACCOUNT",
            Self::MissingFile => "MISSING_FILE",
            Self::MissingTopic => "MISSING_TOPIC",
            Self::MissingToken => "INVALID_TOKEN_ID",
            Self::MissingSchedule => "INVALID_SCHEDULE_ID",
            Self::MissingAutoRenewAccount => "MISSING_AUTO_RENEW_ACCOUNT",
            Self::InvalidContract => "INVALID_CONTRACT",
            Self::ImmutableContract => "IMMUTABLE_CONTRACT",
            Self::InvalidFeeCollector => "INVALID_FEE_COLLECTOR",
            Self::InvalidAutoRenewAccount => "INVALID_AUTO_RENEW_ACCOUNT_ID",
            Self::UnresolvableRequiredSigners => "UNRESOLVABLE_REQUIRED_SIGNERS",
            Self::UnschedulableTransaction => "SCHEDULED_TRANSACTION_NOT_IN_WHITELIST",
            Self::GeneralError => "GENERAL_ERROR",
        }
    }

    /// Whether this failure arose while resolving the payer.
    #[must_use]
    pub const fn is_payer_failure(self) -> bool {
        matches!(self, Self::InvalidPayerAccount | Self::GeneralPayerError)
    }

    /// Whether this failure reflects an unexpected fault rather than a
    /// problem with the transaction itself.
    #[must_use]
    pub const fn is_general(self) -> bool {
        matches!(self, Self::GeneralPayerError | Self::GeneralError)
    }

    /// Suggested corrective action for the submitter.
    ///
    /// Stable and safe to surface to clients or operator dashboards.
    #[must_use]
    pub const fn suggested_action(self) -> &'static str {
        match self {
            Self::InvalidPayerAccount => "Pay with an existing, undeleted account.",
            Self::GeneralPayerError | Self::GeneralError => {
                "Retry later. The node could not read ledger state for this transaction."
            },
            Self::MissingAccount => "Reference only existing, undeleted accounts.",
            Self::MissingFile => "Verify the file id; the file may have been deleted.",
            Self::MissingTopic => "Verify the topic id; the topic may have been deleted.",
            Self::MissingToken => "Verify the token id; the token may have been deleted.",
            Self::MissingSchedule => {
                "Verify the schedule id; the schedule may have been deleted or executed."
            },
            Self::MissingAutoRenewAccount | Self::InvalidAutoRenewAccount => {
                "Name an existing account as the auto-renew account."
            },
            Self::InvalidContract => "Verify the contract id; the contract may have been deleted.",
            Self::ImmutableContract => {
                "The contract has no admin key; only its expiry can be extended."
            },
            Self::InvalidFeeCollector => "Name existing accounts as custom fee collectors.",
            Self::UnresolvableRequiredSigners => {
                "Fix the scheduled transaction so every entity it references exists."
            },
            Self::UnschedulableTransaction => "Submit schedule operations directly.",
        }
    }
}

impl fmt::Display for KeyOrderingFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
