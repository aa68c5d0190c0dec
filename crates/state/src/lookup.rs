//! The lookup capability consumed by signing-order resolution.
//!
//! ```text
//! Resolver -> SigMetadataLookup -> metadata | LookupError
//!                    |
//!        +-----------+-------------+
//!        |                         |
//!   StateSnapshot        DelegatingSigMetadataLookup
//!  (encoded records)       (one closure per kind)
//! ```
//!
//! Lookups never fail for "not found" with anything but
//! [`LookupError::Failure`]; [`LookupError::Backend`] is reserved for faults
//! of the implementation itself.

use std::{fmt, sync::Arc};

use ledger_sigs_types::{
    AccountId, ContractId, EntityRef, FileId, KeyOrderingFailure, ScheduleId, TokenId, TopicId,
};
use snafu::Snafu;

use crate::metadata::{
    AccountSigningMetadata, ContractSigningMetadata, FileSigningMetadata,
    ScheduleSigningMetadata, TokenSigningMetadata, TopicSigningMetadata,
};

/// Why a lookup produced no metadata.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub))]
pub enum LookupError {
    /// The entity is absent or unusable.
    #[snafu(display("{reason} for {entity}"))]
    Failure {
        /// Classification of the problem.
        reason: KeyOrderingFailure,
        /// The entity looked up.
        entity: EntityRef,
    },

    /// The lookup implementation itself failed.
    #[snafu(display("Lookup of {entity} failed: {message}"))]
    Backend {
        /// The entity looked up.
        entity: EntityRef,
        /// Description of the fault.
        message: String,
    },
}

impl LookupError {
    /// Creates a domain failure.
    pub fn failure(reason: KeyOrderingFailure, entity: impl Into<EntityRef>) -> Self {
        Self::Failure { reason, entity: entity.into() }
    }

    /// Creates a backend fault.
    pub fn backend(entity: impl Into<EntityRef>, message: impl Into<String>) -> Self {
        Self::Backend { entity: entity.into(), message: message.into() }
    }

    /// The entity that was looked up.
    pub fn entity(&self) -> EntityRef {
        match self {
            Self::Failure { entity, .. } | Self::Backend { entity, .. } => *entity,
        }
    }

    /// The failure classification, or `None` for a backend fault.
    pub fn reason(&self) -> Option<KeyOrderingFailure> {
        match self {
            Self::Failure { reason, .. } => Some(*reason),
            Self::Backend { .. } => None,
        }
    }
}

/// Result of a metadata lookup.
pub type LookupResult<T> = Result<T, LookupError>;

/// Read access to the signing metadata of every entity kind.
///
/// Implementations read an immutable view of ledger state; they must not
/// block or mutate, and are shared across worker threads.
pub trait SigMetadataLookup: Send + Sync {
    /// Looks up an account. Absent or deleted accounts fail with
    /// [`KeyOrderingFailure::MissingAccount`].
    fn account_signing_meta(&self, id: AccountId) -> LookupResult<AccountSigningMetadata>;

    /// Looks up a contract. Absent or deleted contracts fail with
    /// [`KeyOrderingFailure::InvalidContract`].
    fn contract_signing_meta(&self, id: ContractId) -> LookupResult<ContractSigningMetadata>;

    /// Looks up a file. Absent or deleted files fail with
    /// [`KeyOrderingFailure::MissingFile`].
    fn file_signing_meta(&self, id: FileId) -> LookupResult<FileSigningMetadata>;

    /// Looks up a topic. Absent or deleted topics fail with
    /// [`KeyOrderingFailure::MissingTopic`].
    fn topic_signing_meta(&self, id: TopicId) -> LookupResult<TopicSigningMetadata>;

    /// Looks up a token. Absent or deleted tokens fail with
    /// [`KeyOrderingFailure::MissingToken`].
    fn token_signing_meta(&self, id: TokenId) -> LookupResult<TokenSigningMetadata>;

    /// Looks up a schedule. Absent, deleted or executed schedules fail with
    /// [`KeyOrderingFailure::MissingSchedule`].
    fn schedule_signing_meta(&self, id: ScheduleId) -> LookupResult<ScheduleSigningMetadata>;
}

macro_rules! forward_lookup {
    ($($wrapper:ty),*) => {
        $(
            impl<T: SigMetadataLookup + ?Sized> SigMetadataLookup for $wrapper {
                fn account_signing_meta(&self, id: AccountId) -> LookupResult<AccountSigningMetadata> {
                    (**self).account_signing_meta(id)
                }

                fn contract_signing_meta(&self, id: ContractId) -> LookupResult<ContractSigningMetadata> {
                    (**self).contract_signing_meta(id)
                }

                fn file_signing_meta(&self, id: FileId) -> LookupResult<FileSigningMetadata> {
                    (**self).file_signing_meta(id)
                }

                fn topic_signing_meta(&self, id: TopicId) -> LookupResult<TopicSigningMetadata> {
                    (**self).topic_signing_meta(id)
                }

                fn token_signing_meta(&self, id: TokenId) -> LookupResult<TokenSigningMetadata> {
                    (**self).token_signing_meta(id)
                }

                fn schedule_signing_meta(&self, id: ScheduleId) -> LookupResult<ScheduleSigningMetadata> {
                    (**self).schedule_signing_meta(id)
                }
            }
        )*
    };
}

forward_lookup!(&T, Arc<T>, Box<T>);

// ============================================================================
// Delegating Lookup
// ============================================================================

type LookupFn<I, M> = Box<dyn Fn(I) -> LookupResult<M> + Send + Sync>;

/// A lookup assembled from one function per entity kind.
///
/// Every kind defaults to reporting the entity as missing, so callers only
/// supply the kinds they care about.
///
/// ```no_run
/// # use ledger_sigs_state::{AccountSigningMetadata, DelegatingSigMetadataLookup};
/// # use ledger_sigs_types::KeyNode;
/// let lookup = DelegatingSigMetadataLookup::new().with_accounts(|_| {
///     Ok(AccountSigningMetadata {
///         key: KeyNode::ed25519([1; 32]),
///         receiver_sig_required: false,
///     })
/// });
/// ```
pub struct DelegatingSigMetadataLookup {
    accounts: LookupFn<AccountId, AccountSigningMetadata>,
    contracts: LookupFn<ContractId, ContractSigningMetadata>,
    files: LookupFn<FileId, FileSigningMetadata>,
    topics: LookupFn<TopicId, TopicSigningMetadata>,
    tokens: LookupFn<TokenId, TokenSigningMetadata>,
    schedules: LookupFn<ScheduleId, ScheduleSigningMetadata>,
}

impl DelegatingSigMetadataLookup {
    /// Creates a lookup in which every entity is missing.
    pub fn new() -> Self {
        Self {
            accounts: Box::new(|id| Err(LookupError::failure(KeyOrderingFailure::MissingAccount, id))),
            contracts: Box::new(|id| {
                Err(LookupError::failure(KeyOrderingFailure::InvalidContract, id))
            }),
            files: Box::new(|id| Err(LookupError::failure(KeyOrderingFailure::MissingFile, id))),
            topics: Box::new(|id| Err(LookupError::failure(KeyOrderingFailure::MissingTopic, id))),
            tokens: Box::new(|id| Err(LookupError::failure(KeyOrderingFailure::MissingToken, id))),
            schedules: Box::new(|id| {
                Err(LookupError::failure(KeyOrderingFailure::MissingSchedule, id))
            }),
        }
    }

    /// Replaces the account lookup.
    #[must_use]
    pub fn with_accounts(
        mut self,
        f: impl Fn(AccountId) -> LookupResult<AccountSigningMetadata> + Send + Sync + 'static,
    ) -> Self {
        self.accounts = Box::new(f);
        self
    }

    /// Replaces the contract lookup.
    #[must_use]
    pub fn with_contracts(
        mut self,
        f: impl Fn(ContractId) -> LookupResult<ContractSigningMetadata> + Send + Sync + 'static,
    ) -> Self {
        self.contracts = Box::new(f);
        self
    }

    /// Replaces the file lookup.
    #[must_use]
    pub fn with_files(
        mut self,
        f: impl Fn(FileId) -> LookupResult<FileSigningMetadata> + Send + Sync + 'static,
    ) -> Self {
        self.files = Box::new(f);
        self
    }

    /// Replaces the topic lookup.
    #[must_use]
    pub fn with_topics(
        mut self,
        f: impl Fn(TopicId) -> LookupResult<TopicSigningMetadata> + Send + Sync + 'static,
    ) -> Self {
        self.topics = Box::new(f);
        self
    }

    /// Replaces the token lookup.
    #[must_use]
    pub fn with_tokens(
        mut self,
        f: impl Fn(TokenId) -> LookupResult<TokenSigningMetadata> + Send + Sync + 'static,
    ) -> Self {
        self.tokens = Box::new(f);
        self
    }

    /// Replaces the schedule lookup.
    #[must_use]
    pub fn with_schedules(
        mut self,
        f: impl Fn(ScheduleId) -> LookupResult<ScheduleSigningMetadata> + Send + Sync + 'static,
    ) -> Self {
        self.schedules = Box::new(f);
        self
    }
}

impl Default for DelegatingSigMetadataLookup {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DelegatingSigMetadataLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DelegatingSigMetadataLookup").finish_non_exhaustive()
    }
}

impl SigMetadataLookup for DelegatingSigMetadataLookup {
    fn account_signing_meta(&self, id: AccountId) -> LookupResult<AccountSigningMetadata> {
        (self.accounts)(id)
    }

    fn contract_signing_meta(&self, id: ContractId) -> LookupResult<ContractSigningMetadata> {
        (self.contracts)(id)
    }

    fn file_signing_meta(&self, id: FileId) -> LookupResult<FileSigningMetadata> {
        (self.files)(id)
    }

    fn topic_signing_meta(&self, id: TopicId) -> LookupResult<TopicSigningMetadata> {
        (self.topics)(id)
    }

    fn token_signing_meta(&self, id: TokenId) -> LookupResult<TokenSigningMetadata> {
        (self.tokens)(id)
    }

    fn schedule_signing_meta(&self, id: ScheduleId) -> LookupResult<ScheduleSigningMetadata> {
        (self.schedules)(id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::disallowed_methods)]
mod tests {
    use ledger_sigs_types::KeyNode;

    use super::*;

    #[test]
    fn test_delegating_defaults_to_missing() {
        let lookup = DelegatingSigMetadataLookup::default();
        let err = lookup.account_signing_meta(AccountId::num_only(1)).unwrap_err();
        assert_eq!(err, LookupError::failure(KeyOrderingFailure::MissingAccount, AccountId::num_only(1)));
        let err = lookup.contract_signing_meta(ContractId::num_only(2)).unwrap_err();
        assert!(matches!(err, LookupError::Failure { reason: KeyOrderingFailure::InvalidContract, .. }));
        let err = lookup.schedule_signing_meta(ScheduleId::num_only(3)).unwrap_err();
        assert_eq!(err.entity(), EntityRef::Schedule(ScheduleId::num_only(3)));
    }

    #[test]
    fn test_delegating_uses_supplied_functions() {
        let lookup = DelegatingSigMetadataLookup::new().with_accounts(|id| {
            if id.num == 1 {
                Ok(AccountSigningMetadata {
                    key: KeyNode::ed25519([1; 32]),
                    receiver_sig_required: true,
                })
            } else {
                Err(LookupError::backend(id, "disk on fire"))
            }
        });
        let meta = lookup.account_signing_meta(AccountId::num_only(1)).unwrap();
        assert!(meta.receiver_sig_required);
        let err = lookup.account_signing_meta(AccountId::num_only(9)).unwrap_err();
        assert_eq!(err.to_string(), "Lookup of account 0.0.9 failed: disk on fire");
    }

    #[test]
    fn test_forwarding_through_arc_and_ref() {
        fn first_account(lookup: impl SigMetadataLookup) -> bool {
            lookup.account_signing_meta(AccountId::num_only(1)).is_ok()
        }
        let lookup = Arc::new(DelegatingSigMetadataLookup::new().with_accounts(|_| {
            Ok(AccountSigningMetadata { key: KeyNode::ed25519([2; 32]), receiver_sig_required: false })
        }));
        assert!(first_account(Arc::clone(&lookup)));
        assert!(first_account(&*lookup));
    }

    #[test]
    fn test_failure_display() {
        let err = LookupError::failure(KeyOrderingFailure::MissingTopic, TopicId::num_only(7));
        assert_eq!(err.to_string(), "MISSING_TOPIC for topic 0.0.7");
    }
}
