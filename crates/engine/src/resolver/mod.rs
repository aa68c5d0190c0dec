//! Signing order resolution.
//!
//! ```text
//! Transaction ──► keys_for_payer ─────────► payer key | payer failure
//!      │
//!      └────────► keys_for_other_parties
//!                   │ dispatch on body kind
//!                   ├─ crypto / file / contract / topic / token
//!                   └─ schedule ──► (recursive, scheduled scope)
//!                   │
//!                   ▼
//!             dedup per scope ──► SigningOrderResult<F::Report>
//! ```
//!
//! Every entity referenced by the body is read through a
//! [`SigMetadataLookup`]. A domain failure stops resolution immediately with
//! the failure specific to the role the entity plays; nothing partial is
//! ever returned.

mod contract;
mod crypto;
mod file;
mod schedule;
mod token;
mod topic;

use ledger_sigs_state::{
    AccountSigningMetadata, ContractSigningMetadata, FileSigningMetadata, LookupError,
    ScheduleSigningMetadata, SigMetadataLookup, TokenSigningMetadata, TopicSigningMetadata,
};
use ledger_sigs_types::{
    AccountId, ContractId, EntityRef, FileId, KeyList, KeyNode, KeyOrderingFailure, ScheduleId,
    TokenId, TopicId, Transaction, TransactionBody, config::SigningConfig,
};
use tracing::{debug, trace, warn};

use crate::{
    factory::{OrderingFailure, SigningOrderResultFactory},
    order::{KeyActivation, KeyScope, OrderedKey, SigningOrderResult, dedup_within_scopes},
    waivers::{PolicyBasedSigWaivers, SignatureWaivers},
};

/// Computes which keys must sign a transaction, and in what order.
///
/// Resolution is a pure function of the transaction, the lookup's view of
/// state and the waivers; the resolver holds no mutable state and can be
/// shared across threads.
#[derive(Debug, Clone)]
pub struct SigningOrderResolver<L, W> {
    lookup: L,
    waivers: W,
}

impl<L: SigMetadataLookup> SigningOrderResolver<L, PolicyBasedSigWaivers> {
    /// Creates a resolver whose waivers follow `config`.
    pub fn from_config(lookup: L, config: &SigningConfig) -> Self {
        Self::new(lookup, PolicyBasedSigWaivers::new(config))
    }
}

impl<L: SigMetadataLookup, W: SignatureWaivers> SigningOrderResolver<L, W> {
    /// Creates a resolver from a lookup and waivers.
    pub fn new(lookup: L, waivers: W) -> Self {
        Self { lookup, waivers }
    }

    /// Resolves the payer's key.
    ///
    /// Empty when the payer's signature is waived. A missing payer fails
    /// with [`KeyOrderingFailure::InvalidPayerAccount`]; any other lookup
    /// problem with [`KeyOrderingFailure::GeneralPayerError`].
    pub fn keys_for_payer<F: SigningOrderResultFactory>(
        &self,
        txn: &Transaction,
        factory: &F,
    ) -> SigningOrderResult<F::Report> {
        if self.waivers.is_payer_sig_waived(txn) {
            trace!(txn = %txn.id, "Payer signature waived");
            return factory.for_valid_order(Vec::new());
        }
        let payer = txn.payer();
        let outcome = self.lookup.account_signing_meta(payer).map_err(|err| match err {
            LookupError::Failure { reason: KeyOrderingFailure::MissingAccount, entity } => {
                Unresolved::new(KeyOrderingFailure::InvalidPayerAccount, entity)
            },
            other => general(other, KeyOrderingFailure::GeneralPayerError),
        });
        match outcome {
            Ok(meta) => factory.for_valid_order(vec![OrderedKey::new(meta.key, scope_of(txn))]),
            Err(unresolved) => self.fail(txn, unresolved, factory),
        }
    }

    /// Resolves every non-payer key the transaction requires.
    pub fn keys_for_other_parties<F: SigningOrderResultFactory>(
        &self,
        txn: &Transaction,
        factory: &F,
    ) -> SigningOrderResult<F::Report> {
        match self.collect_other_parties(txn, scope_of(txn)) {
            Ok(keys) => {
                let keys = dedup_within_scopes(keys);
                trace!(txn = %txn.id, kind = txn.body.kind_name(), keys = keys.len(), "Resolved signing order");
                factory.for_valid_order(keys)
            },
            Err(unresolved) => self.fail(txn, unresolved, factory),
        }
    }

    fn fail<F: SigningOrderResultFactory>(
        &self,
        txn: &Transaction,
        unresolved: Unresolved,
        factory: &F,
    ) -> SigningOrderResult<F::Report> {
        debug!(
            txn = %txn.id,
            kind = txn.body.kind_name(),
            reason = %unresolved.reason,
            entity = ?unresolved.entity,
            "Signing order unresolved"
        );
        factory.for_failure(OrderingFailure {
            reason: unresolved.reason,
            entity: unresolved.entity,
            txn_id: txn.id,
        })
    }

    /// Gathers keys in body order, before deduplication.
    fn collect_other_parties(
        &self,
        txn: &Transaction,
        scope: KeyScope,
    ) -> Result<Vec<OrderedKey>, Unresolved> {
        let mut out = KeyCollector::new(scope);
        match &txn.body {
            TransactionBody::CryptoCreate(op) => Self::crypto_create(op, &mut out),
            TransactionBody::CryptoTransfer(op) => self.crypto_transfer(op, &mut out)?,
            TransactionBody::CryptoUpdate(op) => self.crypto_update(txn, op, &mut out)?,
            TransactionBody::CryptoDelete(op) => self.crypto_delete(op, &mut out)?,

            TransactionBody::FileCreate(op) => Self::file_create(op, &mut out),
            TransactionBody::FileAppend(op) => self.file_append(txn, op, &mut out)?,
            TransactionBody::FileUpdate(op) => self.file_update(txn, op, &mut out)?,
            TransactionBody::FileDelete(op) => self.file_delete(op, &mut out)?,

            TransactionBody::ContractCreate(op) => Self::contract_create(op, &mut out),
            TransactionBody::ContractUpdate(op) => self.contract_update(op, &mut out)?,
            TransactionBody::ContractDelete(op) => self.contract_delete(op, &mut out)?,

            TransactionBody::TopicCreate(op) => self.topic_create(op, &mut out)?,
            TransactionBody::TopicUpdate(op) => self.topic_update(op, &mut out)?,
            TransactionBody::TopicDelete(op) => self.topic_delete(op, &mut out)?,
            TransactionBody::SubmitMessage(op) => self.submit_message(op, &mut out)?,

            TransactionBody::TokenCreate(op) => self.token_create(op, &mut out)?,
            TransactionBody::TokenUpdate(op) => self.token_update(op, &mut out)?,
            TransactionBody::TokenDelete(op) => {
                self.token_role_key(op.token, |meta| meta.admin_key, &mut out)?;
            },
            TransactionBody::TokenFreeze(op) | TransactionBody::TokenUnfreeze(op) => {
                self.token_role_key(op.token, |meta| meta.freeze_key, &mut out)?;
            },
            TransactionBody::TokenGrantKyc(op) | TransactionBody::TokenRevokeKyc(op) => {
                self.token_role_key(op.token, |meta| meta.kyc_key, &mut out)?;
            },
            TransactionBody::TokenWipe(op) => {
                self.token_role_key(op.token, |meta| meta.wipe_key, &mut out)?;
            },
            TransactionBody::TokenMint(op) => {
                self.token_role_key(op.token, |meta| meta.supply_key, &mut out)?;
            },
            TransactionBody::TokenBurn(op) => {
                self.token_role_key(op.token, |meta| meta.supply_key, &mut out)?;
            },
            TransactionBody::TokenAssociate(op) | TransactionBody::TokenDissociate(op) => {
                self.token_association(op, &mut out)?;
            },
            TransactionBody::TokenFeeScheduleUpdate(op) => self.token_fee_schedule_update(op, &mut out)?,

            TransactionBody::ScheduleCreate(op) => self.schedule_create(txn, op, &mut out)?,
            TransactionBody::ScheduleSign(op) => self.schedule_sign(txn, op, &mut out)?,
            TransactionBody::ScheduleDelete(op) => self.schedule_delete(op, &mut out)?,

            TransactionBody::ContractCall(_)
            | TransactionBody::SystemDelete(_)
            | TransactionBody::SystemUndelete(_)
            | TransactionBody::Freeze(_) => {},
        }
        Ok(out.into_keys())
    }

    // ========================================================================
    // Lookups
    // ========================================================================

    /// Reads an account, reporting its absence as `missing`.
    fn account(
        &self,
        id: AccountId,
        missing: KeyOrderingFailure,
    ) -> Result<AccountSigningMetadata, Unresolved> {
        self.lookup
            .account_signing_meta(id)
            .map_err(|err| classify(err, KeyOrderingFailure::MissingAccount, missing))
    }

    fn contract(&self, id: ContractId) -> Result<ContractSigningMetadata, Unresolved> {
        let reason = KeyOrderingFailure::InvalidContract;
        self.lookup.contract_signing_meta(id).map_err(|err| classify(err, reason, reason))
    }

    fn file(&self, id: FileId) -> Result<FileSigningMetadata, Unresolved> {
        let reason = KeyOrderingFailure::MissingFile;
        self.lookup.file_signing_meta(id).map_err(|err| classify(err, reason, reason))
    }

    fn topic(&self, id: TopicId) -> Result<TopicSigningMetadata, Unresolved> {
        let reason = KeyOrderingFailure::MissingTopic;
        self.lookup.topic_signing_meta(id).map_err(|err| classify(err, reason, reason))
    }

    fn token(&self, id: TokenId) -> Result<TokenSigningMetadata, Unresolved> {
        let reason = KeyOrderingFailure::MissingToken;
        self.lookup.token_signing_meta(id).map_err(|err| classify(err, reason, reason))
    }

    fn schedule(&self, id: ScheduleId) -> Result<ScheduleSigningMetadata, Unresolved> {
        let reason = KeyOrderingFailure::MissingSchedule;
        self.lookup.schedule_signing_meta(id).map_err(|err| classify(err, reason, reason))
    }
}

fn scope_of(txn: &Transaction) -> KeyScope {
    if txn.id.scheduled { KeyScope::ScheduledTransaction } else { KeyScope::OuterTransaction }
}

// ============================================================================
// Failure classification
// ============================================================================

/// A resolution that stopped short of a key list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Unresolved {
    reason: KeyOrderingFailure,
    entity: Option<EntityRef>,
}

impl Unresolved {
    fn new(reason: KeyOrderingFailure, entity: impl Into<EntityRef>) -> Self {
        Self { reason, entity: Some(entity.into()) }
    }
}

/// Maps a lookup error to the failure for the role the entity plays.
///
/// Only the absence reason expected for the entity kind is specific; every
/// other outcome is a general error.
fn classify(err: LookupError, expected: KeyOrderingFailure, report_as: KeyOrderingFailure) -> Unresolved {
    match err {
        LookupError::Failure { reason, entity } if reason == expected => {
            Unresolved::new(report_as, entity)
        },
        other => general(other, KeyOrderingFailure::GeneralError),
    }
}

fn general(err: LookupError, reason: KeyOrderingFailure) -> Unresolved {
    let entity = err.entity();
    warn!(entity = %entity, error = %err, reason = %reason, "Lookup fault during signing order resolution");
    Unresolved::new(reason, entity)
}

// ============================================================================
// Key collection
// ============================================================================

/// Accumulates required keys in a single scope.
#[derive(Debug)]
struct KeyCollector {
    scope: KeyScope,
    keys: Vec<OrderedKey>,
}

impl KeyCollector {
    fn new(scope: KeyScope) -> Self {
        Self { scope, keys: Vec::new() }
    }

    fn push(&mut self, key: KeyNode) {
        self.keys.push(OrderedKey::new(key, self.scope));
    }

    fn push_opt(&mut self, key: Option<KeyNode>) {
        if let Some(key) = key {
            self.push(key);
        }
    }

    fn push_in(&mut self, key: KeyNode, scope: KeyScope) {
        self.keys.push(OrderedKey::new(key, scope));
    }

    fn push_wacl(&mut self, wacl: KeyList, activation: KeyActivation) {
        self.keys.push(OrderedKey::new(KeyNode::List(wacl), self.scope).with_activation(activation));
    }

    fn extend(&mut self, keys: Vec<OrderedKey>) {
        self.keys.extend(keys);
    }

    fn into_keys(self) -> Vec<OrderedKey> {
        self.keys
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::disallowed_methods)]
mod tests {
    use chrono::{TimeZone, Utc};
    use ledger_sigs_state::{AccountSigningMetadata, DelegatingSigMetadataLookup};
    use ledger_sigs_types::{TransactionId, transaction::CryptoDelete};

    use super::*;
    use crate::{
        factory::{HandleResultFactory, PrecheckResultFactory, ResponseCode, SignatureStatusCode},
        waivers::NoSigWaivers,
    };

    fn txn(payer: u64, body: impl Into<TransactionBody>) -> Transaction {
        let id = TransactionId::builder()
            .payer(AccountId::num_only(payer))
            .valid_start(Utc.timestamp_opt(1_600_000_000, 0).unwrap())
            .build();
        Transaction::new(id, body)
    }

    fn delete_body() -> CryptoDelete {
        CryptoDelete { account: AccountId::num_only(1001), transfer_account: AccountId::num_only(1002) }
    }

    fn known_accounts() -> DelegatingSigMetadataLookup {
        DelegatingSigMetadataLookup::new().with_accounts(|id| match id.num {
            13257 | 1001 | 1002 => Ok(AccountSigningMetadata {
                key: KeyNode::ed25519([u8::try_from(id.num % 251).unwrap(); 32]),
                receiver_sig_required: id.num == 1002,
            }),
            9999 => Err(LookupError::backend(id, "i/o error")),
            _ => Err(LookupError::failure(KeyOrderingFailure::MissingAccount, id)),
        })
    }

    #[test]
    fn test_payer_key_resolved() {
        let resolver = SigningOrderResolver::new(known_accounts(), NoSigWaivers);
        let result = resolver.keys_for_payer(&txn(13257, delete_body()), &PrecheckResultFactory);
        assert_eq!(result.ordered_keys().len(), 1);
        assert!(!result.ordered_keys()[0].is_for_scheduled_txn());
    }

    #[test]
    fn test_missing_payer_is_invalid_payer_account() {
        let resolver = SigningOrderResolver::new(known_accounts(), NoSigWaivers);
        let result = resolver.keys_for_payer(&txn(404, delete_body()), &HandleResultFactory::default());
        let status = result.error_report().unwrap();
        assert_eq!(status.code, SignatureStatusCode::InvalidPayerId);
        assert_eq!(status.failure.entity, Some(AccountId::num_only(404).into()));
    }

    #[test]
    fn test_payer_backend_fault_is_general_payer_error() {
        let resolver = SigningOrderResolver::new(known_accounts(), NoSigWaivers);
        let result = resolver.keys_for_payer(&txn(9999, delete_body()), &HandleResultFactory::default());
        assert_eq!(result.error_report().unwrap().code, SignatureStatusCode::GeneralPayerError);
    }

    #[test]
    fn test_unexpected_failure_kind_is_general_error() {
        let lookup = DelegatingSigMetadataLookup::new()
            .with_accounts(|id| Err(LookupError::failure(KeyOrderingFailure::MissingToken, id)));
        let resolver = SigningOrderResolver::new(lookup, NoSigWaivers);
        let result = resolver.keys_for_other_parties(&txn(13257, delete_body()), &PrecheckResultFactory);
        let rejection = result.error_report().unwrap();
        assert_eq!(rejection.failure.reason, KeyOrderingFailure::GeneralError);
        assert_eq!(rejection.code, ResponseCode::Unknown);
    }

    #[test]
    fn test_crypto_delete_with_receiver_sig_required_transfer_account() {
        let resolver = SigningOrderResolver::new(known_accounts(), NoSigWaivers);
        let result = resolver.keys_for_other_parties(&txn(13257, delete_body()), &PrecheckResultFactory);
        let keys: Vec<_> = result.keys().cloned().collect();
        assert_eq!(keys, vec![KeyNode::ed25519([(1001 % 251) as u8; 32]), KeyNode::ed25519([(1002 % 251) as u8; 32])]);
    }

    #[test]
    fn test_resolver_from_config_waives_configured_payer() {
        let config = SigningConfig::from_toml_str("[waivers]\nwaived_payer_accounts = [58]\n").unwrap();
        let resolver = SigningOrderResolver::from_config(known_accounts(), &config);
        let result = resolver.keys_for_payer(&txn(58, delete_body()), &PrecheckResultFactory);
        assert!(!result.has_error_report());
        assert!(result.ordered_keys().is_empty());
    }
}
