//! Signature waivers for privileged payers.
//!
//! A waiver drops a key the resolver would otherwise require. Waivers are
//! decided from the transaction and static configuration alone; they never
//! consult ledger state.

use std::collections::BTreeSet;

use ledger_sigs_types::{AccountId, Transaction, TransactionBody, config::SigningConfig};

use crate::policies::SystemOpPolicies;

/// Decides which otherwise-required signatures may be skipped.
pub trait SignatureWaivers: Send + Sync {
    /// Whether the payer need not sign its own transaction.
    fn is_payer_sig_waived(&self, txn: &Transaction) -> bool;

    /// Whether a FileAppend may skip the file's WACL.
    fn is_append_file_wacl_waived(&self, txn: &Transaction) -> bool;

    /// Whether a FileUpdate may skip the file's current WACL.
    fn is_target_file_wacl_waived(&self, txn: &Transaction) -> bool;

    /// Whether a FileUpdate may skip the replacement WACL.
    fn is_new_file_wacl_waived(&self, txn: &Transaction) -> bool;

    /// Whether a CryptoUpdate may skip the target account's current key.
    fn is_target_account_key_waived(&self, txn: &Transaction) -> bool;

    /// Whether a CryptoUpdate may skip the replacement key.
    fn is_new_account_key_waived(&self, txn: &Transaction) -> bool;
}

/// Waives nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSigWaivers;

impl SignatureWaivers for NoSigWaivers {
    fn is_payer_sig_waived(&self, _txn: &Transaction) -> bool {
        false
    }

    fn is_append_file_wacl_waived(&self, _txn: &Transaction) -> bool {
        false
    }

    fn is_target_file_wacl_waived(&self, _txn: &Transaction) -> bool {
        false
    }

    fn is_new_file_wacl_waived(&self, _txn: &Transaction) -> bool {
        false
    }

    fn is_target_account_key_waived(&self, _txn: &Transaction) -> bool {
        false
    }

    fn is_new_account_key_waived(&self, _txn: &Transaction) -> bool {
        false
    }
}

/// Waivers derived from [`SystemOpPolicies`] and the configured waived payers.
///
/// File waivers apply only to FileUpdate and FileAppend; account waivers only
/// to CryptoUpdate. A treasury update never waives the replacement key, so
/// the new treasury key is always proven.
#[derive(Debug, Clone, Default)]
pub struct PolicyBasedSigWaivers {
    policies: SystemOpPolicies,
    waived_payers: BTreeSet<AccountId>,
}

impl PolicyBasedSigWaivers {
    /// Builds waivers from validated configuration.
    pub fn new(config: &SigningConfig) -> Self {
        let entities = &config.entities;
        let waived_payers =
            config.waivers.waived_payer_accounts.iter().map(|&num| entities.account(num)).collect();
        Self { policies: SystemOpPolicies::new(entities.clone()), waived_payers }
    }

    fn authorized_for(&self, txn: &Transaction, kind: fn(&TransactionBody) -> bool) -> bool {
        kind(&txn.body) && self.policies.check(txn).is_authorized()
    }
}

impl SignatureWaivers for PolicyBasedSigWaivers {
    fn is_payer_sig_waived(&self, txn: &Transaction) -> bool {
        self.waived_payers.contains(&txn.payer())
    }

    fn is_append_file_wacl_waived(&self, txn: &Transaction) -> bool {
        self.authorized_for(txn, |body| matches!(body, TransactionBody::FileAppend(_)))
    }

    fn is_target_file_wacl_waived(&self, txn: &Transaction) -> bool {
        self.authorized_for(txn, |body| matches!(body, TransactionBody::FileUpdate(_)))
    }

    fn is_new_file_wacl_waived(&self, txn: &Transaction) -> bool {
        self.authorized_for(txn, |body| matches!(body, TransactionBody::FileUpdate(_)))
    }

    fn is_target_account_key_waived(&self, txn: &Transaction) -> bool {
        self.authorized_for(txn, |body| matches!(body, TransactionBody::CryptoUpdate(_)))
    }

    fn is_new_account_key_waived(&self, txn: &Transaction) -> bool {
        match &txn.body {
            TransactionBody::CryptoUpdate(op) => {
                self.policies.check(txn).is_authorized()
                    && !self.policies.entities().is_treasury(op.account)
            },
            _ => false,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::disallowed_methods)]
mod tests {
    use chrono::{TimeZone, Utc};
    use ledger_sigs_types::{
        FileId, TransactionId,
        config::WaiverConfig,
        transaction::{CryptoUpdate, FileAppend, FileDelete, FileUpdate},
    };

    use super::*;

    fn txn(payer: u64, body: impl Into<TransactionBody>) -> Transaction {
        let id = TransactionId::builder()
            .payer(AccountId::num_only(payer))
            .valid_start(Utc.timestamp_opt(1_600_000_000, 0).unwrap())
            .build();
        Transaction::new(id, body)
    }

    fn crypto_update(target: u64) -> CryptoUpdate {
        CryptoUpdate::builder().account(AccountId::num_only(target)).build()
    }

    fn file_update(num: u64) -> FileUpdate {
        FileUpdate::builder().file(FileId::num_only(num)).build()
    }

    fn waivers() -> PolicyBasedSigWaivers {
        let config = SigningConfig::builder()
            .waivers(WaiverConfig::builder().waived_payer_accounts(vec![58]).build().unwrap())
            .build()
            .unwrap();
        PolicyBasedSigWaivers::new(&config)
    }

    #[test]
    fn test_payer_waiver_uses_configured_accounts() {
        let waivers = waivers();
        assert!(waivers.is_payer_sig_waived(&txn(58, file_update(7_000))));
        assert!(!waivers.is_payer_sig_waived(&txn(50, file_update(7_000))));
    }

    #[test]
    fn test_treasury_self_update_waives_only_target_key() {
        let waivers = waivers();
        let update = txn(2, crypto_update(2));
        assert!(waivers.is_target_account_key_waived(&update));
        assert!(!waivers.is_new_account_key_waived(&update));
    }

    #[test]
    fn test_superuser_system_account_update_waives_both_keys() {
        let waivers = waivers();
        let update = txn(50, crypto_update(666));
        assert!(waivers.is_target_account_key_waived(&update));
        assert!(waivers.is_new_account_key_waived(&update));
    }

    #[test]
    fn test_non_privileged_update_waives_nothing() {
        let waivers = waivers();
        for update in [txn(1001, crypto_update(2)), txn(1001, crypto_update(666)), txn(50, crypto_update(1001))] {
            assert!(!waivers.is_target_account_key_waived(&update));
            assert!(!waivers.is_new_account_key_waived(&update));
        }
    }

    #[test]
    fn test_file_waivers_apply_to_matching_body_only() {
        let waivers = waivers();
        let update = txn(56, file_update(111));
        assert!(waivers.is_target_file_wacl_waived(&update));
        assert!(waivers.is_new_file_wacl_waived(&update));
        assert!(!waivers.is_append_file_wacl_waived(&update));

        let append = txn(56, FileAppend { file: FileId::num_only(111), contents: vec![1] });
        assert!(waivers.is_append_file_wacl_waived(&append));
        assert!(!waivers.is_target_file_wacl_waived(&append));

        let delete = txn(50, FileDelete { file: FileId::num_only(111) });
        assert!(!waivers.is_append_file_wacl_waived(&delete));
        assert!(!waivers.is_target_file_wacl_waived(&delete));
    }

    #[test]
    fn test_no_sig_waivers() {
        let update = txn(2, crypto_update(2));
        assert!(!NoSigWaivers.is_payer_sig_waived(&update));
        assert!(!NoSigWaivers.is_target_account_key_waived(&update));
    }
}
