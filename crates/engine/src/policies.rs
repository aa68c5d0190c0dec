//! Authorization rules for privileged operations on system entities.

use ledger_sigs_types::{
    AccountId, FileId, Transaction, TransactionBody, config::EntityNumbers,
};

/// Outcome of checking an operation against the system-op rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemOpAuthorization {
    /// The operation touches no system entity; ordinary signing applies.
    Unnecessary,
    /// The operation touches a system entity and the payer is not privileged.
    Unauthorized,
    /// The payer is privileged for this system entity.
    Authorized,
}

impl SystemOpAuthorization {
    /// Whether the payer is privileged for the operation.
    #[inline]
    pub const fn is_authorized(self) -> bool {
        matches!(self, Self::Authorized)
    }
}

/// Classifies privileged operations from the well-known entity numbers.
#[derive(Debug, Clone, Default)]
pub struct SystemOpPolicies {
    entities: EntityNumbers,
}

impl SystemOpPolicies {
    /// Creates policies over the given entity numbers.
    pub fn new(entities: EntityNumbers) -> Self {
        Self { entities }
    }

    /// The entity numbers these policies consult.
    pub fn entities(&self) -> &EntityNumbers {
        &self.entities
    }

    /// Classifies a whole transaction.
    ///
    /// Only CryptoUpdate, FileUpdate and FileAppend are ever privileged.
    pub fn check(&self, txn: &Transaction) -> SystemOpAuthorization {
        match &txn.body {
            TransactionBody::CryptoUpdate(op) => self.check_crypto_update(txn.payer(), op.account),
            TransactionBody::FileUpdate(op) => self.check_file_change(txn.payer(), op.file),
            TransactionBody::FileAppend(op) => self.check_file_change(txn.payer(), op.file),
            _ => SystemOpAuthorization::Unnecessary,
        }
    }

    /// Classifies an update of `target` paid for by `payer`.
    ///
    /// Only the treasury may touch the treasury. Superusers may touch any
    /// other system account without its key.
    pub fn check_crypto_update(&self, payer: AccountId, target: AccountId) -> SystemOpAuthorization {
        if self.entities.is_treasury(target) {
            if self.entities.is_treasury(payer) {
                SystemOpAuthorization::Authorized
            } else {
                SystemOpAuthorization::Unauthorized
            }
        } else if self.entities.is_system_account(target) && self.entities.is_superuser(payer) {
            SystemOpAuthorization::Authorized
        } else {
            SystemOpAuthorization::Unnecessary
        }
    }

    /// Classifies an update or append of `file` paid for by `payer`.
    pub fn check_file_change(&self, payer: AccountId, file: FileId) -> SystemOpAuthorization {
        if !self.entities.is_system_file(file) {
            return SystemOpAuthorization::Unnecessary;
        }
        if self.entities.is_superuser(payer) || self.is_file_admin(payer, file) {
            SystemOpAuthorization::Authorized
        } else {
            SystemOpAuthorization::Unauthorized
        }
    }

    fn is_file_admin(&self, payer: AccountId, file: FileId) -> bool {
        let entities = &self.entities;
        let files = &entities.files;
        if payer == entities.account(entities.address_book_admin) {
            files.address_book_admin_files().iter().any(|&num| file == entities.file(num))
        } else if payer == entities.account(entities.fee_schedules_admin) {
            file == entities.file(files.fee_schedules)
        } else if payer == entities.account(entities.exchange_rates_admin) {
            file == entities.file(files.exchange_rates)
        } else {
            false
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::disallowed_methods)]
mod tests {
    use chrono::{TimeZone, Utc};
    use ledger_sigs_types::{
        TransactionId,
        transaction::{CryptoUpdate, FileAppend, FileDelete, FileUpdate},
    };

    use super::*;

    fn account(num: u64) -> AccountId {
        AccountId::num_only(num)
    }

    fn file(num: u64) -> FileId {
        FileId::num_only(num)
    }

    fn policies() -> SystemOpPolicies {
        SystemOpPolicies::new(EntityNumbers::default())
    }

    fn txn(payer: u64, body: impl Into<TransactionBody>) -> Transaction {
        let id = TransactionId::builder()
            .payer(account(payer))
            .valid_start(Utc.timestamp_opt(1_600_000_000, 0).unwrap())
            .build();
        Transaction::new(id, body)
    }

    // =========================================================================
    // CryptoUpdate
    // =========================================================================

    #[test]
    fn test_treasury_update_requires_treasury_payer() {
        let policies = policies();
        assert_eq!(policies.check_crypto_update(account(2), account(2)), SystemOpAuthorization::Authorized);
        assert_eq!(policies.check_crypto_update(account(50), account(2)), SystemOpAuthorization::Unauthorized);
        assert_eq!(
            policies.check_crypto_update(account(1001), account(2)),
            SystemOpAuthorization::Unauthorized
        );
    }

    #[test]
    fn test_system_account_update_by_superuser() {
        let policies = policies();
        assert_eq!(policies.check_crypto_update(account(50), account(666)), SystemOpAuthorization::Authorized);
        assert_eq!(policies.check_crypto_update(account(2), account(666)), SystemOpAuthorization::Authorized);
        assert_eq!(
            policies.check_crypto_update(account(55), account(666)),
            SystemOpAuthorization::Unnecessary
        );
    }

    #[test]
    fn test_ordinary_account_update_unnecessary() {
        assert_eq!(
            policies().check_crypto_update(account(50), account(1001)),
            SystemOpAuthorization::Unnecessary
        );
    }

    // =========================================================================
    // File changes
    // =========================================================================

    #[test]
    fn test_file_admins_limited_to_their_files() {
        let policies = policies();
        for num in [101, 102, 121, 122, 123] {
            assert!(policies.check_file_change(account(55), file(num)).is_authorized(), "file {num}");
        }
        assert_eq!(policies.check_file_change(account(55), file(111)), SystemOpAuthorization::Unauthorized);
        assert!(policies.check_file_change(account(56), file(111)).is_authorized());
        assert_eq!(policies.check_file_change(account(56), file(112)), SystemOpAuthorization::Unauthorized);
        assert!(policies.check_file_change(account(57), file(112)).is_authorized());
    }

    #[test]
    fn test_superuser_may_change_any_system_file() {
        let policies = policies();
        assert!(policies.check_file_change(account(2), file(150)).is_authorized());
        assert!(policies.check_file_change(account(50), file(112)).is_authorized());
        assert_eq!(policies.check_file_change(account(1001), file(150)), SystemOpAuthorization::Unauthorized);
    }

    #[test]
    fn test_non_system_file_unnecessary() {
        assert_eq!(policies().check_file_change(account(50), file(7_000)), SystemOpAuthorization::Unnecessary);
    }

    #[test]
    fn test_other_shard_is_not_privileged() {
        let target = FileId::new(1, 0, 111);
        assert_eq!(policies().check_file_change(account(56), target), SystemOpAuthorization::Unnecessary);
    }

    // =========================================================================
    // Whole transactions
    // =========================================================================

    #[test]
    fn test_check_dispatches_on_body() {
        let policies = policies();
        let update = CryptoUpdate::builder().account(account(2)).build();
        assert_eq!(policies.check(&txn(2, update.clone())), SystemOpAuthorization::Authorized);
        assert_eq!(policies.check(&txn(50, update)), SystemOpAuthorization::Unauthorized);

        let file_update = FileUpdate::builder().file(file(111)).build();
        assert_eq!(policies.check(&txn(56, file_update)), SystemOpAuthorization::Authorized);
        let append = FileAppend { file: file(112), contents: vec![1] };
        assert_eq!(policies.check(&txn(56, append)), SystemOpAuthorization::Unauthorized);
    }

    #[test]
    fn test_check_ignores_other_operations() {
        let delete = FileDelete { file: file(111) };
        assert_eq!(policies().check(&txn(50, delete)), SystemOpAuthorization::Unnecessary);
    }
}
