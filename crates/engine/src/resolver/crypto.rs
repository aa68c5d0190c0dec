//! Account creation, transfer, update and deletion.

use ledger_sigs_state::SigMetadataLookup;
use ledger_sigs_types::{
    AccountId, KeyOrderingFailure, Transaction,
    transaction::{CryptoCreate, CryptoDelete, CryptoTransfer, CryptoUpdate},
};

use super::{KeyCollector, SigningOrderResolver, Unresolved};
use crate::waivers::SignatureWaivers;

impl<L: SigMetadataLookup, W: SignatureWaivers> SigningOrderResolver<L, W> {
    pub(super) fn crypto_create(op: &CryptoCreate, out: &mut KeyCollector) {
        if op.receiver_sig_required {
            out.push(op.key.clone());
        }
    }

    /// Senders sign unconditionally and come first; receivers sign only
    /// when they require it. A zero adjustment counts as a receiver. Every
    /// party must exist.
    pub(super) fn crypto_transfer(
        &self,
        op: &CryptoTransfer,
        out: &mut KeyCollector,
    ) -> Result<(), Unresolved> {
        let mut senders = Vec::new();
        let mut receivers = Vec::new();
        let mut sort = |account: AccountId, amount: i64| {
            if amount < 0 {
                senders.push(account);
            } else {
                receivers.push(account);
            }
        };
        for adjust in &op.transfers {
            sort(adjust.account, adjust.amount);
        }
        for list in &op.token_transfers {
            for adjust in &list.transfers {
                sort(adjust.account, adjust.amount);
            }
            for nft in &list.nft_transfers {
                sort(nft.sender, -1);
                sort(nft.receiver, 1);
            }
        }

        for sender in senders {
            let meta = self.account(sender, KeyOrderingFailure::MissingAccount)?;
            out.push(meta.key);
        }
        for receiver in receivers {
            let meta = self.account(receiver, KeyOrderingFailure::MissingAccount)?;
            if meta.receiver_sig_required {
                out.push(meta.key);
            }
        }
        Ok(())
    }

    pub(super) fn crypto_update(
        &self,
        txn: &Transaction,
        op: &CryptoUpdate,
        out: &mut KeyCollector,
    ) -> Result<(), Unresolved> {
        if !self.waivers.is_target_account_key_waived(txn) {
            let meta = self.account(op.account, KeyOrderingFailure::MissingAccount)?;
            out.push(meta.key);
        }
        if !self.waivers.is_new_account_key_waived(txn) {
            out.push_opt(op.key.clone());
        }
        Ok(())
    }

    pub(super) fn crypto_delete(
        &self,
        op: &CryptoDelete,
        out: &mut KeyCollector,
    ) -> Result<(), Unresolved> {
        let target = self.account(op.account, KeyOrderingFailure::MissingAccount)?;
        out.push(target.key);
        let beneficiary = self.account(op.transfer_account, KeyOrderingFailure::MissingAccount)?;
        if beneficiary.receiver_sig_required {
            out.push(beneficiary.key);
        }
        Ok(())
    }
}
