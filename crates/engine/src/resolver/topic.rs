//! Consensus topic operations.

use ledger_sigs_state::SigMetadataLookup;
use ledger_sigs_types::{
    KeyOrderingFailure,
    transaction::{SubmitMessage, TopicCreate, TopicDelete, TopicUpdate},
};

use super::{KeyCollector, SigningOrderResolver, Unresolved};
use crate::waivers::SignatureWaivers;

impl<L: SigMetadataLookup, W: SignatureWaivers> SigningOrderResolver<L, W> {
    pub(super) fn topic_create(
        &self,
        op: &TopicCreate,
        out: &mut KeyCollector,
    ) -> Result<(), Unresolved> {
        out.push_opt(op.admin_key.clone());
        if let Some(account) = op.auto_renew_account {
            let meta = self.account(account, KeyOrderingFailure::MissingAutoRenewAccount)?;
            out.push(meta.key);
        }
        Ok(())
    }

    /// Anyone may extend a topic's expiry.
    pub(super) fn topic_update(
        &self,
        op: &TopicUpdate,
        out: &mut KeyCollector,
    ) -> Result<(), Unresolved> {
        if op.is_expiry_only() {
            return Ok(());
        }
        let meta = self.topic(op.topic)?;
        out.push_opt(meta.admin_key);
        out.push_opt(op.admin_key.clone());
        if let Some(account) = op.auto_renew_account.filter(|account| !account.is_sentinel()) {
            let meta = self.account(account, KeyOrderingFailure::MissingAutoRenewAccount)?;
            out.push(meta.key);
        }
        Ok(())
    }

    pub(super) fn topic_delete(
        &self,
        op: &TopicDelete,
        out: &mut KeyCollector,
    ) -> Result<(), Unresolved> {
        out.push_opt(self.topic(op.topic)?.admin_key);
        Ok(())
    }

    pub(super) fn submit_message(
        &self,
        op: &SubmitMessage,
        out: &mut KeyCollector,
    ) -> Result<(), Unresolved> {
        out.push_opt(self.topic(op.topic)?.submit_key);
        Ok(())
    }
}
