//! Schedule creation, signing and deletion.
//!
//! The keys of a scheduled transaction are resolved by running the resolver
//! on the inner body under a synthetic scheduled id. Schedule operations are
//! themselves unschedulable, so this recursion is at most one level deep.

use ledger_sigs_state::SigMetadataLookup;
use ledger_sigs_types::{
    AccountId, KeyOrderingFailure, Transaction, TransactionBody,
    transaction::{ScheduleCreate, ScheduleDelete, ScheduleSign},
};
use tracing::debug;

use super::{KeyCollector, SigningOrderResolver, Unresolved};
use crate::{order::KeyScope, waivers::SignatureWaivers};

impl<L: SigMetadataLookup, W: SignatureWaivers> SigningOrderResolver<L, W> {
    /// The admin key and designated payer belong to the schedule operation
    /// itself; everything the inner body needs is tagged scheduled.
    pub(super) fn schedule_create(
        &self,
        txn: &Transaction,
        op: &ScheduleCreate,
        out: &mut KeyCollector,
    ) -> Result<(), Unresolved> {
        out.push_opt(op.admin_key.clone());
        if let Some(payer) = op.payer {
            let meta = self.account(payer, KeyOrderingFailure::MissingAccount)?;
            out.push(meta.key);
        }
        let effective_payer = op.payer.unwrap_or_else(|| txn.payer());
        self.scheduled_keys(txn, effective_payer, &op.scheduled, out)
    }

    /// A designated payer that has since disappeared fails the signing.
    pub(super) fn schedule_sign(
        &self,
        txn: &Transaction,
        op: &ScheduleSign,
        out: &mut KeyCollector,
    ) -> Result<(), Unresolved> {
        let meta = self.schedule(op.schedule)?;
        if let Some(payer) = meta.designated_payer {
            let payer_meta = self.account(payer, KeyOrderingFailure::MissingAccount)?;
            out.push_in(payer_meta.key, KeyScope::ScheduledTransaction);
        }
        let effective_payer = meta.designated_payer.unwrap_or_else(|| txn.payer());
        self.scheduled_keys(txn, effective_payer, &meta.scheduled_body, out)
    }

    pub(super) fn schedule_delete(
        &self,
        op: &ScheduleDelete,
        out: &mut KeyCollector,
    ) -> Result<(), Unresolved> {
        out.push_opt(self.schedule(op.schedule)?.admin_key);
        Ok(())
    }

    /// Resolves `body` as if `payer` submitted it on the schedule's behalf.
    ///
    /// Schedule operations are rejected here, which also stops a stored
    /// schedule from recursing into another.
    ///
    /// Any domain failure of the inner body is reported as unresolvable
    /// signers; lookup faults stay general errors.
    fn scheduled_keys(
        &self,
        txn: &Transaction,
        payer: AccountId,
        body: &TransactionBody,
        out: &mut KeyCollector,
    ) -> Result<(), Unresolved> {
        if !body.is_schedulable() {
            return Err(Unresolved { reason: KeyOrderingFailure::UnschedulableTransaction, entity: None });
        }
        let inner = Transaction::new(txn.id.as_scheduled(payer), body.clone());
        let keys = self
            .collect_other_parties(&inner, KeyScope::ScheduledTransaction)
            .map_err(|unresolved| {
                if unresolved.reason.is_general() {
                    return unresolved;
                }
                debug!(
                    txn = %txn.id,
                    inner = body.kind_name(),
                    reason = %unresolved.reason,
                    "Scheduled transaction has unresolvable signers"
                );
                Unresolved { reason: KeyOrderingFailure::UnresolvableRequiredSigners, ..unresolved }
            })?;
        out.extend(keys);
        Ok(())
    }
}
