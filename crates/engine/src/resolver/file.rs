//! File creation, append, update and deletion.
//!
//! An immutable file has no WACL and contributes no keys; whether it may be
//! changed at all is decided when the transaction is handled.

use ledger_sigs_state::SigMetadataLookup;
use ledger_sigs_types::{
    Transaction,
    transaction::{FileAppend, FileCreate, FileDelete, FileUpdate},
};

use super::{KeyCollector, SigningOrderResolver, Unresolved};
use crate::{order::KeyActivation, waivers::SignatureWaivers};

impl<L: SigMetadataLookup, W: SignatureWaivers> SigningOrderResolver<L, W> {
    pub(super) fn file_create(op: &FileCreate, out: &mut KeyCollector) {
        if let Some(wacl) = &op.keys {
            out.push_wacl(wacl.clone(), KeyActivation::Standard);
        }
    }

    pub(super) fn file_append(
        &self,
        txn: &Transaction,
        op: &FileAppend,
        out: &mut KeyCollector,
    ) -> Result<(), Unresolved> {
        if self.waivers.is_append_file_wacl_waived(txn) {
            return Ok(());
        }
        if let Some(wacl) = self.file(op.file)?.wacl {
            out.push_wacl(wacl, KeyActivation::Standard);
        }
        Ok(())
    }

    /// The current WACL activates with a single signature when the update
    /// re-asserts an equivalent WACL, so it carries the replacement.
    pub(super) fn file_update(
        &self,
        txn: &Transaction,
        op: &FileUpdate,
        out: &mut KeyCollector,
    ) -> Result<(), Unresolved> {
        if !self.waivers.is_target_file_wacl_waived(txn) {
            let Some(current) = self.file(op.file)?.wacl else {
                return Ok(());
            };
            let activation = match &op.keys {
                Some(replacement) => KeyActivation::TopLevelFile(replacement.clone()),
                None => KeyActivation::Standard,
            };
            out.push_wacl(current, activation);
        }
        if !self.waivers.is_new_file_wacl_waived(txn) {
            if let Some(replacement) = &op.keys {
                out.push_wacl(replacement.clone(), KeyActivation::Standard);
            }
        }
        Ok(())
    }

    pub(super) fn file_delete(
        &self,
        op: &FileDelete,
        out: &mut KeyCollector,
    ) -> Result<(), Unresolved> {
        if let Some(wacl) = self.file(op.file)?.wacl {
            out.push_wacl(wacl.clone(), KeyActivation::TopLevelFile(wacl));
        }
        Ok(())
    }
}
