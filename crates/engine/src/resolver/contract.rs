//! Contract creation, update and deletion.

use ledger_sigs_state::SigMetadataLookup;
use ledger_sigs_types::{
    ContractId, KeyNode, KeyOrderingFailure,
    transaction::{ContractCreate, ContractDelete, ContractUpdate, Obtainer},
};

use super::{KeyCollector, SigningOrderResolver, Unresolved};
use crate::waivers::SignatureWaivers;

/// A legacy contract-id key can never sign, so it is never required.
fn usable(key: Option<&KeyNode>) -> Option<KeyNode> {
    key.filter(|key| !key.is_deprecated_contract_key()).cloned()
}

impl<L: SigMetadataLookup, W: SignatureWaivers> SigningOrderResolver<L, W> {
    pub(super) fn contract_create(op: &ContractCreate, out: &mut KeyCollector) {
        out.push_opt(usable(op.admin_key.as_ref()));
    }

    pub(super) fn contract_update(
        &self,
        op: &ContractUpdate,
        out: &mut KeyCollector,
    ) -> Result<(), Unresolved> {
        if op.needs_current_admin_sig() {
            self.current_contract_admin(op.contract, out)?;
        }
        out.push_opt(usable(op.admin_key.as_ref()));
        Ok(())
    }

    pub(super) fn contract_delete(
        &self,
        op: &ContractDelete,
        out: &mut KeyCollector,
    ) -> Result<(), Unresolved> {
        self.current_contract_admin(op.contract, out)?;
        match op.obtainer {
            Some(Obtainer::Account(account)) => {
                let meta = self.account(account, KeyOrderingFailure::MissingAccount)?;
                if meta.receiver_sig_required {
                    out.push(meta.key);
                }
            },
            Some(Obtainer::Contract(contract)) => {
                let meta = self.contract(contract)?;
                if meta.receiver_sig_required {
                    out.push_opt(meta.admin_key().cloned());
                }
            },
            None => {},
        }
        Ok(())
    }

    fn current_contract_admin(
        &self,
        contract: ContractId,
        out: &mut KeyCollector,
    ) -> Result<(), Unresolved> {
        let meta = self.contract(contract)?;
        let Some(admin) = meta.admin_key() else {
            return Err(Unresolved::new(KeyOrderingFailure::ImmutableContract, contract));
        };
        out.push(admin.clone());
        Ok(())
    }
}
