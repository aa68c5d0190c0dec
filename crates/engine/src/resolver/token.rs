//! Token lifecycle, role-key and fee schedule operations.

use ledger_sigs_state::{SigMetadataLookup, TokenSigningMetadata};
use ledger_sigs_types::{
    KeyNode, KeyOrderingFailure, TokenId,
    transaction::{
        CustomFee, CustomFeeKind, TokenAssociation, TokenCreate, TokenFeeScheduleUpdate,
        TokenUpdate,
    },
};

use super::{KeyCollector, SigningOrderResolver, Unresolved};
use crate::waivers::SignatureWaivers;

impl<L: SigMetadataLookup, W: SignatureWaivers> SigningOrderResolver<L, W> {
    pub(super) fn token_create(
        &self,
        op: &TokenCreate,
        out: &mut KeyCollector,
    ) -> Result<(), Unresolved> {
        let treasury = self.account(op.treasury, KeyOrderingFailure::MissingAccount)?;
        out.push(treasury.key);
        if let Some(account) = op.auto_renew_account {
            let meta = self.account(account, KeyOrderingFailure::InvalidAutoRenewAccount)?;
            out.push(meta.key);
        }
        out.push_opt(op.admin_key.clone());
        self.fee_collectors(&op.custom_fees, TokenId::is_sentinel, out)
    }

    /// A token without an admin key cannot be updated, so nothing signs.
    pub(super) fn token_update(
        &self,
        op: &TokenUpdate,
        out: &mut KeyCollector,
    ) -> Result<(), Unresolved> {
        let Some(admin) = self.token(op.token)?.admin_key else {
            return Ok(());
        };
        out.push(admin);
        if let Some(treasury) = op.treasury {
            let meta = self.account(treasury, KeyOrderingFailure::MissingAccount)?;
            out.push(meta.key);
        }
        if let Some(account) = op.auto_renew_account {
            let meta = self.account(account, KeyOrderingFailure::InvalidAutoRenewAccount)?;
            out.push(meta.key);
        }
        out.push_opt(op.admin_key.clone());
        Ok(())
    }

    /// Requires whichever role key `role` selects, if the token has one.
    pub(super) fn token_role_key(
        &self,
        token: TokenId,
        role: impl FnOnce(TokenSigningMetadata) -> Option<KeyNode>,
        out: &mut KeyCollector,
    ) -> Result<(), Unresolved> {
        out.push_opt(role(self.token(token)?));
        Ok(())
    }

    pub(super) fn token_association(
        &self,
        op: &TokenAssociation,
        out: &mut KeyCollector,
    ) -> Result<(), Unresolved> {
        let meta = self.account(op.account, KeyOrderingFailure::MissingAccount)?;
        out.push(meta.key);
        Ok(())
    }

    /// Without a fee-schedule key the schedule is frozen and collectors are
    /// never consulted.
    pub(super) fn token_fee_schedule_update(
        &self,
        op: &TokenFeeScheduleUpdate,
        out: &mut KeyCollector,
    ) -> Result<(), Unresolved> {
        let Some(fee_schedule_key) = self.token(op.token)?.fee_schedule_key else {
            return Ok(());
        };
        out.push(fee_schedule_key);
        let token = op.token;
        self.fee_collectors(&op.custom_fees, |denom| denom == token || denom.is_sentinel(), out)
    }

    /// Collectors of fees charged in the token itself must always sign;
    /// others only if they require receiver signatures.
    fn fee_collectors(
        &self,
        fees: &[CustomFee],
        is_this_token: impl Fn(TokenId) -> bool,
        out: &mut KeyCollector,
    ) -> Result<(), Unresolved> {
        for fee in fees {
            let always = match &fee.kind {
                CustomFeeKind::Fractional(_) => true,
                CustomFeeKind::Fixed(fixed) => fixed.denominating_token.is_some_and(&is_this_token),
                CustomFeeKind::Royalty(royalty) => royalty
                    .fallback
                    .and_then(|fallback| fallback.denominating_token)
                    .is_some_and(&is_this_token),
            };
            let meta = self.account(fee.collector, KeyOrderingFailure::InvalidFeeCollector)?;
            if always || meta.receiver_sig_required {
                out.push(meta.key);
            }
        }
        Ok(())
    }
}
