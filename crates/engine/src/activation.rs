//! How many signatures activate a composite key.
//!
//! The resolver only names keys; deciding whether the signatures gathered
//! for a transaction satisfy a key is done against a
//! [`KeyActivationCharacteristics`]. Most keys use [`DefaultActivation`].
//! A file WACL being revoked or replaced by an equivalent copy uses
//! [`RevocationCharacteristics`], under which proving possession of any
//! single member is enough.

use ledger_sigs_types::{KeyList, KeyNode, LeafKey, ThresholdKey};

/// Signature counts required to activate composite keys.
pub trait KeyActivationCharacteristics {
    /// Active members needed for a key list.
    fn sigs_needed_for_list(&self, list: &KeyList) -> usize;

    /// Active members needed for a threshold key.
    fn sigs_needed_for_threshold(&self, threshold: &ThresholdKey) -> usize;
}

/// Lists need every member; thresholds need their threshold.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultActivation;

impl KeyActivationCharacteristics for DefaultActivation {
    fn sigs_needed_for_list(&self, list: &KeyList) -> usize {
        list.len()
    }

    fn sigs_needed_for_threshold(&self, threshold: &ThresholdKey) -> usize {
        threshold.threshold() as usize
    }
}

/// Relaxes a file's own WACL to a single signature.
///
/// A list equal up to decodability to the WACL needs one active member.
/// Every other list needs all members, and thresholds are never relaxed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevocationCharacteristics {
    wacl: KeyList,
}

impl RevocationCharacteristics {
    /// Characteristics for revoking or re-asserting `wacl`.
    pub fn for_top_level_file(wacl: KeyList) -> Self {
        Self { wacl }
    }
}

impl KeyActivationCharacteristics for RevocationCharacteristics {
    fn sigs_needed_for_list(&self, list: &KeyList) -> usize {
        if list.equal_up_to_decodability(&self.wacl) { 1 } else { list.len() }
    }

    fn sigs_needed_for_threshold(&self, threshold: &ThresholdKey) -> usize {
        threshold.threshold() as usize
    }
}

/// Whether `key` is activated by the leaves for which `has_sig` holds.
pub fn is_key_active<S, C>(key: &KeyNode, has_sig: &S, characteristics: &C) -> bool
where
    S: Fn(&LeafKey) -> bool + ?Sized,
    C: KeyActivationCharacteristics + ?Sized,
{
    let active = |keys: &KeyList| {
        keys.iter().filter(|member| is_key_active(member, has_sig, characteristics)).count()
    };
    match key {
        KeyNode::Leaf(leaf) => has_sig(leaf),
        KeyNode::List(list) => active(list) >= characteristics.sigs_needed_for_list(list),
        KeyNode::Threshold(threshold) => {
            active(threshold.keys()) >= characteristics.sigs_needed_for_threshold(threshold)
        },
    }
}
