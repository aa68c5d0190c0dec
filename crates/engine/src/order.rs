//! Resolved signing orders.

use std::collections::HashSet;

use ledger_sigs_types::{KeyList, KeyNode, LeafKey};

use crate::activation::{DefaultActivation, RevocationCharacteristics, is_key_active};

/// Which transaction a required key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeyScope {
    /// The submitted transaction itself.
    OuterTransaction,
    /// A transaction deferred inside a schedule.
    ScheduledTransaction,
}

/// How a required key is activated by signatures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyActivation {
    /// [`DefaultActivation`].
    Standard,
    /// [`RevocationCharacteristics`] for the given WACL.
    TopLevelFile(KeyList),
}

/// A key that must sign, with where it belongs and how it activates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedKey {
    /// The required key.
    pub key: KeyNode,
    /// The transaction the key signs for.
    pub scope: KeyScope,
    /// Activation rule for composite keys.
    pub activation: KeyActivation,
}

impl OrderedKey {
    /// A standard key in `scope`.
    pub fn new(key: KeyNode, scope: KeyScope) -> Self {
        Self { key, scope, activation: KeyActivation::Standard }
    }

    /// A standard key of the submitted transaction.
    pub fn outer(key: KeyNode) -> Self {
        Self::new(key, KeyScope::OuterTransaction)
    }

    /// A standard key of a scheduled transaction.
    pub fn scheduled(key: KeyNode) -> Self {
        Self::new(key, KeyScope::ScheduledTransaction)
    }

    /// Replaces the activation rule.
    #[must_use]
    pub fn with_activation(mut self, activation: KeyActivation) -> Self {
        self.activation = activation;
        self
    }

    /// Whether the key belongs to a scheduled transaction.
    #[inline]
    pub fn is_for_scheduled_txn(&self) -> bool {
        self.scope == KeyScope::ScheduledTransaction
    }

    /// Whether the leaves for which `has_sig` holds activate this key.
    pub fn is_active(&self, has_sig: impl Fn(&LeafKey) -> bool) -> bool {
        match &self.activation {
            KeyActivation::Standard => is_key_active(&self.key, &has_sig, &DefaultActivation),
            KeyActivation::TopLevelFile(wacl) => is_key_active(
                &self.key,
                &has_sig,
                &RevocationCharacteristics::for_top_level_file(wacl.clone()),
            ),
        }
    }
}

/// Drops keys equal up to decodability to an earlier key of the same scope.
///
/// Survivors keep their relative order.
pub(crate) fn dedup_within_scopes(keys: Vec<OrderedKey>) -> Vec<OrderedKey> {
    let mut seen = HashSet::with_capacity(keys.len());
    keys.into_iter().filter(|ordered| seen.insert((ordered.scope, ordered.key.canonical()))).collect()
}

/// The outcome of resolving a signing order.
///
/// `R` is the failure report chosen by the caller's
/// [`SigningOrderResultFactory`](crate::SigningOrderResultFactory).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SigningOrderResult<R> {
    /// Every required key, in signing order.
    Ordered(Vec<OrderedKey>),
    /// Resolution stopped; no keys are reported.
    Failed(R),
}

impl<R> SigningOrderResult<R> {
    /// The ordered keys; empty on failure.
    pub fn ordered_keys(&self) -> &[OrderedKey] {
        match self {
            Self::Ordered(keys) => keys,
            Self::Failed(_) => &[],
        }
    }

    /// The failure report, if resolution failed.
    pub fn error_report(&self) -> Option<&R> {
        match self {
            Self::Ordered(_) => None,
            Self::Failed(report) => Some(report),
        }
    }

    /// Whether resolution failed.
    pub fn has_error_report(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Iterates the required keys without their tags.
    pub fn keys(&self) -> impl Iterator<Item = &KeyNode> {
        self.ordered_keys().iter().map(|ordered| &ordered.key)
    }

    /// Converts into a `Result`.
    ///
    /// # Errors
    ///
    /// Returns the failure report if resolution failed.
    pub fn into_result(self) -> Result<Vec<OrderedKey>, R> {
        match self {
            Self::Ordered(keys) => Ok(keys),
            Self::Failed(report) => Err(report),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::disallowed_methods)]
mod tests {
    use ledger_sigs_types::KeyAlgorithm;

    use super::*;

    fn ed(seed: u8) -> KeyNode {
        KeyNode::ed25519([seed; 32])
    }

    fn spki(seed: u8) -> KeyNode {
        let mut bytes = vec![0x30, 0x2a, 0x30, 0x05, 0x06, 0x03, 0x2b, 0x65, 0x70, 0x03, 0x21, 0x00];
        bytes.extend_from_slice(&[seed; 32]);
        KeyNode::Leaf(LeafKey::new(KeyAlgorithm::Ed25519, bytes).unwrap())
    }

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let keys = vec![
            OrderedKey::outer(ed(1)),
            OrderedKey::outer(ed(2)),
            OrderedKey::outer(spki(1)),
            OrderedKey::outer(ed(3)),
            OrderedKey::outer(ed(2)),
        ];
        let deduped = dedup_within_scopes(keys);
        let seeds: Vec<_> = deduped.iter().map(|k| k.key.clone()).collect();
        assert_eq!(seeds, vec![ed(1), ed(2), ed(3)]);
    }

    #[test]
    fn test_dedup_preserves_scope_tags() {
        let keys = vec![
            OrderedKey::outer(ed(1)),
            OrderedKey::scheduled(ed(1)),
            OrderedKey::scheduled(ed(1)),
        ];
        let deduped = dedup_within_scopes(keys);
        assert_eq!(deduped.len(), 2);
        assert!(!deduped[0].is_for_scheduled_txn());
        assert!(deduped[1].is_for_scheduled_txn());
    }

    #[test]
    fn test_result_accessors() {
        let ok: SigningOrderResult<&str> = SigningOrderResult::Ordered(vec![OrderedKey::outer(ed(1))]);
        assert!(!ok.has_error_report());
        assert_eq!(ok.error_report(), None);
        assert_eq!(ok.keys().collect::<Vec<_>>(), vec![&ed(1)]);

        let failed: SigningOrderResult<&str> = SigningOrderResult::Failed("nope");
        assert!(failed.has_error_report());
        assert!(failed.ordered_keys().is_empty());
        assert_eq!(failed.into_result(), Err("nope"));
    }

    #[test]
    fn test_is_active_uses_activation() {
        let wacl = KeyList::new(vec![ed(1), ed(2)]).unwrap();
        let standard = OrderedKey::outer(KeyNode::from(wacl.clone()));
        let relaxed = standard.clone().with_activation(KeyActivation::TopLevelFile(wacl));
        let only_first = |leaf: &LeafKey| leaf.bytes() == [1; 32];
        assert!(!standard.is_active(only_first));
        assert!(relaxed.is_active(only_first));
    }
}
