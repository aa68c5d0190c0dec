//! Deterministic fixture keys.
//!
//! Keys are derived from a label with SHA-256, so the same label always yields
//! the same key and distinct labels never collide in practice.

// Fixtures are expected to panic on malformed setup
#![allow(clippy::expect_used)]

use ledger_sigs_types::{KeyList, KeyNode, LeafKey};
use sha2::{Digest, Sha256};

/// Returns the ed25519 leaf for `label`.
#[must_use]
pub fn fixture_leaf(label: &str) -> LeafKey {
    let digest: [u8; 32] = Sha256::digest(label.as_bytes()).into();
    LeafKey::ed25519(digest)
}

/// Returns the ed25519 key node for `label`.
#[must_use]
pub fn fixture_key(label: &str) -> KeyNode {
    KeyNode::Leaf(fixture_leaf(label))
}

/// Returns a key list holding one fixture key per label.
///
/// # Panics
///
/// Panics if `labels` is empty.
#[must_use]
pub fn fixture_list(labels: &[&str]) -> KeyList {
    KeyList::new(labels.iter().map(|label| fixture_key(label)).collect())
        .expect("fixture key list must not be empty")
}

/// Returns a threshold key over one fixture key per label.
///
/// # Panics
///
/// Panics if `threshold` is zero or exceeds the number of labels.
#[must_use]
pub fn fixture_threshold(threshold: u32, labels: &[&str]) -> KeyNode {
    KeyNode::threshold(threshold, labels.iter().map(|label| fixture_key(label)).collect())
        .expect("fixture threshold must be satisfiable")
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::disallowed_methods)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_key_is_deterministic() {
        assert_eq!(fixture_key("misc"), fixture_key("misc"));
        assert_ne!(fixture_key("misc"), fixture_key("receiver-sig"));
    }

    #[test]
    fn test_fixture_list_preserves_label_order() {
        let list = fixture_list(&["a", "b", "c"]);
        assert_eq!(list.len(), 3);
        assert_eq!(list.keys()[0], fixture_key("a"));
        assert_eq!(list.keys()[2], fixture_key("c"));
    }

    #[test]
    fn test_fixture_threshold() {
        let key = fixture_threshold(2, &["a", "b", "c"]);
        assert_eq!(key.leaf_count(), 3);
        match key {
            KeyNode::Threshold(threshold) => assert_eq!(threshold.threshold(), 2),
            other => panic!("expected threshold, got {other:?}"),
        }
    }
}
