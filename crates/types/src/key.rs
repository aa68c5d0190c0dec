//! Recursive key model for signing requirements.
//!
//! A [`KeyNode`] is either a single public key ([`LeafKey`]), a list whose
//! members must all sign ([`KeyList`]), or a threshold over its members
//! ([`ThresholdKey`]). Every constructor is checked, and deserialization
//! goes through the same checks, so an empty list, an out-of-range
//! threshold, or a tree deeper than [`MAX_KEY_DEPTH`] cannot exist.
//!
//! # Wire Format
//!
//! Keys serialize as a flat pre-order sequence of nodes. Decoding walks the
//! sequence with an explicit depth bound, so hostile input can never recurse
//! deeper than [`MAX_KEY_DEPTH`] frames.
//!
//! # Equality
//!
//! Derived `PartialEq` compares bytes. Revocation and deduplication use
//! [`KeyNode::equal_up_to_decodability`], which first reduces legacy leaf
//! encodings to their canonical form:
//!
//! | Algorithm | Legacy form | Canonical form |
//! |-----------|-------------|----------------|
//! | Ed25519 | 44-byte DER SubjectPublicKeyInfo | 32-byte raw key |
//! | ECDSA secp256k1 | 65-byte uncompressed point | 33-byte compressed point |

use std::{borrow::Cow, fmt};

use serde::{Deserialize, Serialize};
use snafu::{OptionExt, Snafu, ensure};

use crate::types::ContractId;

/// Maximum height of a key tree. A lone leaf has height 1.
pub const MAX_KEY_DEPTH: usize = 15;

/// DER prefix of an Ed25519 SubjectPublicKeyInfo wrapping a 32-byte key.
const ED25519_SPKI_PREFIX: [u8; 12] =
    [0x30, 0x2a, 0x30, 0x05, 0x06, 0x03, 0x2b, 0x65, 0x70, 0x03, 0x21, 0x00];

const ED25519_KEY_LEN: usize = 32;
const SECP256K1_UNCOMPRESSED_LEN: usize = 65;
const SECP256K1_COORD_LEN: usize = 32;

/// Errors constructing or decoding a key.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub))]
pub enum KeyError {
    /// A leaf carried no key material.
    #[snafu(display("Leaf key for {algorithm:?} has an empty payload"))]
    EmptyLeaf {
        /// Algorithm of the rejected leaf.
        algorithm: KeyAlgorithm,
    },

    /// A list or threshold had no children.
    #[snafu(display("Key lists must contain at least one key"))]
    EmptyList,

    /// A threshold was zero or exceeded its child count.
    #[snafu(display("Threshold {threshold} out of range for {len} keys"))]
    ThresholdOutOfRange {
        /// Declared threshold.
        threshold: u32,
        /// Number of children.
        len: usize,
    },

    /// The key tree exceeded [`MAX_KEY_DEPTH`].
    #[snafu(display("Key tree exceeds maximum depth of {max}"))]
    TooDeep {
        /// The configured maximum.
        max: usize,
    },

    /// The encoded node sequence ended before the tree was complete.
    #[snafu(display("Encoded key ended before the tree was complete"))]
    Truncated,

    /// The encoded node sequence had nodes left over after the tree.
    #[snafu(display("Encoded key has {count} trailing nodes"))]
    TrailingNodes {
        /// Number of unused nodes.
        count: usize,
    },

    /// A key list was expected but a leaf or threshold was found.
    #[snafu(display("Expected a key list"))]
    NotAList,
}

// ============================================================================
// Leaf Keys
// ============================================================================

/// Signature algorithm of a leaf key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum KeyAlgorithm {
    /// Ed25519 public key.
    Ed25519,
    /// ECDSA public key on secp256k1.
    EcdsaSecp256k1,
    /// ECDSA public key on P-384.
    EcdsaP384,
    /// RSA-3072 public key.
    Rsa3072,
    /// Legacy marker naming a contract as its own admin key.
    ///
    /// Never satisfiable by a signature; treated as "no admin key" wherever
    /// an admin key would be required.
    ContractId,
}

impl KeyAlgorithm {
    /// Short lowercase name used in log output.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ed25519 => "ed25519",
            Self::EcdsaSecp256k1 => "secp256k1",
            Self::EcdsaP384 => "p384",
            Self::Rsa3072 => "rsa3072",
            Self::ContractId => "contract",
        }
    }
}

/// A single public key payload tagged with its algorithm.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawLeafKey")]
pub struct LeafKey {
    algorithm: KeyAlgorithm,
    bytes: Vec<u8>,
}

#[derive(Deserialize)]
struct RawLeafKey {
    algorithm: KeyAlgorithm,
    bytes: Vec<u8>,
}

impl TryFrom<RawLeafKey> for LeafKey {
    type Error = KeyError;

    fn try_from(raw: RawLeafKey) -> Result<Self, Self::Error> {
        Self::new(raw.algorithm, raw.bytes)
    }
}

impl LeafKey {
    /// Creates a leaf key.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::EmptyLeaf`] if `bytes` is empty.
    pub fn new(algorithm: KeyAlgorithm, bytes: impl Into<Vec<u8>>) -> Result<Self, KeyError> {
        let bytes = bytes.into();
        ensure!(!bytes.is_empty(), EmptyLeafSnafu { algorithm });
        Ok(Self { algorithm, bytes })
    }

    /// Creates a raw 32-byte Ed25519 leaf.
    pub fn ed25519(bytes: [u8; ED25519_KEY_LEN]) -> Self {
        Self { algorithm: KeyAlgorithm::Ed25519, bytes: bytes.to_vec() }
    }

    /// Creates the legacy leaf naming `contract` as its own admin key.
    pub fn contract_id(contract: ContractId) -> Self {
        let mut bytes = Vec::with_capacity(24);
        bytes.extend_from_slice(&contract.shard.to_be_bytes());
        bytes.extend_from_slice(&contract.realm.to_be_bytes());
        bytes.extend_from_slice(&contract.num.to_be_bytes());
        Self { algorithm: KeyAlgorithm::ContractId, bytes }
    }

    /// Returns the algorithm tag.
    #[inline]
    pub fn algorithm(&self) -> KeyAlgorithm {
        self.algorithm
    }

    /// Returns the payload exactly as supplied.
    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the contract named by a legacy contract-id leaf.
    pub fn as_contract_id(&self) -> Option<ContractId> {
        if self.algorithm != KeyAlgorithm::ContractId || self.bytes.len() != 24 {
            return None;
        }
        let read = |offset: usize| -> Option<u64> {
            self.bytes.get(offset..offset + 8)?.try_into().ok().map(u64::from_be_bytes)
        };
        Some(ContractId::new(read(0)?, read(8)?, read(16)?))
    }

    /// Returns the payload with legacy encodings reduced to canonical form.
    pub fn canonical_bytes(&self) -> Cow<'_, [u8]> {
        match self.algorithm {
            KeyAlgorithm::Ed25519
                if self.bytes.len() == ED25519_SPKI_PREFIX.len() + ED25519_KEY_LEN
                    && self.bytes.starts_with(&ED25519_SPKI_PREFIX) =>
            {
                Cow::Borrowed(&self.bytes[ED25519_SPKI_PREFIX.len()..])
            },
            KeyAlgorithm::EcdsaSecp256k1
                if self.bytes.len() == SECP256K1_UNCOMPRESSED_LEN && self.bytes[0] == 0x04 =>
            {
                let x = &self.bytes[1..=SECP256K1_COORD_LEN];
                let y_parity = self.bytes[SECP256K1_UNCOMPRESSED_LEN - 1] & 1;
                let mut compressed = Vec::with_capacity(1 + SECP256K1_COORD_LEN);
                compressed.push(0x02 | y_parity);
                compressed.extend_from_slice(x);
                Cow::Owned(compressed)
            },
            _ => Cow::Borrowed(&self.bytes),
        }
    }

    /// Returns a copy of this leaf in canonical encoding.
    #[must_use]
    pub fn canonical(&self) -> Self {
        Self { algorithm: self.algorithm, bytes: self.canonical_bytes().into_owned() }
    }

    /// Whether both leaves decode to the same key.
    pub fn equal_up_to_decodability(&self, other: &Self) -> bool {
        self.algorithm == other.algorithm && self.canonical_bytes() == other.canonical_bytes()
    }
}

impl fmt::Display for LeafKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let canonical = self.canonical_bytes();
        let shown = &canonical[..canonical.len().min(6)];
        write!(f, "{}:{}", self.algorithm.as_str(), hex::encode(shown))?;
        if canonical.len() > shown.len() {
            write!(f, "..")?;
        }
        Ok(())
    }
}

// ============================================================================
// Composite Keys
// ============================================================================

/// An ordered, non-empty list of keys that must all sign.
///
/// Serialized as a [`KeyNode`] whose root is a list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "KeyNode", into = "KeyNode")]
pub struct KeyList {
    keys: Vec<KeyNode>,
}

impl KeyList {
    /// Creates a key list.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::EmptyList`] for no keys, or [`KeyError::TooDeep`]
    /// if the resulting tree would exceed [`MAX_KEY_DEPTH`].
    pub fn new(keys: Vec<KeyNode>) -> Result<Self, KeyError> {
        ensure!(!keys.is_empty(), EmptyListSnafu);
        let child_depth = keys.iter().map(KeyNode::depth).max().unwrap_or(0);
        ensure!(child_depth < MAX_KEY_DEPTH, TooDeepSnafu { max: MAX_KEY_DEPTH });
        Ok(Self { keys })
    }

    /// Returns the members in declaration order.
    #[inline]
    pub fn keys(&self) -> &[KeyNode] {
        &self.keys
    }

    /// Number of members.
    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Always false; kept for API symmetry with `len`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Iterates over the members in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, KeyNode> {
        self.keys.iter()
    }

    /// Consumes the list, returning its members.
    pub fn into_keys(self) -> Vec<KeyNode> {
        self.keys
    }

    fn depth(&self) -> usize {
        1 + self.keys.iter().map(KeyNode::depth).max().unwrap_or(0)
    }

    /// Whether both lists have the same length and pairwise-equal members
    /// up to decodability.
    pub fn equal_up_to_decodability(&self, other: &Self) -> bool {
        self.keys.len() == other.keys.len()
            && self.keys.iter().zip(&other.keys).all(|(a, b)| a.equal_up_to_decodability(b))
    }

    fn canonical(&self) -> Self {
        Self { keys: self.keys.iter().map(KeyNode::canonical).collect() }
    }
}

impl<'a> IntoIterator for &'a KeyList {
    type Item = &'a KeyNode;
    type IntoIter = std::slice::Iter<'a, KeyNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.iter()
    }
}

/// Requires at least `threshold` of its members to sign.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ThresholdKey {
    threshold: u32,
    keys: KeyList,
}

impl ThresholdKey {
    /// Creates a threshold key.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::ThresholdOutOfRange`] unless
    /// `1 <= threshold <= keys.len()`, plus any error from [`KeyList::new`].
    pub fn new(threshold: u32, keys: Vec<KeyNode>) -> Result<Self, KeyError> {
        let keys = KeyList::new(keys)?;
        let len = keys.len();
        ensure!(
            threshold >= 1 && usize::try_from(threshold).is_ok_and(|t| t <= len),
            ThresholdOutOfRangeSnafu { threshold, len }
        );
        Ok(Self { threshold, keys })
    }

    /// Minimum number of members that must sign.
    #[inline]
    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// The members, in declaration order.
    #[inline]
    pub fn keys(&self) -> &KeyList {
        &self.keys
    }
}

// ============================================================================
// KeyNode
// ============================================================================

/// A signing requirement: a leaf key, a key list, or a threshold key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "WireKey", into = "WireKey")]
pub enum KeyNode {
    /// A single public key.
    Leaf(LeafKey),
    /// All members must sign.
    List(KeyList),
    /// At least `threshold` members must sign.
    Threshold(ThresholdKey),
}

impl KeyNode {
    /// Creates a raw Ed25519 leaf node.
    pub fn ed25519(bytes: [u8; ED25519_KEY_LEN]) -> Self {
        Self::Leaf(LeafKey::ed25519(bytes))
    }

    /// Creates a list node.
    ///
    /// # Errors
    ///
    /// See [`KeyList::new`].
    pub fn list(keys: Vec<KeyNode>) -> Result<Self, KeyError> {
        KeyList::new(keys).map(Self::List)
    }

    /// Creates a threshold node.
    ///
    /// # Errors
    ///
    /// See [`ThresholdKey::new`].
    pub fn threshold(threshold: u32, keys: Vec<KeyNode>) -> Result<Self, KeyError> {
        ThresholdKey::new(threshold, keys).map(Self::Threshold)
    }

    /// Height of the tree; a lone leaf has height 1.
    pub fn depth(&self) -> usize {
        match self {
            Self::Leaf(_) => 1,
            Self::List(list) => list.depth(),
            Self::Threshold(threshold) => threshold.keys.depth(),
        }
    }

    /// Number of leaves in the tree.
    pub fn leaf_count(&self) -> usize {
        match self {
            Self::Leaf(_) => 1,
            Self::List(list) => list.iter().map(Self::leaf_count).sum(),
            Self::Threshold(threshold) => threshold.keys.iter().map(Self::leaf_count).sum(),
        }
    }

    /// Whether this is the legacy contract-id admin marker.
    pub fn is_deprecated_contract_key(&self) -> bool {
        matches!(self, Self::Leaf(leaf) if leaf.algorithm == KeyAlgorithm::ContractId)
    }

    /// Returns the same tree with every leaf in canonical encoding.
    #[must_use]
    pub fn canonical(&self) -> Self {
        match self {
            Self::Leaf(leaf) => Self::Leaf(leaf.canonical()),
            Self::List(list) => Self::List(list.canonical()),
            Self::Threshold(t) => {
                Self::Threshold(ThresholdKey { threshold: t.threshold, keys: t.keys.canonical() })
            },
        }
    }

    /// Whether both trees have the same shape and thresholds, and their
    /// leaves decode to the same keys.
    pub fn equal_up_to_decodability(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Leaf(a), Self::Leaf(b)) => a.equal_up_to_decodability(b),
            (Self::List(a), Self::List(b)) => a.equal_up_to_decodability(b),
            (Self::Threshold(a), Self::Threshold(b)) => {
                a.threshold == b.threshold && a.keys.equal_up_to_decodability(&b.keys)
            },
            _ => false,
        }
    }
}

impl From<LeafKey> for KeyNode {
    fn from(leaf: LeafKey) -> Self {
        Self::Leaf(leaf)
    }
}

impl From<KeyList> for KeyNode {
    fn from(list: KeyList) -> Self {
        Self::List(list)
    }
}

impl TryFrom<KeyNode> for KeyList {
    type Error = KeyError;

    fn try_from(key: KeyNode) -> Result<Self, Self::Error> {
        match key {
            KeyNode::List(list) => Ok(list),
            KeyNode::Leaf(_) | KeyNode::Threshold(_) => Err(KeyError::NotAList),
        }
    }
}

impl From<ThresholdKey> for KeyNode {
    fn from(threshold: ThresholdKey) -> Self {
        Self::Threshold(threshold)
    }
}

impl fmt::Display for KeyNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn write_members(f: &mut fmt::Formatter<'_>, list: &KeyList) -> fmt::Result {
            write!(f, "[")?;
            for (i, key) in list.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}")?;
            }
            write!(f, "]")
        }

        match self {
            Self::Leaf(leaf) => write!(f, "{leaf}"),
            Self::List(list) => write_members(f, list),
            Self::Threshold(t) => {
                write!(f, "{}-of-", t.threshold)?;
                write_members(f, &t.keys)
            },
        }
    }
}

// ============================================================================
// Wire Encoding
// ============================================================================

/// One node of the flat pre-order encoding.
#[derive(Debug, Clone, Serialize, Deserialize)]
enum WireNode {
    Leaf(LeafKey),
    List { children: u32 },
    Threshold { threshold: u32, children: u32 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
struct WireKey(Vec<WireNode>);

impl From<KeyNode> for WireKey {
    fn from(key: KeyNode) -> Self {
        fn flatten(key: &KeyNode, out: &mut Vec<WireNode>) {
            // Constructors cap children well below u32::MAX in practice.
            let count = |list: &KeyList| u32::try_from(list.len()).unwrap_or(u32::MAX);
            match key {
                KeyNode::Leaf(leaf) => out.push(WireNode::Leaf(leaf.clone())),
                KeyNode::List(list) => {
                    out.push(WireNode::List { children: count(list) });
                    list.iter().for_each(|child| flatten(child, out));
                },
                KeyNode::Threshold(t) => {
                    out.push(WireNode::Threshold {
                        threshold: t.threshold,
                        children: count(&t.keys),
                    });
                    t.keys.iter().for_each(|child| flatten(child, out));
                },
            }
        }

        let mut nodes = Vec::with_capacity(key.leaf_count() * 2);
        flatten(&key, &mut nodes);
        Self(nodes)
    }
}

impl TryFrom<WireKey> for KeyNode {
    type Error = KeyError;

    fn try_from(wire: WireKey) -> Result<Self, Self::Error> {
        fn build(nodes: &[WireNode], cursor: &mut usize, depth: usize) -> Result<KeyNode, KeyError> {
            ensure!(depth <= MAX_KEY_DEPTH, TooDeepSnafu { max: MAX_KEY_DEPTH });
            let node = nodes.get(*cursor).context(TruncatedSnafu)?;
            *cursor += 1;
            let mut children = |count: u32| {
                (0..count).map(|_| build(nodes, cursor, depth + 1)).collect::<Result<Vec<_>, _>>()
            };
            match node {
                WireNode::Leaf(leaf) => Ok(KeyNode::Leaf(leaf.clone())),
                WireNode::List { children: count } => KeyNode::list(children(*count)?),
                WireNode::Threshold { threshold, children: count } => {
                    KeyNode::threshold(*threshold, children(*count)?)
                },
            }
        }

        let mut cursor = 0;
        let key = build(&wire.0, &mut cursor, 1)?;
        let count = wire.0.len() - cursor;
        ensure!(count == 0, TrailingNodesSnafu { count });
        Ok(key)
    }
}
