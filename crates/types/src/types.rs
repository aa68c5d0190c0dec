//! Core identifier types for ledger signing-order resolution.
//!
//! Every ledger entity is addressed by a `shard.realm.num` triple. The
//! identifiers below share one representation but are distinct types so an
//! account number can never be passed where a file number is expected.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use snafu::Snafu;

// ============================================================================
// Identifier Types
// ============================================================================

/// Error parsing an entity identifier from its `shard.realm.num` form.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
pub enum IdParseError {
    /// The input did not contain exactly three dot-separated components.
    #[snafu(display("Expected `shard.realm.num`, got {input:?}"))]
    Shape {
        /// The rejected input.
        input: String,
    },

    /// One of the components was not a non-negative integer.
    #[snafu(display("Invalid {component} component in {input:?}"))]
    Component {
        /// Which component failed to parse.
        component: &'static str,
        /// The rejected input.
        input: String,
    },
}

fn parse_triple(s: &str) -> Result<(u64, u64, u64), IdParseError> {
    let mut parts = s.split('.');
    let (Some(shard), Some(realm), Some(num), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(IdParseError::Shape { input: s.to_string() });
    };
    let parse = |component: &'static str, raw: &str| {
        raw.parse::<u64>()
            .map_err(|_| IdParseError::Component { component, input: s.to_string() })
    };
    Ok((parse("shard", shard)?, parse("realm", realm)?, parse("num", num)?))
}

/// Generates a `shard.realm.num` entity identifier type.
///
/// Each generated type provides:
/// - Standard derives: Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord
/// - Serde as a `{ shard, realm, num }` struct
/// - `new()` constructor, `num_only()` shortcut for shard 0 realm 0
/// - `Display` and `FromStr` in `shard.realm.num` form
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
            Serialize, Deserialize,
        )]
        pub struct $name {
            /// Shard number.
            pub shard: u64,
            /// Realm number.
            pub realm: u64,
            /// Entity number within the realm.
            pub num: u64,
        }

        impl $name {
            /// Creates a new identifier from its three components.
            #[inline]
            pub const fn new(shard: u64, realm: u64, num: u64) -> Self {
                Self { shard, realm, num }
            }

            /// Creates an identifier in shard 0, realm 0.
            #[inline]
            pub const fn num_only(num: u64) -> Self {
                Self::new(0, 0, num)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}.{}.{}", self.shard, self.realm, self.num)
            }
        }

        impl std::str::FromStr for $name {
            type Err = IdParseError;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                parse_triple(s).map(|(shard, realm, num)| Self::new(shard, realm, num))
            }
        }
    };
}

define_id!(
    /// Identifier of a crypto account.
    ///
    /// # Display
    ///
    /// Formats as `shard.realm.num`: `0.0.1001`.
    AccountId
);

define_id!(
    /// Identifier of a file whose modification is gated by a WACL.
    FileId
);

define_id!(
    /// Identifier of a smart contract instance.
    ContractId
);

define_id!(
    /// Identifier of a consensus topic.
    TopicId
);

define_id!(
    /// Identifier of a token type.
    TokenId
);

define_id!(
    /// Identifier of a schedule entity wrapping a deferred transaction.
    ScheduleId
);

impl AccountId {
    /// `0.0.0`, used by update bodies to clear an optional account reference.
    pub const SENTINEL: Self = Self::num_only(0);

    /// Whether this is the clearing sentinel rather than a real account.
    #[inline]
    pub const fn is_sentinel(self) -> bool {
        self.shard == 0 && self.realm == 0 && self.num == 0
    }
}

impl TokenId {
    /// `0.0.0`, which a custom fee uses to denominate in the token being created.
    pub const SENTINEL: Self = Self::num_only(0);

    /// Whether this is the "token being created" sentinel.
    #[inline]
    pub const fn is_sentinel(self) -> bool {
        self.shard == 0 && self.realm == 0 && self.num == 0
    }
}

// ============================================================================
// Entity References
// ============================================================================

/// A reference to any ledger entity, used to name the subject of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityRef {
    /// An account.
    Account(AccountId),
    /// A file.
    File(FileId),
    /// A contract.
    Contract(ContractId),
    /// A consensus topic.
    Topic(TopicId),
    /// A token.
    Token(TokenId),
    /// A schedule.
    Schedule(ScheduleId),
}

impl EntityRef {
    /// Short lowercase name of the entity kind.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Account(_) => "account",
            Self::File(_) => "file",
            Self::Contract(_) => "contract",
            Self::Topic(_) => "topic",
            Self::Token(_) => "token",
            Self::Schedule(_) => "schedule",
        }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Account(id) => write!(f, "account {id}"),
            Self::File(id) => write!(f, "file {id}"),
            Self::Contract(id) => write!(f, "contract {id}"),
            Self::Topic(id) => write!(f, "topic {id}"),
            Self::Token(id) => write!(f, "token {id}"),
            Self::Schedule(id) => write!(f, "schedule {id}"),
        }
    }
}

impl From<AccountId> for EntityRef {
    fn from(id: AccountId) -> Self {
        Self::Account(id)
    }
}

impl From<FileId> for EntityRef {
    fn from(id: FileId) -> Self {
        Self::File(id)
    }
}

impl From<ContractId> for EntityRef {
    fn from(id: ContractId) -> Self {
        Self::Contract(id)
    }
}

impl From<TopicId> for EntityRef {
    fn from(id: TopicId) -> Self {
        Self::Topic(id)
    }
}

impl From<TokenId> for EntityRef {
    fn from(id: TokenId) -> Self {
        Self::Token(id)
    }
}

impl From<ScheduleId> for EntityRef {
    fn from(id: ScheduleId) -> Self {
        Self::Schedule(id)
    }
}

// ============================================================================
// Transaction Identifier
// ============================================================================

/// Identifies a submitted transaction by its payer and valid-start time.
///
/// `scheduled` marks the synthetic id given to a transaction body that
/// executes on behalf of a schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, bon::Builder)]
pub struct TransactionId {
    /// Account paying the transaction fees.
    pub payer: AccountId,
    /// Earliest consensus time at which the transaction is valid.
    pub valid_start: DateTime<Utc>,
    /// Whether this id belongs to a scheduled (inner) transaction.
    #[builder(default)]
    pub scheduled: bool,
}

impl TransactionId {
    /// Returns the id used for the inner transaction of a schedule.
    ///
    /// The valid start is preserved; the payer becomes the schedule's
    /// effective payer.
    #[must_use]
    pub fn as_scheduled(self, payer: AccountId) -> Self {
        Self { payer, valid_start: self.valid_start, scheduled: true }
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{}.{:09}",
            self.payer,
            self.valid_start.timestamp(),
            self.valid_start.timestamp_subsec_nanos()
        )?;
        if self.scheduled {
            write!(f, "?scheduled")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::disallowed_methods)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    // ========================================================================
    // Identifier tests
    // ========================================================================

    #[test]
    fn test_id_display() {
        assert_eq!(AccountId::new(0, 0, 1001).to_string(), "0.0.1001");
        assert_eq!(FileId::new(1, 2, 3).to_string(), "1.2.3");
    }

    #[test]
    fn test_id_from_str() {
        let id: TopicId = "0.0.7890".parse().unwrap();
        assert_eq!(id, TopicId::num_only(7890));
    }

    #[test]
    fn test_id_from_str_rejects_wrong_shape() {
        let err = "0.0".parse::<AccountId>().unwrap_err();
        assert!(matches!(err, IdParseError::Shape { .. }));
        let err = "0.0.1.2".parse::<AccountId>().unwrap_err();
        assert!(matches!(err, IdParseError::Shape { .. }));
    }

    #[test]
    fn test_id_from_str_rejects_bad_component() {
        let err = "0.x.5".parse::<ContractId>().unwrap_err();
        assert_eq!(err, IdParseError::Component { component: "realm", input: "0.x.5".into() });
        assert!("0.0.-1".parse::<ContractId>().is_err());
    }

    #[test]
    fn test_id_ordering_follows_components() {
        assert!(AccountId::new(0, 0, 2) < AccountId::new(0, 0, 50));
        assert!(AccountId::new(0, 0, 999) < AccountId::new(0, 1, 0));
    }

    #[test]
    fn test_sentinels() {
        assert!(TokenId::SENTINEL.is_sentinel());
        assert!(!TokenId::num_only(1).is_sentinel());
        assert!(AccountId::SENTINEL.is_sentinel());
        assert!(!AccountId::new(1, 0, 0).is_sentinel());
    }

    #[test]
    fn test_id_serde_roundtrip() {
        let id = ScheduleId::new(0, 0, 6_000);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, r#"{"shard":0,"realm":0,"num":6000}"#);
        let back: ScheduleId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    // ========================================================================
    // EntityRef / TransactionId tests
    // ========================================================================

    #[test]
    fn test_entity_ref_display_and_kind() {
        let entity = EntityRef::from(TokenId::num_only(42));
        assert_eq!(entity.kind(), "token");
        assert_eq!(entity.to_string(), "token 0.0.42");
    }

    #[test]
    fn test_transaction_id_display() {
        let id = TransactionId::builder()
            .payer(AccountId::num_only(13257))
            .valid_start(Utc.timestamp_opt(1_600_000_000, 5).unwrap())
            .build();
        assert_eq!(id.to_string(), "0.0.13257@1600000000.000000005");
        assert!(!id.scheduled);
    }

    #[test]
    fn test_transaction_id_as_scheduled() {
        let id = TransactionId::builder()
            .payer(AccountId::num_only(13257))
            .valid_start(Utc.timestamp_opt(1_600_000_000, 0).unwrap())
            .build();
        let inner = id.as_scheduled(AccountId::num_only(1340));
        assert!(inner.scheduled);
        assert_eq!(inner.payer, AccountId::num_only(1340));
        assert_eq!(inner.valid_start, id.valid_start);
        assert!(inner.to_string().ends_with("?scheduled"));
    }
}
