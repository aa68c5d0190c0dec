//! Immutable, encoded views of ledger state.
//!
//! A [`StateSnapshot`] holds every entity record postcard-encoded under its
//! [`EntityRef`]. Records are decoded on lookup, so a snapshot is cheap to
//! clone into a builder and republish.

use std::collections::BTreeMap;

use ledger_sigs_types::{
    AccountId, CodecError, ContractId, EntityRef, FileId, KeyOrderingFailure, ScheduleId, TokenId,
    TopicId, decode, encode,
};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::{
    lookup::{LookupError, LookupResult, SigMetadataLookup},
    metadata::{
        AccountSigningMetadata, ContractSigningMetadata, FileSigningMetadata,
        ScheduleSigningMetadata, TokenSigningMetadata, TopicSigningMetadata,
    },
    records::{
        AccountRecord, ContractRecord, FileRecord, ScheduleRecord, TokenRecord, TopicRecord,
    },
};

/// A point-in-time view of every entity the resolver may consult.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateSnapshot {
    records: BTreeMap<EntityRef, Vec<u8>>,
    sequence: u64,
}

impl StateSnapshot {
    /// Publication sequence number; the empty genesis snapshot is 0.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Number of stored entities, deleted ones included.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the snapshot stores no entities.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether a record exists for the entity.
    pub fn contains(&self, entity: impl Into<EntityRef>) -> bool {
        self.records.contains_key(&entity.into())
    }

    /// Starts a builder holding this snapshot's records, numbered as its
    /// successor.
    pub fn to_builder(&self) -> SnapshotBuilder {
        SnapshotBuilder { records: self.records.clone(), sequence: self.sequence + 1 }
    }

    fn read<R: DeserializeOwned>(
        &self,
        entity: EntityRef,
        missing: KeyOrderingFailure,
    ) -> LookupResult<R> {
        let Some(bytes) = self.records.get(&entity) else {
            debug!(entity = %entity, reason = %missing, "Entity not in snapshot");
            return Err(LookupError::failure(missing, entity));
        };
        decode(bytes).map_err(|e| {
            warn!(
                entity = %entity,
                sequence = self.sequence,
                error = %e,
                "Stored record failed to decode"
            );
            LookupError::backend(entity, e.to_string())
        })
    }
}

impl SigMetadataLookup for StateSnapshot {
    fn account_signing_meta(&self, id: AccountId) -> LookupResult<AccountSigningMetadata> {
        let reason = KeyOrderingFailure::MissingAccount;
        let record: AccountRecord = self.read(id.into(), reason)?;
        if record.deleted {
            return Err(LookupError::failure(reason, id));
        }
        Ok(record.signing_meta())
    }

    fn contract_signing_meta(&self, id: ContractId) -> LookupResult<ContractSigningMetadata> {
        let reason = KeyOrderingFailure::InvalidContract;
        let record: ContractRecord = self.read(id.into(), reason)?;
        if record.deleted {
            return Err(LookupError::failure(reason, id));
        }
        Ok(record.signing_meta())
    }

    fn file_signing_meta(&self, id: FileId) -> LookupResult<FileSigningMetadata> {
        let reason = KeyOrderingFailure::MissingFile;
        let record: FileRecord = self.read(id.into(), reason)?;
        if record.deleted {
            return Err(LookupError::failure(reason, id));
        }
        Ok(record.signing_meta())
    }

    fn topic_signing_meta(&self, id: TopicId) -> LookupResult<TopicSigningMetadata> {
        let reason = KeyOrderingFailure::MissingTopic;
        let record: TopicRecord = self.read(id.into(), reason)?;
        if record.deleted {
            return Err(LookupError::failure(reason, id));
        }
        Ok(record.signing_meta())
    }

    fn token_signing_meta(&self, id: TokenId) -> LookupResult<TokenSigningMetadata> {
        let reason = KeyOrderingFailure::MissingToken;
        let record: TokenRecord = self.read(id.into(), reason)?;
        if record.deleted {
            return Err(LookupError::failure(reason, id));
        }
        Ok(record.signing_meta())
    }

    fn schedule_signing_meta(&self, id: ScheduleId) -> LookupResult<ScheduleSigningMetadata> {
        let reason = KeyOrderingFailure::MissingSchedule;
        let record: ScheduleRecord = self.read(id.into(), reason)?;
        if !record.is_pending() {
            return Err(LookupError::failure(reason, id));
        }
        Ok(record.signing_meta())
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Accumulates encoded records for a new [`StateSnapshot`].
#[derive(Debug, Default)]
pub struct SnapshotBuilder {
    records: BTreeMap<EntityRef, Vec<u8>>,
    sequence: u64,
}

impl SnapshotBuilder {
    /// Creates an empty builder for the genesis snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    fn put<R: Serialize>(
        &mut self,
        entity: EntityRef,
        record: &R,
    ) -> Result<&mut Self, CodecError> {
        let bytes = encode(record)?;
        self.records.insert(entity, bytes);
        Ok(self)
    }

    /// Stores an account, replacing any previous record.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Encode`] if the record cannot be encoded.
    pub fn put_account(
        &mut self,
        id: AccountId,
        record: &AccountRecord,
    ) -> Result<&mut Self, CodecError> {
        self.put(id.into(), record)
    }

    /// Stores a contract, replacing any previous record.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Encode`] if the record cannot be encoded.
    pub fn put_contract(
        &mut self,
        id: ContractId,
        record: &ContractRecord,
    ) -> Result<&mut Self, CodecError> {
        self.put(id.into(), record)
    }

    /// Stores a file, replacing any previous record.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Encode`] if the record cannot be encoded.
    pub fn put_file(&mut self, id: FileId, record: &FileRecord) -> Result<&mut Self, CodecError> {
        self.put(id.into(), record)
    }

    /// Stores a topic, replacing any previous record.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Encode`] if the record cannot be encoded.
    pub fn put_topic(
        &mut self,
        id: TopicId,
        record: &TopicRecord,
    ) -> Result<&mut Self, CodecError> {
        self.put(id.into(), record)
    }

    /// Stores a token, replacing any previous record.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Encode`] if the record cannot be encoded.
    pub fn put_token(
        &mut self,
        id: TokenId,
        record: &TokenRecord,
    ) -> Result<&mut Self, CodecError> {
        self.put(id.into(), record)
    }

    /// Stores a schedule, replacing any previous record.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Encode`] if the record cannot be encoded.
    pub fn put_schedule(
        &mut self,
        id: ScheduleId,
        record: &ScheduleRecord,
    ) -> Result<&mut Self, CodecError> {
        self.put(id.into(), record)
    }

    /// Stores already-encoded bytes without validating them.
    ///
    /// Used when replaying records from storage. Bytes that do not decode
    /// surface as [`LookupError::Backend`] on lookup.
    pub fn put_encoded(&mut self, entity: impl Into<EntityRef>, bytes: Vec<u8>) -> &mut Self {
        self.records.insert(entity.into(), bytes);
        self
    }

    /// Drops an entity entirely. Returns whether it was present.
    pub fn remove(&mut self, entity: impl Into<EntityRef>) -> bool {
        self.records.remove(&entity.into()).is_some()
    }

    /// Freezes the accumulated records.
    pub fn build(self) -> StateSnapshot {
        StateSnapshot { records: self.records, sequence: self.sequence }
    }
}
