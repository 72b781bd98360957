//! Point-in-time snapshots of an in-memory store.
//!
//! A snapshot lets a [`MemoryStore`](super::MemoryStore) survive a process
//! restart: export it, encode it as JSON or binary, and rebuild the store from
//! the decoded value later.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Version identifier for the snapshot format
pub const SNAPSHOT_VERSION: u32 = 1;

/// Why a snapshot could not be written or read back.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("could not encode snapshot: {0}")]
    Encode(String),

    #[error("could not decode snapshot: {0}")]
    Decode(String),

    #[error("snapshot version {found} cannot be read, expected {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// An entry has an empty id, so it has no key to be stored under
    #[error("snapshot entry at position {0} has no id")]
    MissingId(usize),

    /// Two entries claim the same key
    #[error("snapshot holds id '{0}' more than once")]
    DuplicateId(String),

    /// Entries are individually well formed but break an engine rule
    #[error("snapshot rejected: {0}")]
    ValidationFailed(String),
}

/// Encoding used for snapshot bytes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotFormat {
    /// Human-readable JSON
    #[default]
    Json,
    /// Compact bincode encoding
    Binary,
}

/// Serializable copy of every entity in a store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot<T> {
    /// Snapshot format version
    pub version: u32,

    /// Unique snapshot identifier
    pub id: String,

    /// When the snapshot was taken
    pub taken_at: DateTime<Utc>,

    /// Stored entities, oldest first
    pub entries: Vec<T>,
}

impl<T: Serialize + DeserializeOwned> Snapshot<T> {
    pub fn encode(&self, format: SnapshotFormat) -> Result<Vec<u8>, SnapshotError> {
        encode(self, format)
    }

    /// Decode snapshot bytes and check the format version.
    pub fn decode(bytes: &[u8], format: SnapshotFormat) -> Result<Self, SnapshotError> {
        let snapshot: Self = decode(bytes, format)?;
        check_version(snapshot.version)?;
        Ok(snapshot)
    }
}

pub(crate) fn encode<V: Serialize>(value: &V, format: SnapshotFormat) -> Result<Vec<u8>, SnapshotError> {
    match format {
        SnapshotFormat::Json => serde_json::to_vec_pretty(value)
            .map_err(|e| SnapshotError::Encode(e.to_string())),
        SnapshotFormat::Binary => {
            bincode::serialize(value).map_err(|e| SnapshotError::Encode(e.to_string()))
        }
    }
}

pub(crate) fn decode<V: DeserializeOwned>(bytes: &[u8], format: SnapshotFormat) -> Result<V, SnapshotError> {
    match format {
        SnapshotFormat::Json => serde_json::from_slice(bytes)
            .map_err(|e| SnapshotError::Decode(e.to_string())),
        SnapshotFormat::Binary => bincode::deserialize(bytes)
            .map_err(|e| SnapshotError::Decode(e.to_string())),
    }
}

pub(crate) fn check_version(found: u32) -> Result<(), SnapshotError> {
    if found == SNAPSHOT_VERSION {
        Ok(())
    } else {
        Err(SnapshotError::UnsupportedVersion {
            found,
            supported: SNAPSHOT_VERSION,
        })
    }
}
