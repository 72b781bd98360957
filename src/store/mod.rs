//! Keyed persistence for definitions and instances.
//!
//! The engine only talks to storage through the [`Store`] trait, so the
//! in-memory [`MemoryStore`] can be swapped for a durable backend without
//! touching validation or execution logic.
//!
//! A store guarantees safe concurrent `get`/`put` by id and publishes only
//! whole entities. It offers no multi-key transactions: invariants that span
//! several keys are the engine's job.

mod memory;
pub mod snapshot;

pub use memory::MemoryStore;
pub use snapshot::{Snapshot, SnapshotError, SnapshotFormat, SNAPSHOT_VERSION};

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors a storage backend can report.
///
/// These carry backend detail for logging. The engine never forwards them to
/// its callers.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("stored entity is corrupt: {0}")]
    Corrupt(String),
}

/// A value a [`Store`] can hold.
pub trait Entity: Clone + Send + Sync + 'static {
    /// The key this entity is stored under.
    fn id(&self) -> &str;

    /// Return the entity with its id replaced.
    fn with_id(self, id: String) -> Self;

    /// Creation time, used to order listings.
    fn created_at(&self) -> DateTime<Utc>;
}

/// Concurrency-safe key-value persistence.
pub trait Store<T: Entity>: Send + Sync {
    /// Fetch an entity by id.
    fn get(&self, id: &str) -> Result<Option<T>, StoreError>;

    /// Fetch every stored entity, in no particular order.
    fn get_all(&self) -> Result<Vec<T>, StoreError>;

    /// Insert or replace an entity.
    ///
    /// When `id` is `None` (or empty) the store generates one. The returned
    /// entity carries the id it was stored under.
    fn put(&self, id: Option<String>, entity: T) -> Result<T, StoreError>;
}

/// Sort entities oldest first, breaking ties by id.
pub(crate) fn sort_by_creation<T: Entity>(entities: &mut [T]) {
    entities.sort_by(|a, b| {
        a.created_at()
            .cmp(&b.created_at())
            .then_with(|| a.id().cmp(b.id()))
    });
}
