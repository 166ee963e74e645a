//! Document store adapter
//!
//! A narrow, backend-agnostic interface over a persistent key-document
//! store. Records are keyed by scope with a uniqueness constraint; the
//! registry is the only writer and issues one logical store call per
//! operation. Concurrency safety between writers on the same scope is the
//! backend's job: `upsert_set` and the set mutations must be atomic from
//! the caller's perspective.

use crate::error::Result;
use crate::types::{Echelon, EchelonMeta, MemberSets, MemberType};
use async_trait::async_trait;

mod memory;

#[cfg(feature = "mongo")]
mod mongo;

pub use memory::MemoryStore;

#[cfg(feature = "mongo")]
pub use mongo::MongoStore;

/// Backend contract for echelon persistence
///
/// Any backend supporting these operations with a uniqueness constraint on
/// `scope` qualifies. Connectivity or write failures surface as
/// `StoreUnavailable`; a write is never silently dropped. Absence is
/// `None`/no-op, never an error.
#[async_trait]
pub trait EchelonStore: Send + Sync {
    /// Ensure the unique index on `scope` exists; idempotent, called once at setup
    async fn ensure_unique_index(&self) -> Result<()>;

    /// Fetch the record for a scope, if defined
    async fn find_one(&self, scope: &str) -> Result<Option<Echelon>>;

    /// Fetch every defined record; finite, materialized per call
    async fn find_all(&self) -> Result<Vec<Echelon>>;

    /// Overwrite `set` on the record matching `scope`, inserting a new
    /// record seeded with `set` merged with `insert_only` when absent
    async fn upsert_set(&self, scope: &str, set: EchelonMeta, insert_only: MemberSets)
        -> Result<()>;

    /// Add values to a set-valued field, introducing no duplicates
    async fn add_to_set(&self, scope: &str, field: MemberType, values: &[String]) -> Result<()>;

    /// Remove values from a set-valued field; absent values are ignored
    async fn pull_from_set(&self, scope: &str, field: MemberType, values: &[String]) -> Result<()>;

    /// Delete the record for a scope; no error if absent
    async fn delete_one(&self, scope: &str) -> Result<()>;
}
