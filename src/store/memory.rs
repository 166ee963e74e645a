//! In-memory echelon store
//!
//! Default backend for tests and single-process deployments. The map is
//! guarded by a single `RwLock`, so each store call is atomic with respect
//! to concurrent callers; the key doubles as the unique index on `scope`.

use crate::error::Result;
use crate::types::{Echelon, EchelonMeta, MemberSets, MemberType};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::EchelonStore;

/// In-memory echelon store implementation
#[derive(Clone)]
pub struct MemoryStore {
    records: Arc<RwLock<HashMap<String, Echelon>>>,
}

impl MemoryStore {
    /// Create a new empty in-memory store
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EchelonStore for MemoryStore {
    async fn ensure_unique_index(&self) -> Result<()> {
        // The map key is the index
        Ok(())
    }

    async fn find_one(&self, scope: &str) -> Result<Option<Echelon>> {
        let records = self.records.read().await;
        Ok(records.get(scope).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Echelon>> {
        let records = self.records.read().await;
        Ok(records.values().cloned().collect())
    }

    async fn upsert_set(
        &self,
        scope: &str,
        set: EchelonMeta,
        insert_only: MemberSets,
    ) -> Result<()> {
        let mut records = self.records.write().await;

        match records.get_mut(scope) {
            Some(record) => {
                record.scope = set.scope;
                record.name = set.name;
                record.help = set.help;
            }
            None => {
                records.insert(
                    scope.to_string(),
                    Echelon {
                        scope: set.scope,
                        name: set.name,
                        help: set.help,
                        users: insert_only.users,
                        groups: insert_only.groups,
                    },
                );
            }
        }

        Ok(())
    }

    async fn add_to_set(&self, scope: &str, field: MemberType, values: &[String]) -> Result<()> {
        let mut records = self.records.write().await;

        if let Some(record) = records.get_mut(scope) {
            record
                .members_mut(field)
                .extend(values.iter().cloned());
        }

        Ok(())
    }

    async fn pull_from_set(&self, scope: &str, field: MemberType, values: &[String]) -> Result<()> {
        let mut records = self.records.write().await;

        if let Some(record) = records.get_mut(scope) {
            let members = record.members_mut(field);
            for value in values {
                members.remove(value);
            }
        }

        Ok(())
    }

    async fn delete_one(&self, scope: &str) -> Result<()> {
        let mut records = self.records.write().await;
        records.remove(scope);
        Ok(())
    }
}
