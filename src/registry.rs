//! Echelon definition and membership registry
//!
//! Owns the CRUD lifecycle of scope definitions and all member-set
//! mutation. The registry validates every caller-supplied scope before it
//! touches the store and shapes the records; durability belongs to the
//! store adapter.

use crate::error::Result;
use crate::scope::Scope;
use crate::store::EchelonStore;
use crate::types::{Echelon, EchelonConfig, EchelonMeta, MemberSets, MemberType};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Registry over a document store of echelon records
///
/// Cheap to clone; concurrent callers share the underlying store handle.
/// Writes rely on the backend's atomic upsert/set-mutation primitives, so
/// two concurrent `add_member` calls on the same scope are both reflected
/// and concurrent redefinitions race only on metadata, last writer wins.
#[derive(Clone)]
pub struct EchelonRegistry {
    store: Arc<dyn EchelonStore>,
    config: EchelonConfig,
}

impl EchelonRegistry {
    /// Create a registry with the default separator and collection name
    pub fn new(store: Arc<dyn EchelonStore>) -> Self {
        Self::with_config(store, EchelonConfig::default())
    }

    /// Create a registry with explicit configuration
    pub fn with_config(store: Arc<dyn EchelonStore>, config: EchelonConfig) -> Self {
        Self { store, config }
    }

    /// The configured scope separator
    pub fn separator(&self) -> &str {
        &self.config.separator
    }

    /// The configured collection name
    pub fn collection(&self) -> &str {
        &self.config.collection
    }

    /// One-time setup: ensure the unique index on `scope`
    pub async fn init(&self) -> Result<()> {
        self.store.ensure_unique_index().await
    }

    /// Create or update an echelon definition
    ///
    /// `name` defaults to the scope string, `help` to a generated sentence
    /// referencing it. Idempotent: redefinition overwrites display metadata
    /// but never resets existing member sets, which are seeded only on
    /// insert.
    pub async fn define_echelon(
        &self,
        scope: &str,
        name: Option<&str>,
        help: Option<&str>,
    ) -> Result<()> {
        let scope = self.parse(scope)?;

        let meta = EchelonMeta {
            scope: scope.as_str().to_string(),
            name: name.unwrap_or(scope.as_str()).to_string(),
            help: help
                .map(str::to_string)
                .unwrap_or_else(|| format!("Provides access to {}", scope)),
        };

        debug!(scope = %scope, "defining echelon");
        self.store
            .upsert_set(scope.as_str(), meta, MemberSets::default())
            .await
    }

    /// Retrieve the full record for a scope, `None` if undefined
    pub async fn get_echelon(&self, scope: &str) -> Result<Option<Echelon>> {
        let scope = self.parse(scope)?;
        self.store.find_one(scope.as_str()).await
    }

    /// Retrieve every defined echelon keyed by scope
    pub async fn all_echelons(&self) -> Result<HashMap<String, Echelon>> {
        let records = self.store.find_all().await?;
        Ok(records
            .into_iter()
            .map(|record| (record.scope.clone(), record))
            .collect())
    }

    /// Remove an echelon definition
    ///
    /// Absence is not an error, and removal never cascades: descendant
    /// scopes stay defined or undefined independently.
    pub async fn remove_echelon(&self, scope: &str) -> Result<()> {
        let scope = self.parse(scope)?;
        debug!(scope = %scope, "removing echelon");
        self.store.delete_one(scope.as_str()).await
    }

    /// Add one or many members to an echelon's user or group set
    ///
    /// Existing entries are never duplicated. Adding to an undefined scope
    /// is a no-op: it creates no implicit echelon.
    pub async fn add_member<I, S>(
        &self,
        scope: &str,
        members: I,
        member_type: MemberType,
    ) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let scope = self.parse(scope)?;
        let members: Vec<String> = members.into_iter().map(Into::into).collect();
        if members.is_empty() {
            return Ok(());
        }

        debug!(scope = %scope, field = %member_type, count = members.len(), "adding members");
        self.store
            .add_to_set(scope.as_str(), member_type, &members)
            .await
    }

    /// Remove one or many members from an echelon's user or group set
    ///
    /// Removing a non-member, or removing from an undefined scope, is a
    /// no-op.
    pub async fn remove_member<I, S>(
        &self,
        scope: &str,
        members: I,
        member_type: MemberType,
    ) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let scope = self.parse(scope)?;
        let members: Vec<String> = members.into_iter().map(Into::into).collect();
        if members.is_empty() {
            return Ok(());
        }

        debug!(scope = %scope, field = %member_type, count = members.len(), "removing members");
        self.store
            .pull_from_set(scope.as_str(), member_type, &members)
            .await
    }

    fn parse(&self, scope: &str) -> Result<Scope> {
        Ok(Scope::parse(scope, &self.config.separator)?)
    }
}
