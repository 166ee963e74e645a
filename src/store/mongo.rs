//! MongoDB echelon store
//!
//! Production backend. Member-set mutation maps directly onto the server's
//! atomic update operators (`$set`/`$setOnInsert`, `$addToSet`/`$each`,
//! `$pull`/`$in`), so concurrent writers on the same scope never observe a
//! read-modify-write race.

use crate::error::{EchelonError, Result};
use crate::types::{Echelon, EchelonMeta, MemberSets, MemberType};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::options::{IndexOptions, UpdateOptions};
use mongodb::{Client, Collection, Database, IndexModel};

use super::EchelonStore;

fn store_err(err: mongodb::error::Error) -> EchelonError {
    EchelonError::StoreUnavailable(err.to_string())
}

/// MongoDB-backed echelon store implementation
#[derive(Clone)]
pub struct MongoStore {
    collection: Collection<Echelon>,
}

impl MongoStore {
    /// Connect to a MongoDB deployment and bind a collection
    pub async fn connect(uri: &str, database: &str, collection: &str) -> Result<Self> {
        let client = Client::with_uri_str(uri).await.map_err(store_err)?;
        Ok(Self::with_database(&client.database(database), collection))
    }

    /// Bind a collection on an existing database handle
    pub fn with_database(database: &Database, collection: &str) -> Self {
        Self {
            collection: database.collection::<Echelon>(collection),
        }
    }
}

#[async_trait]
impl EchelonStore for MongoStore {
    async fn ensure_unique_index(&self) -> Result<()> {
        let index = IndexModel::builder()
            .keys(doc! { "scope": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        self.collection
            .create_index(index, None)
            .await
            .map_err(store_err)?;
        Ok(())
    }

    async fn find_one(&self, scope: &str) -> Result<Option<Echelon>> {
        self.collection
            .find_one(doc! { "scope": scope }, None)
            .await
            .map_err(store_err)
    }

    async fn find_all(&self) -> Result<Vec<Echelon>> {
        let cursor = self.collection.find(doc! {}, None).await.map_err(store_err)?;
        cursor.try_collect().await.map_err(store_err)
    }

    async fn upsert_set(
        &self,
        scope: &str,
        set: EchelonMeta,
        insert_only: MemberSets,
    ) -> Result<()> {
        let users: Vec<String> = insert_only.users.into_iter().collect();
        let groups: Vec<String> = insert_only.groups.into_iter().collect();

        let update = doc! {
            "$set": {
                "scope": set.scope,
                "name": set.name,
                "help": set.help,
            },
            "$setOnInsert": {
                "users": users,
                "groups": groups,
            },
        };

        self.collection
            .update_one(
                doc! { "scope": scope },
                update,
                UpdateOptions::builder().upsert(true).build(),
            )
            .await
            .map_err(store_err)?;
        Ok(())
    }

    async fn add_to_set(&self, scope: &str, field: MemberType, values: &[String]) -> Result<()> {
        let mut target = Document::new();
        target.insert(field.field(), doc! { "$each": values.to_vec() });
        let update = doc! { "$addToSet": target };

        // No upsert: adding members never implicitly defines an echelon
        self.collection
            .update_one(doc! { "scope": scope }, update, None)
            .await
            .map_err(store_err)?;
        Ok(())
    }

    async fn pull_from_set(&self, scope: &str, field: MemberType, values: &[String]) -> Result<()> {
        let mut target = Document::new();
        target.insert(field.field(), doc! { "$in": values.to_vec() });
        let update = doc! { "$pull": target };

        self.collection
            .update_one(doc! { "scope": scope }, update, None)
            .await
            .map_err(store_err)?;
        Ok(())
    }

    async fn delete_one(&self, scope: &str) -> Result<()> {
        self.collection
            .delete_one(doc! { "scope": scope }, None)
            .await
            .map_err(store_err)?;
        Ok(())
    }
}
