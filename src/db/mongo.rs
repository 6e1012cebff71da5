//! MongoDB client and collection wrapper

use bson::{doc, Document};
use futures_util::StreamExt;
use mongodb::{
    options::{FindOptions, IndexOptions, UpdateModifications},
    results::UpdateResult,
    Client, Collection, IndexModel,
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{error, info};

use crate::types::LatticeError;

/// Trait for schemas that provide index definitions
pub trait IntoIndexes {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)>;
}

/// MongoDB client wrapper
#[derive(Clone)]
pub struct MongoClient {
    client: Client,
    db_name: String,
}

impl MongoClient {
    /// Create a new MongoDB client and verify the server answers
    pub async fn new(uri: &str, db_name: &str) -> Result<Self, LatticeError> {
        info!("Connecting to MongoDB at {}", uri);

        // Fail fast instead of hanging on an unreachable server
        let timeout_uri = if uri.contains('?') {
            format!("{}&serverSelectionTimeoutMS=3000&connectTimeoutMS=3000", uri)
        } else {
            format!("{}?serverSelectionTimeoutMS=3000&connectTimeoutMS=3000", uri)
        };

        let client = Client::with_uri_str(&timeout_uri)
            .await
            .map_err(|e| LatticeError::Database(format!("Failed to connect to MongoDB: {}", e)))?;

        let mongo = Self {
            client,
            db_name: db_name.to_string(),
        };
        mongo.ping().await?;

        info!("Connected to MongoDB database '{}'", db_name);
        Ok(mongo)
    }

    /// Round-trip a ping command
    pub async fn ping(&self) -> Result<(), LatticeError> {
        self.client
            .database(&self.db_name)
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| LatticeError::Database(format!("MongoDB ping failed: {}", e)))?;
        Ok(())
    }

    /// Get a typed collection, creating its indexes
    pub async fn collection<T>(&self, name: &str) -> Result<MongoCollection<T>, LatticeError>
    where
        T: Serialize + DeserializeOwned + Unpin + Send + Sync + IntoIndexes,
    {
        MongoCollection::new(&self.client, &self.db_name, name).await
    }

    /// Get the database name
    pub fn db_name(&self) -> &str {
        &self.db_name
    }
}

/// Typed MongoDB collection with automatic indexing
#[derive(Debug, Clone)]
pub struct MongoCollection<T>
where
    T: Serialize + DeserializeOwned + Unpin + Send + Sync,
{
    inner: Collection<T>,
}

impl<T> MongoCollection<T>
where
    T: Serialize + DeserializeOwned + Unpin + Send + Sync + IntoIndexes,
{
    /// Create a new collection handle and apply indexes
    pub async fn new(
        client: &Client,
        db_name: &str,
        collection_name: &str,
    ) -> Result<Self, LatticeError> {
        let collection = client.database(db_name).collection::<T>(collection_name);
        let mongo_collection = MongoCollection { inner: collection };

        mongo_collection.apply_indexes().await?;

        Ok(mongo_collection)
    }

    /// Apply schema-defined indexes
    async fn apply_indexes(&self) -> Result<(), LatticeError> {
        let schema_indices = T::into_indices();

        if schema_indices.is_empty() {
            return Ok(());
        }

        let indices: Vec<IndexModel> = schema_indices
            .into_iter()
            .map(|(keys, opts)| IndexModel::builder().keys(keys).options(opts).build())
            .collect();

        self.inner
            .create_indexes(indices)
            .await
            .map_err(|e| LatticeError::Database(format!("Failed to create indexes: {}", e)))?;

        Ok(())
    }

    /// Insert a single document
    pub async fn insert_one(&self, item: &T) -> Result<(), LatticeError> {
        self.inner.insert_one(item).await.map_err(map_write_error)?;
        Ok(())
    }

    /// Insert a batch of documents
    pub async fn insert_many(&self, items: &[T]) -> Result<usize, LatticeError> {
        if items.is_empty() {
            return Ok(0);
        }

        let result = self
            .inner
            .insert_many(items)
            .await
            .map_err(map_write_error)?;

        Ok(result.inserted_ids.len())
    }

    /// Find one document by filter
    pub async fn find_one(&self, filter: Document) -> Result<Option<T>, LatticeError> {
        self.inner
            .find_one(filter)
            .await
            .map_err(|e| LatticeError::Database(format!("Find failed: {}", e)))
    }

    /// Find many documents by filter with optional sort/limit
    pub async fn find_many(
        &self,
        filter: Document,
        options: Option<FindOptions>,
    ) -> Result<Vec<T>, LatticeError> {
        let cursor = self
            .inner
            .find(filter)
            .with_options(options)
            .await
            .map_err(|e| LatticeError::Database(format!("Find failed: {}", e)))?;

        let results: Vec<T> = cursor
            .filter_map(|doc| async {
                match doc {
                    Ok(d) => Some(d),
                    Err(e) => {
                        error!("Error reading document: {}", e);
                        None
                    }
                }
            })
            .collect()
            .await;

        Ok(results)
    }

    /// Count documents matching a filter
    pub async fn count(&self, filter: Document) -> Result<u64, LatticeError> {
        self.inner
            .count_documents(filter)
            .await
            .map_err(|e| LatticeError::Database(format!("Count failed: {}", e)))
    }

    /// Update one document
    pub async fn update_one(
        &self,
        filter: Document,
        update: impl Into<UpdateModifications>,
    ) -> Result<UpdateResult, LatticeError> {
        self.inner
            .update_one(filter, update.into())
            .await
            .map_err(map_write_error)
    }

    /// Update every matching document
    pub async fn update_many(
        &self,
        filter: Document,
        update: impl Into<UpdateModifications>,
    ) -> Result<UpdateResult, LatticeError> {
        self.inner
            .update_many(filter, update.into())
            .await
            .map_err(map_write_error)
    }

    /// Delete one document, returning how many were removed
    pub async fn delete_one(&self, filter: Document) -> Result<u64, LatticeError> {
        let result = self
            .inner
            .delete_one(filter)
            .await
            .map_err(|e| LatticeError::Database(format!("Delete failed: {}", e)))?;
        Ok(result.deleted_count)
    }

    /// Delete every matching document, returning how many were removed
    pub async fn delete_many(&self, filter: Document) -> Result<u64, LatticeError> {
        let result = self
            .inner
            .delete_many(filter)
            .await
            .map_err(|e| LatticeError::Database(format!("Delete failed: {}", e)))?;
        Ok(result.deleted_count)
    }
}

/// Duplicate-key violations become conflicts; everything else is a database error
fn map_write_error(err: mongodb::error::Error) -> LatticeError {
    if is_duplicate_key(&err) {
        LatticeError::Conflict(format!("Unique constraint violated: {}", err))
    } else {
        LatticeError::Database(format!("Write failed: {}", err))
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    use mongodb::error::{ErrorKind, WriteFailure};

    const DUPLICATE_KEY: i32 = 11000;

    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(e)) => e.code == DUPLICATE_KEY,
        ErrorKind::InsertMany(e) => e
            .write_errors
            .as_ref()
            .is_some_and(|errs| errs.iter().any(|w| w.code == DUPLICATE_KEY)),
        ErrorKind::Command(e) => e.code == DUPLICATE_KEY,
        _ => false,
    }
}

