use crate::models::{Collection, DeleteOutcome, InsertOutcome, UpdateOutcome};
use crate::services::store::DocumentStore;
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    options::UpdateOptions,
    Client as MongoClient, Collection as MongoCollection, Database,
};
use service_core::error::AppError;

#[derive(Clone)]
pub struct MongoDb {
    client: MongoClient,
    db: Database,
}

impl MongoDb {
    /// Build the client. The driver connects lazily, so this only fails on a
    /// malformed URI or an SRV lookup failure; call [`MongoDb::health_check`]
    /// to find out whether the cluster is reachable.
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!(database = %database, "Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to create MongoDB client: {}", e);
            AppError::from(e)
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "MongoDB client ready");
        Ok(Self { client, db })
    }

    pub fn collection(&self, collection: Collection) -> MongoCollection<Document> {
        self.db.collection(collection.name())
    }

    pub fn client(&self) -> &MongoClient {
        &self.client
    }
}

#[async_trait]
impl DocumentStore for MongoDb {
    async fn find_one(
        &self,
        collection: Collection,
        filter: Document,
    ) -> Result<Option<Document>, AppError> {
        self.collection(collection)
            .find_one(filter, None)
            .await
            .map_err(|e| {
                tracing::error!(%collection, "find_one failed: {}", e);
                AppError::from(e)
            })
    }

    async fn find(
        &self,
        collection: Collection,
        filter: Document,
    ) -> Result<Vec<Document>, AppError> {
        let cursor = self
            .collection(collection)
            .find(filter, None)
            .await
            .map_err(AppError::from)?;

        cursor.try_collect().await.map_err(|e| {
            tracing::error!(%collection, "find cursor failed: {}", e);
            AppError::from(e)
        })
    }

    async fn insert_one(
        &self,
        collection: Collection,
        document: Document,
    ) -> Result<InsertOutcome, AppError> {
        let result = self
            .collection(collection)
            .insert_one(document, None)
            .await
            .map_err(|e| {
                tracing::error!(%collection, "insert_one failed: {}", e);
                AppError::from(e)
            })?;

        Ok(InsertOutcome::new(result.inserted_id))
    }

    async fn update_one(
        &self,
        collection: Collection,
        filter: Document,
        set: Document,
        upsert: bool,
    ) -> Result<UpdateOutcome, AppError> {
        let options = UpdateOptions::builder().upsert(upsert).build();
        let result = self
            .collection(collection)
            .update_one(filter, doc! { "$set": set }, options)
            .await
            .map_err(|e| {
                tracing::error!(%collection, "update_one failed: {}", e);
                AppError::from(e)
            })?;

        Ok(UpdateOutcome::new(
            result.matched_count,
            result.modified_count,
            result.upserted_id,
        ))
    }

    async fn delete_one(
        &self,
        collection: Collection,
        filter: Document,
    ) -> Result<DeleteOutcome, AppError> {
        let result = self
            .collection(collection)
            .delete_one(filter, None)
            .await
            .map_err(|e| {
                tracing::error!(%collection, "delete_one failed: {}", e);
                AppError::from(e)
            })?;

        Ok(DeleteOutcome::new(result.deleted_count))
    }

    async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }
}
