use crate::models::{Collection, DeleteOutcome, InsertOutcome, UpdateOutcome};
use async_trait::async_trait;
use mongodb::bson::Document;
use service_core::error::AppError;

/// The database operations the route handlers forward to.
///
/// Filters are equality matches on top-level fields. `update_one` takes the
/// fields to set rather than a full update document; with `upsert` a miss
/// inserts the filter fields together with `set`.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find_one(
        &self,
        collection: Collection,
        filter: Document,
    ) -> Result<Option<Document>, AppError>;

    async fn find(
        &self,
        collection: Collection,
        filter: Document,
    ) -> Result<Vec<Document>, AppError>;

    async fn insert_one(
        &self,
        collection: Collection,
        document: Document,
    ) -> Result<InsertOutcome, AppError>;

    async fn update_one(
        &self,
        collection: Collection,
        filter: Document,
        set: Document,
        upsert: bool,
    ) -> Result<UpdateOutcome, AppError>;

    async fn delete_one(
        &self,
        collection: Collection,
        filter: Document,
    ) -> Result<DeleteOutcome, AppError>;

    async fn health_check(&self) -> Result<(), AppError>;
}

/// Stand-in used when no database client could be built at startup and the
/// service was configured to keep serving anyway.
#[derive(Debug, Default, Clone)]
pub struct UnavailableStore;

#[async_trait]
impl DocumentStore for UnavailableStore {
    async fn find_one(
        &self,
        collection: Collection,
        _: Document,
    ) -> Result<Option<Document>, AppError> {
        tracing::warn!(%collection, "find_one against unavailable database");
        Err(AppError::ServiceUnavailable)
    }

    async fn find(&self, collection: Collection, _: Document) -> Result<Vec<Document>, AppError> {
        tracing::warn!(%collection, "find against unavailable database");
        Err(AppError::ServiceUnavailable)
    }

    async fn insert_one(
        &self,
        collection: Collection,
        _: Document,
    ) -> Result<InsertOutcome, AppError> {
        tracing::warn!(%collection, "insert_one against unavailable database");
        Err(AppError::ServiceUnavailable)
    }

    async fn update_one(
        &self,
        collection: Collection,
        _: Document,
        _: Document,
        _: bool,
    ) -> Result<UpdateOutcome, AppError> {
        tracing::warn!(%collection, "update_one against unavailable database");
        Err(AppError::ServiceUnavailable)
    }

    async fn delete_one(
        &self,
        collection: Collection,
        _: Document,
    ) -> Result<DeleteOutcome, AppError> {
        tracing::warn!(%collection, "delete_one against unavailable database");
        Err(AppError::ServiceUnavailable)
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Err(AppError::ServiceUnavailable)
    }
}
