use crate::models::{Collection, DeleteOutcome, InsertOutcome, UpdateOutcome};
use crate::services::store::DocumentStore;
use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Bson, Document};
use service_core::error::AppError;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// In-process document store with the matching rules of the MongoDB driver
/// calls the handlers make: top-level equality filters where `null` also
/// matches a missing field, `$set` updates, and upserts seeded from the
/// filter.
#[derive(Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<Collection, Vec<Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently held in `collection`.
    pub fn len(&self, collection: Collection) -> usize {
        self.lock()
            .map(|collections| collections.get(&collection).map_or(0, Vec::len))
            .unwrap_or(0)
    }

    pub fn is_empty(&self, collection: Collection) -> bool {
        self.len(collection) == 0
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<Collection, Vec<Document>>>, AppError> {
        self.collections.lock().map_err(|e| {
            AppError::InternalError(anyhow::anyhow!("Memory store mutex poisoned: {}", e))
        })
    }
}

fn matches(document: &Document, filter: &Document) -> bool {
    filter.iter().all(|(key, expected)| match (document.get(key), expected) {
        (None, Bson::Null) => true,
        (Some(actual), expected) => actual == expected,
        (None, _) => false,
    })
}

fn with_id_first(id: Bson, document: Document) -> Document {
    let mut stored = Document::new();
    stored.insert("_id", id);
    for (key, value) in document {
        if key != "_id" {
            stored.insert(key, value);
        }
    }
    stored
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find_one(
        &self,
        collection: Collection,
        filter: Document,
    ) -> Result<Option<Document>, AppError> {
        let collections = self.lock()?;
        Ok(collections
            .get(&collection)
            .and_then(|documents| documents.iter().find(|d| matches(d, &filter)))
            .cloned())
    }

    async fn find(
        &self,
        collection: Collection,
        filter: Document,
    ) -> Result<Vec<Document>, AppError> {
        let collections = self.lock()?;
        Ok(collections
            .get(&collection)
            .map(|documents| {
                documents
                    .iter()
                    .filter(|d| matches(d, &filter))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn insert_one(
        &self,
        collection: Collection,
        document: Document,
    ) -> Result<InsertOutcome, AppError> {
        let id = document
            .get("_id")
            .cloned()
            .unwrap_or_else(|| Bson::ObjectId(ObjectId::new()));

        let mut collections = self.lock()?;
        let documents = collections.entry(collection).or_default();
        if documents.iter().any(|d| d.get("_id") == Some(&id)) {
            return Err(AppError::DatabaseError(anyhow::anyhow!(
                "E11000 duplicate key error collection: {} index: _id_",
                collection
            )));
        }
        documents.push(with_id_first(id.clone(), document));

        Ok(InsertOutcome::new(id))
    }

    async fn update_one(
        &self,
        collection: Collection,
        filter: Document,
        set: Document,
        upsert: bool,
    ) -> Result<UpdateOutcome, AppError> {
        let mut collections = self.lock()?;
        let documents = collections.entry(collection).or_default();

        if let Some(existing) = documents.iter_mut().find(|d| matches(d, &filter)) {
            let mut modified = false;
            for (key, value) in set {
                if key == "_id" {
                    continue;
                }
                if existing.get(&key) != Some(&value) {
                    existing.insert(key, value);
                    modified = true;
                }
            }
            return Ok(UpdateOutcome::new(1, u64::from(modified), None));
        }

        if !upsert {
            return Ok(UpdateOutcome::new(0, 0, None));
        }

        let id = filter
            .get("_id")
            .cloned()
            .unwrap_or_else(|| Bson::ObjectId(ObjectId::new()));
        let mut seeded = filter;
        for (key, value) in set {
            seeded.insert(key, value);
        }
        documents.push(with_id_first(id.clone(), seeded));

        Ok(UpdateOutcome::new(0, 0, Some(id)))
    }

    async fn delete_one(
        &self,
        collection: Collection,
        filter: Document,
    ) -> Result<DeleteOutcome, AppError> {
        let mut collections = self.lock()?;
        let deleted = match collections.get_mut(&collection) {
            Some(documents) => match documents.iter().position(|d| matches(d, &filter)) {
                Some(index) => {
                    documents.remove(index);
                    1
                }
                None => 0,
            },
            None => 0,
        };
        Ok(DeleteOutcome::new(deleted))
    }

    async fn health_check(&self) -> Result<(), AppError> {
        self.lock().map(|_| ())
    }
}
