use mongodb::bson::{self, doc, Document};
use serde::Deserialize;
use service_core::error::AppError;

/// Body of `PUT /orders/:id`. Only `status` is read; it is free text and a
/// missing value is written as `null`.
#[derive(Debug, Default, Deserialize)]
pub struct OrderStatusUpdate {
    #[serde(default)]
    pub status: Option<serde_json::Value>,
}

impl OrderStatusUpdate {
    pub fn into_set(self) -> Result<Document, AppError> {
        Ok(doc! { "status": bson::to_bson(&self.status)? })
    }
}
