//! Conversion between client JSON and stored BSON documents.
//!
//! Documents are schema-less. Identifiers are `ObjectId`s in storage and plain
//! 24-character hex strings on the wire, which is what the storefront client
//! reads back from `_id` and sends in `/products/:id` and `/orders/:id`.

use mongodb::bson::{self, oid::ObjectId, Bson, Document};
use serde_json::{Map, Value};
use service_core::error::AppError;

/// Convert a request body into a BSON document. Anything but a JSON object is
/// rejected.
pub fn document_from_json(value: Value) -> Result<Document, AppError> {
    match value {
        Value::Object(map) => Ok(bson::to_document(&map)?),
        other => Err(AppError::BadRequest(anyhow::anyhow!(
            "Expected a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

/// Render a stored document as client JSON.
pub fn document_to_json(document: Document) -> Value {
    bson_to_json(Bson::Document(document))
}

/// Parse a path identifier.
pub fn object_id(id: &str) -> Result<ObjectId, AppError> {
    Ok(ObjectId::parse_str(id)?)
}

pub(crate) fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::Document(document) => Value::Object(
            document
                .into_iter()
                .map(|(key, value)| (key, bson_to_json(value)))
                .collect::<Map<String, Value>>(),
        ),
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_to_json).collect()),
        other => other.into_relaxed_extjson(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
