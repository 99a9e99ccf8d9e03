use crate::models::{document_from_json, document_to_json, object_id, Collection, InsertOutcome};
use crate::startup::AppState;
use axum::extract::{Path, State};
use mongodb::bson::doc;
use serde_json::Value;
use service_core::error::AppError;
use service_core::extract::Json;

/// `GET /products`
pub async fn list_products(State(state): State<AppState>) -> Result<Json<Vec<Value>>, AppError> {
    let products = state.store.find(Collection::Products, doc! {}).await?;
    Ok(Json(products.into_iter().map(document_to_json).collect()))
}

/// `POST /products`
pub async fn create_product(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<InsertOutcome>, AppError> {
    tracing::info!(product = %body, "Inserting product");
    let product = document_from_json(body)?;

    let outcome = state.store.insert_one(Collection::Products, product).await?;
    tracing::info!(inserted_id = %outcome.inserted_id, "Product inserted");

    Ok(Json(outcome))
}

/// `GET /products/:id`: the product, or `null`.
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Option<Value>>, AppError> {
    let id = object_id(&id)?;
    let product = state
        .store
        .find_one(Collection::Products, doc! { "_id": id })
        .await?;

    Ok(Json(product.map(document_to_json)))
}

/// `DELETE /products/:id`: answers `1` whether or not anything was removed.
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<u8>, AppError> {
    let oid = object_id(&id)?;
    tracing::info!(id = %id, "Deleting product");

    let outcome = state
        .store
        .delete_one(Collection::Products, doc! { "_id": oid })
        .await?;
    tracing::info!(id = %id, deleted = outcome.deleted_count, "Product delete finished");

    Ok(Json(1))
}
