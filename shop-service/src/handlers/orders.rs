use crate::dtos::OrderStatusUpdate;
use crate::models::{
    document_from_json, document_to_json, object_id, Collection, InsertOutcome, UpdateOutcome,
};
use crate::startup::AppState;
use axum::extract::{Path, State};
use mongodb::bson::doc;
use serde_json::Value;
use service_core::error::AppError;
use service_core::extract::Json;

/// `GET /orders`
pub async fn list_orders(State(state): State<AppState>) -> Result<Json<Vec<Value>>, AppError> {
    let orders = state.store.find(Collection::Orders, doc! {}).await?;
    Ok(Json(orders.into_iter().map(document_to_json).collect()))
}

/// `POST /orders`
pub async fn create_order(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<InsertOutcome>, AppError> {
    tracing::info!(order = %body, "Inserting order");
    let order = document_from_json(body)?;

    let outcome = state.store.insert_one(Collection::Orders, order).await?;
    tracing::info!(inserted_id = %outcome.inserted_id, "Order inserted");

    Ok(Json(outcome))
}

/// `GET /orders/:email`: every order placed with that email.
pub async fn orders_by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<Vec<Value>>, AppError> {
    let orders = state
        .store
        .find(Collection::Orders, doc! { "email": email })
        .await?;

    Ok(Json(orders.into_iter().map(document_to_json).collect()))
}

/// `PUT /orders/:id`: overwrites `status` only, upserting when the id is
/// unknown. No transition rules apply.
pub async fn update_order_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<OrderStatusUpdate>,
) -> Result<Json<UpdateOutcome>, AppError> {
    let oid = object_id(&id)?;
    let set = update.into_set()?;
    tracing::info!(id = %id, "Updating order status");

    let outcome = state
        .store
        .update_one(Collection::Orders, doc! { "_id": oid }, set, true)
        .await?;
    tracing::info!(
        id = %id,
        matched = outcome.matched_count,
        modified = outcome.modified_count,
        upserted = outcome.upserted_count,
        "Order status updated"
    );

    Ok(Json(outcome))
}

/// `DELETE /orders/:id`: answers `1` whether or not anything was removed.
pub async fn delete_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<u8>, AppError> {
    let oid = object_id(&id)?;
    tracing::info!(id = %id, "Deleting order");

    let outcome = state
        .store
        .delete_one(Collection::Orders, doc! { "_id": oid })
        .await?;
    tracing::info!(id = %id, deleted = outcome.deleted_count, "Order delete finished");

    Ok(Json(1))
}
