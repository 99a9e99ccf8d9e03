use crate::models::{document_from_json, document_to_json, Collection, InsertOutcome};
use crate::startup::AppState;
use axum::extract::State;
use mongodb::bson::doc;
use serde_json::Value;
use service_core::error::AppError;
use service_core::extract::Json;

/// `POST /review`
pub async fn create_review(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<InsertOutcome>, AppError> {
    tracing::info!(review = %body, "Inserting review");
    let review = document_from_json(body)?;

    let outcome = state.store.insert_one(Collection::Reviews, review).await?;
    tracing::info!(inserted_id = %outcome.inserted_id, "Review inserted");

    Ok(Json(outcome))
}

/// `GET /reviews`
pub async fn list_reviews(State(state): State<AppState>) -> Result<Json<Vec<Value>>, AppError> {
    let reviews = state.store.find(Collection::Reviews, doc! {}).await?;
    Ok(Json(reviews.into_iter().map(document_to_json).collect()))
}
