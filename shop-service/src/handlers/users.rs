use crate::dtos::{email_filter, AdminStatus, UserRole};
use crate::models::{document_from_json, Collection, InsertOutcome, UpdateOutcome};
use crate::startup::AppState;
use axum::extract::{Path, State};
use mongodb::bson::doc;
use serde_json::Value;
use service_core::error::AppError;
use service_core::extract::Json;

/// `GET /users/:email`
pub async fn admin_status(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<AdminStatus>, AppError> {
    lookup_admin(&state, &email).await
}

/// `GET /users/admin`: the static `PUT /users/admin` route owns this path, so
/// the lookup for a user whose email is literally `admin` lands here.
pub async fn admin_status_of_admin(
    State(state): State<AppState>,
) -> Result<Json<AdminStatus>, AppError> {
    lookup_admin(&state, "admin").await
}

async fn lookup_admin(state: &AppState, email: &str) -> Result<Json<AdminStatus>, AppError> {
    let user = state
        .store
        .find_one(Collection::Users, doc! { "email": email })
        .await?;

    let admin = user
        .as_ref()
        .map(UserRole::from_document)
        .is_some_and(|role| role.is_admin());

    Ok(Json(AdminStatus { admin }))
}

/// `POST /users`
pub async fn create_user(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<InsertOutcome>, AppError> {
    let user = document_from_json(body)?;
    tracing::info!(collection = "users", "Inserting user");

    let outcome = state.store.insert_one(Collection::Users, user).await?;
    tracing::info!(inserted_id = %outcome.inserted_id, "User inserted");

    Ok(Json(outcome))
}

/// `PUT /users`: upsert keyed by `email`, used after third-party sign-in.
pub async fn upsert_user(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<UpdateOutcome>, AppError> {
    let filter = email_filter(&body)?;
    let user = document_from_json(body)?;
    tracing::info!(filter = %filter, "Upserting user");

    let outcome = state
        .store
        .update_one(Collection::Users, filter, user, true)
        .await?;
    tracing::info!(
        matched = outcome.matched_count,
        upserted = outcome.upserted_count,
        "User upserted"
    );

    Ok(Json(outcome))
}

/// `PUT /users/admin`: sets `role: "admin"` on the user named by `email`.
/// Never creates a user.
pub async fn make_admin(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<UpdateOutcome>, AppError> {
    let filter = email_filter(&body)?;
    tracing::info!(filter = %filter, "Granting admin role");

    let outcome = state
        .store
        .update_one(Collection::Users, filter, doc! { "role": "admin" }, false)
        .await?;
    tracing::info!(
        matched = outcome.matched_count,
        modified = outcome.modified_count,
        "Admin role update finished"
    );

    Ok(Json(outcome))
}
