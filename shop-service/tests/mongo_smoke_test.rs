//! Runs the order scenario against a real MongoDB.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use serde_json::{json, Value};
use shop_service::services::MongoDb;
use shop_service::{build_router, AppState};
use std::sync::Arc;
use tower::util::ServiceExt;

async fn call(router: &axum::Router, method: Method, uri: &str, body: Option<Value>) -> Value {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    let body = body
        .map(|b| Body::from(serde_json::to_vec(&b).unwrap()))
        .unwrap_or_else(Body::empty);

    let response = router
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
#[ignore = "Requires MongoDB running on localhost:27017 (or MONGODB_URI)"]
async fn order_scenario_against_mongodb() {
    dotenvy::dotenv().ok();
    let uri =
        std::env::var("MONGODB_URI").unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
    let db_name = format!("bike_shop_test_{}", uuid::Uuid::new_v4().simple());

    let db = MongoDb::connect(&uri, &db_name)
        .await
        .expect("Failed to connect to DB");
    let router = build_router(AppState::new(Arc::new(db.clone())));

    let inserted = call(
        &router,
        Method::POST,
        "/orders",
        Some(json!({ "email": "a@x.com", "status": "pending" })),
    )
    .await;
    let id = inserted["insertedId"].as_str().unwrap().to_string();

    call(
        &router,
        Method::PUT,
        &format!("/orders/{}", id),
        Some(json!({ "status": "shipped" })),
    )
    .await;

    let orders = call(&router, Method::GET, "/orders/a@x.com", None).await;
    assert_eq!(
        orders,
        json!([{ "_id": id, "email": "a@x.com", "status": "shipped" }])
    );

    assert_eq!(
        call(&router, Method::DELETE, &format!("/orders/{}", id), None).await,
        json!(1)
    );

    let _ = db.client().database(&db_name).drop(None).await;
}
