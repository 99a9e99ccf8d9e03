#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use shop_service::services::MemoryStore;
use shop_service::{build_router, AppState};
use std::sync::Arc;
use tower::util::ServiceExt;

/// Router wired to a fresh in-memory store.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let router = build_router(AppState::new(store.clone()));
        Self { router, store }
    }

    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&json).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, bytes.to_vec())
    }

    /// Send `body` as-is, with `content_type` if given.
    pub async fn send_raw(
        &self,
        method: Method,
        uri: &str,
        content_type: Option<&str>,
        body: &'static str,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        let request = builder.body(Body::from(body)).unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    pub async fn json(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let (status, bytes) = self.send(method, uri, body).await;
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str) -> Value {
        let (status, value) = self.json(Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::OK, "GET {} failed: {}", uri, value);
        value
    }

    pub async fn post(&self, uri: &str, body: Value) -> Value {
        let (status, value) = self.json(Method::POST, uri, Some(body)).await;
        assert_eq!(status, StatusCode::OK, "POST {} failed: {}", uri, value);
        value
    }

    pub async fn put(&self, uri: &str, body: Value) -> Value {
        let (status, value) = self.json(Method::PUT, uri, Some(body)).await;
        assert_eq!(status, StatusCode::OK, "PUT {} failed: {}", uri, value);
        value
    }

    pub async fn delete(&self, uri: &str) -> Value {
        let (status, value) = self.json(Method::DELETE, uri, None).await;
        assert_eq!(status, StatusCode::OK, "DELETE {} failed: {}", uri, value);
        value
    }

    /// POST and return the assigned identifier.
    pub async fn insert(&self, uri: &str, body: Value) -> String {
        let outcome = self.post(uri, body).await;
        outcome["insertedId"]
            .as_str()
            .expect("insertedId should be a hex string")
            .to_string()
    }
}
