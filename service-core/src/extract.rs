use crate::error::AppError;
use axum::{
    extract::FromRequest,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Drop-in for `axum::Json` whose rejections (wrong content type, invalid
/// JSON, wrong shape) answer with the [`AppError`] JSON body instead of
/// axum's plain-text one.
#[derive(Debug, Clone, Copy, Default, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
        routing::post,
    };
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Deserialize, Serialize)]
    struct Status {
        status: String,
    }

    async fn echo(Json(body): Json<Status>) -> Json<Status> {
        Json(body)
    }

    async fn send(content_type: Option<&str>, body: &'static str) -> (StatusCode, serde_json::Value) {
        let mut request = Request::builder().method("POST").uri("/");
        if let Some(content_type) = content_type {
            request = request.header(header::CONTENT_TYPE, content_type);
        }
        let response = Router::new()
            .route("/", post(echo))
            .oneshot(request.body(Body::from(body)).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn well_formed_body_is_extracted() {
        let (status, body) = send(Some("application/json"), r#"{"status":"shipped"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "shipped");
    }

    #[tokio::test]
    async fn wrong_shape_is_a_json_bad_request() {
        let (status, body) = send(Some("application/json"), r#""shipped""#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("Invalid JSON body"));
    }

    #[tokio::test]
    async fn missing_content_type_is_a_json_bad_request() {
        let (status, body) = send(None, r#"{"status":"shipped"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("Content-Type"));
    }
}
