use crate::config::{MongoConfig, ShopConfig};
use crate::handlers::{self, orders, products, reviews, users};
use crate::services::{DocumentStore, MongoDb, UnavailableStore};
use axum::{
    http::Request,
    middleware::from_fn,
    routing::{get, post, put},
    Router,
};
use secrecy::ExposeSecret;
use service_core::error::AppError;
use service_core::middleware::{metrics_middleware, request_id_middleware, REQUEST_ID_HEADER};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::hello))
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics))
        // Users
        .route("/users", post(users::create_user).put(users::upsert_user))
        .route(
            "/users/admin",
            put(users::make_admin).get(users::admin_status_of_admin),
        )
        .route("/users/:email", get(users::admin_status))
        // Products
        .route(
            "/products",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/products/:id",
            get(products::get_product).delete(products::delete_product),
        )
        // Orders; GET reads the segment as an email, PUT/DELETE as an id
        .route("/orders", get(orders::list_orders).post(orders::create_order))
        .route(
            "/orders/:id",
            get(orders::orders_by_email)
                .put(orders::update_order_status)
                .delete(orders::delete_order),
        )
        // Reviews
        .route("/review", post(reviews::create_review))
        .route("/reviews", get(reviews::list_reviews))
        .with_state(state)
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

/// Open the database and decide what the service runs against.
///
/// With `fail_fast` any failure is returned to the caller. Otherwise a client
/// that cannot reach the cluster is still used (the driver keeps retrying
/// server selection per request), and a client that cannot be built at all
/// is replaced by [`UnavailableStore`], so requests get a 503 instead of the
/// process exiting. The same happens when no connection string was
/// configured.
pub async fn initialize_store(config: &MongoConfig) -> Result<Arc<dyn DocumentStore>, AppError> {
    let Some(uri) = config.uri.as_ref() else {
        if config.fail_fast {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "No MongoDB connection string configured"
            )));
        }
        tracing::error!(
            "DB_USER/DB_PASS or MONGODB_URI not set, serving without a database"
        );
        return Ok(Arc::new(UnavailableStore));
    };

    let db = match MongoDb::connect(uri.expose_secret(), &config.database).await {
        Ok(db) => db,
        Err(e) if config.fail_fast => return Err(e),
        Err(e) => {
            tracing::error!(
                "Failed to create MongoDB client, serving without a database: {}",
                e
            );
            return Ok(Arc::new(UnavailableStore));
        }
    };

    match db.health_check().await {
        Ok(()) => tracing::info!(database = %config.database, "Database connected"),
        Err(e) if config.fail_fast => return Err(e),
        Err(e) => tracing::error!("MongoDB unreachable at startup, serving anyway: {}", e),
    }

    Ok(Arc::new(db))
}

pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    pub async fn build(config: ShopConfig) -> Result<Self, AppError> {
        let store = initialize_store(&config.mongodb).await?;
        Self::build_with_store(config.common.port, store).await
    }

    /// Bind `port` (0 picks a free one) and route to `store`.
    pub async fn build_with_store(
        port: u16,
        store: Arc<dyn DocumentStore>,
    ) -> Result<Self, AppError> {
        let router = build_router(AppState::new(store));

        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router).await
    }

    pub async fn run_with_shutdown<F>(self, signal: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(signal)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Collection;
    use mongodb::bson::doc;
    use secrecy::Secret;

    fn mongo_config(uri: Option<&str>, fail_fast: bool) -> MongoConfig {
        MongoConfig {
            uri: uri.map(|uri| Secret::new(uri.to_string())),
            database: "bike-shop-test".to_string(),
            fail_fast,
        }
    }

    #[tokio::test]
    async fn unusable_uri_fails_startup_under_fail_fast() {
        let result = initialize_store(&mongo_config(Some("not-a-uri"), true)).await;
        assert!(matches!(result, Err(AppError::DatabaseError(_))));
    }

    #[tokio::test]
    async fn unusable_uri_degrades_to_unavailable_store() {
        let store = initialize_store(&mongo_config(Some("not-a-uri"), false))
            .await
            .unwrap();

        let err = store.find(Collection::Products, doc! {}).await.unwrap_err();
        assert!(matches!(err, AppError::ServiceUnavailable));
    }

    #[tokio::test]
    async fn missing_uri_fails_startup_under_fail_fast() {
        let result = initialize_store(&mongo_config(None, true)).await;
        assert!(matches!(result, Err(AppError::ConfigError(_))));
    }

    #[tokio::test]
    async fn missing_uri_degrades_to_unavailable_store() {
        let store = initialize_store(&mongo_config(None, false)).await.unwrap();

        let err = store.health_check().await.unwrap_err();
        assert!(matches!(err, AppError::ServiceUnavailable));
    }
}
