#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use homewatch_core::rules::{DailyForecast, NotificationPass};
use homewatch_core::sources::{BulletinBoard, ForecastProvider, SourceError};
use homewatch_core::types::Timestamp;
use homewatch_db::PgReadingStore;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use homewatch_api::config::{MonitoringConfig, ServerConfig};
use homewatch_api::routes;
use homewatch_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults and no external feeds.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        monitoring: MonitoringConfig::default(),
    }
}

/// A notification pass over the test database with no external feeds.
pub fn store_only_pass(pool: &PgPool) -> NotificationPass {
    NotificationPass::new(
        Arc::new(PgReadingStore::new(pool.clone())),
        MonitoringConfig::default().pass_settings(),
    )
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
///
/// This mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack that production uses.
pub fn build_test_app(pool: PgPool) -> Router {
    let pass = store_only_pass(&pool);
    build_test_app_with(pool, pass)
}

/// Same as [`build_test_app`] with a caller-supplied notification pass.
pub fn build_test_app_with(pool: PgPool, notifier: NotificationPass) -> Router {
    build_test_app_from(pool, test_config(), notifier)
}

/// Same as [`build_test_app`] with a caller-supplied configuration.
pub fn build_test_app_with_config(pool: PgPool, config: ServerConfig) -> Router {
    let pass = store_only_pass(&pool);
    build_test_app_from(pool, config, pass)
}

fn build_test_app_from(pool: PgPool, config: ServerConfig, notifier: NotificationPass) -> Router {
    let state = AppState {
        pool,
        config: Arc::new(config),
        notifier: Arc::new(notifier),
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Send a GET request through the router.
pub async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

/// Send a request with a JSON body through the router.
pub async fn send_json(app: Router, method: Method, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a bodiless request with the given method.
pub async fn send(app: Router, method: Method, uri: &str) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fake external feeds
// ---------------------------------------------------------------------------

/// Forecast provider that always answers with the same day.
pub struct FixedForecast(pub DailyForecast);

#[async_trait]
impl ForecastProvider for FixedForecast {
    async fn daily_forecast(
        &self,
        _latitude: f64,
        _longitude: f64,
        _at: Timestamp,
        _language: &str,
    ) -> Result<DailyForecast, SourceError> {
        Ok(self.0.clone())
    }
}

/// Forecast provider that is always down.
pub struct DownForecast;

#[async_trait]
impl ForecastProvider for DownForecast {
    async fn daily_forecast(
        &self,
        _latitude: f64,
        _longitude: f64,
        _at: Timestamp,
        _language: &str,
    ) -> Result<DailyForecast, SourceError> {
        Err(SourceError::Unavailable("connection refused".into()))
    }
}

/// Spreadsheet with fixed rows.
pub struct FixedBulletin(pub Vec<Vec<String>>);

#[async_trait]
impl BulletinBoard for FixedBulletin {
    async fn rows(&self) -> Result<Vec<Vec<String>>, SourceError> {
        Ok(self.0.clone())
    }
}
