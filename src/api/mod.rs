//! Hospimap HTTP API
//!
//! HTTP layer for the dashboard, built with Axum. Every handler reads the
//! immutable dataset; nothing is written after startup.
//!
//! # Endpoints
//!
//! ## Dashboard
//! - `GET /` - Single-page dashboard
//!
//! ## Charts
//! - `GET /api/v1/options` - Metric choices, date bounds, departments
//! - `GET /api/v1/map` - Choropleth for a metric and day
//! - `GET /api/v1/trend` - Female/male bars, national or for one department
//! - `GET /api/v1/geojson` - Department boundaries
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! # Example
//!
//! ```rust,ignore
//! use hospimap::api::{serve, AppState};
//! use hospimap::config::Config;
//! use hospimap::dataset::Dataset;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default();
//!     let dataset = Arc::new(Dataset::load(&config.source).await?);
//!
//!     let state = AppState::new(dataset, config.api.clone());
//!     serve(state, &config.api).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::{http::HeaderValue, routing::get, Router};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::ApiConfig;

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    let api_routes = Router::new()
        .route("/options", get(routes::options::dashboard_options))
        .route("/map", get(routes::map::map_figure))
        .route("/trend", get(routes::trend::trend_figure))
        .route("/geojson", get(routes::geojson::boundaries));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    // Create shared state
    let shared_state = Arc::new(state);

    Router::new()
        .route("/", get(routes::dashboard::index))
        .nest("/api/v1", api_routes)
        .nest("/health", health_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(shared_state)
}

fn cors_layer(config: &ApiConfig) -> CorsLayer {
    if config.cors_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new().allow_origin(AllowOrigin::list(origins))
}

/// Start the API server
pub async fn serve(state: AppState, config: &ApiConfig) -> Result<(), ApiError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Hospimap dashboard listening on http://{}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Hospimap shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::context::tests::sample_dataset;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        response::Response,
    };
    use serde_json::Value;
    use tower::util::ServiceExt;

    fn create_test_app() -> Router {
        let dataset = Arc::new(sample_dataset());
        let state = AppState::new(dataset, ApiConfig::default());
        build_router(state)
    }

    async fn request(uri: &str) -> Response {
        create_test_app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn get_json(uri: &str) -> (StatusCode, Value) {
        let response = request(uri).await;
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_health_live() {
        assert_eq!(request("/health/live").await.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_ready() {
        assert_eq!(request("/health/ready").await.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_full() {
        let (status, body) = get_json("/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["dataset"]["records"], 18);
        assert_eq!(body["dataset"]["dropped_overseas"], 1);
    }

    #[tokio::test]
    async fn test_dashboard_page() {
        let response = request("/").await;

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
        assert!(content_type.starts_with("text/html"));
    }

    #[tokio::test]
    async fn test_options() {
        let (status, body) = get_json("/api/v1/options").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["first_day"], "2020-03-18");
        assert_eq!(body["last_day"], "2020-03-20");
        assert_eq!(body["default_metric"], "deaths");
        assert_eq!(body["metrics"].as_array().unwrap().len(), 4);
        assert_eq!(body["departments"][1]["name"], "Paris");
    }

    #[tokio::test]
    async fn test_map_defaults_to_last_day() {
        let (status, body) = get_json("/api/v1/map").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"][0]["type"], "choropleth");
        assert_eq!(body["data"][0]["z"], serde_json::json!([2, 4]));
    }

    #[tokio::test]
    async fn test_map_rows() {
        let (status, body) =
            get_json("/api/v1/map?metric=hospitalised&date=19/03/2020&format=json").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["date"], "2020-03-19");
        assert_eq!(body["row_count"], 2);
        assert_eq!(body["rows"][1]["code"], "75");
        assert_eq!(body["rows"][1]["value"], 12);
    }

    #[tokio::test]
    async fn test_map_empty_selection_renders_empty_chart() {
        let (status, body) = get_json("/api/v1/map?date=2021-01-01").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["data"].as_array().unwrap().is_empty());
        assert_eq!(
            body["layout"]["annotations"][0]["text"],
            "No data for this selection"
        );
    }

    #[tokio::test]
    async fn test_map_invalid_inputs() {
        let (status, body) = get_json("/api/v1/map?metric=cases").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_METRIC");

        let (status, body) = get_json("/api/v1/map?date=2020/03/18").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_DATE");

        let (status, _) = get_json("/api/v1/map?format=xml").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_map_csv() {
        let response = request("/api/v1/map?metric=deaths&date=2020-03-18&format=csv").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv");
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"code,name,value\n01,Ain,1\n75,Paris,2\n");
    }

    #[tokio::test]
    async fn test_trend_national_figure() {
        let (status, body) = get_json("/api/v1/trend?metric=hospitalised").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"][0]["name"], "female");
        assert_eq!(body["data"][1]["name"], "male");
        assert_eq!(body["data"][0]["y"], serde_json::json!([6, 8, 9]));
    }

    #[tokio::test]
    async fn test_trend_region_then_cleared() {
        let (_, national) = get_json("/api/v1/trend?metric=deaths&format=json").await;
        let (_, paris) = get_json("/api/v1/trend?metric=deaths&region=75&format=json").await;
        let (_, cleared) = get_json("/api/v1/trend?metric=deaths&region=&format=json").await;

        assert_eq!(paris["region"]["name"], "Paris");
        assert_ne!(paris, national);
        assert_eq!(cleared, national);
        assert_eq!(national["row_count"], 6);
        assert_eq!(national["rows"][0]["sex"], "female");
        assert_eq!(national["rows"][3]["sex"], "male");
    }

    #[tokio::test]
    async fn test_trend_unknown_region_renders_empty_chart() {
        let (status, body) = get_json("/api/v1/trend?region=2A").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["data"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_trend_empty_rows_keep_region() {
        let (status, body) = get_json("/api/v1/trend?region=2A&format=json").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["row_count"], 0);
        assert_eq!(body["region"]["code"], "2A");
        assert_eq!(body["region"]["name"], "Corse-du-Sud");
    }

    #[tokio::test]
    async fn test_empty_csv_has_header() {
        let response = request("/api/v1/trend?region=2A&format=csv").await;
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"day,sex,value\n");

        let response = request("/api/v1/map?date=2021-01-01&format=csv").await;
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"code,name,value\n");
    }

    #[tokio::test]
    async fn test_geojson() {
        let (status, body) = get_json("/api/v1/geojson").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["type"], "FeatureCollection");
        assert_eq!(body["features"].as_array().unwrap().len(), 3);
    }
}
