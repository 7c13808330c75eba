//! Route configuration and setup

use axum::{
    http::{HeaderValue, Method},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crewdesk_core::Config;

use crate::api_doc::ApiDoc;
use crate::constants::{API_PREFIX, MAX_BODY_BYTES};
use crate::handlers;
use crate::middleware::service_key_middleware;
use crate::state::AppState;

/// Setup all application routes
pub async fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router, anyhow::Error> {
    let cors = setup_cors(config)?;
    let service_key = Arc::new(config.service_api_key.clone());

    // Resource routes behind the service key check
    let protected_routes = Router::new()
        .route(
            "/staff",
            get(handlers::staff::list_staff).post(handlers::staff::create_staff),
        )
        .route(
            "/staff/{id}",
            get(handlers::staff::get_staff)
                .put(handlers::staff::update_staff)
                .delete(handlers::staff::delete_staff),
        )
        .route("/clients", get(handlers::clients::list_clients))
        .route("/clients/{id}", get(handlers::clients::get_client))
        .route(
            "/departments",
            get(handlers::departments::list_departments),
        )
        .route("/omni/businesses", get(handlers::omni::list_businesses))
        .route(
            "/omni/subscriptions",
            get(handlers::omni::list_subscriptions),
        )
        .route("/omni/dashboard", get(handlers::omni::dashboard_summary))
        .layer(axum::middleware::from_fn_with_state(
            service_key,
            service_key_middleware,
        ));

    // The OpenAPI document stays public so /docs works without a key
    let api_routes = Router::new()
        .route("/openapi.json", get(openapi_spec))
        .merge(protected_routes);

    let app = Router::new()
        .route("/health", get(health))
        .nest(API_PREFIX, api_routes)
        .nest(
            "/docs",
            utoipa_rapidoc::RapiDoc::new("/api/openapi.json")
                .path("/docs")
                .into(),
        )
        .with_state(state)
        .layer(ConcurrencyLimitLayer::new(config.http_concurrency_limit))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    Ok(app)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn openapi_spec() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins.iter().any(|origin| origin == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins
            .iter()
            .map(|origin| {
                origin
                    .parse::<HeaderValue>()
                    .map_err(|e| anyhow::anyhow!("Invalid CORS origin '{}': {}", origin, e))
            })
            .collect::<Result<Vec<_>, _>>()?;
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers(Any)
    };
    Ok(cors)
}
