//! Router construction: versioned API routes, docs, and HTTP layers.

use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

use crate::api_doc::ApiDoc;
use crate::constants::API_PREFIX;
use crate::handlers;
use crate::state::AppState;
use ideaport_core::Config;

pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Router {
    let cors = if config.cors_origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let api = Router::new()
        .route("/campaigns", post(handlers::campaigns::create_campaign))
        .route(
            "/campaigns/{id}",
            get(handlers::campaigns::get_campaign).put(handlers::campaigns::update_campaign),
        )
        .route("/ideas", post(handlers::ideas::create_idea))
        .route(
            "/ideas/{id}",
            get(handlers::ideas::get_idea).put(handlers::ideas::update_idea),
        )
        .route("/ideas/{id}/submit", post(handlers::ideas::submit_idea))
        .route(
            "/ideas/{id}/contributors",
            post(handlers::ideas::add_contributor).get(handlers::ideas::list_contributors),
        )
        .route(
            "/ideas/{id}/documents",
            get(handlers::ideas::list_idea_documents),
        )
        .route("/documents", post(handlers::documents::upload_document))
        .route(
            "/documents/{id}/scan-status",
            get(handlers::documents::scan_status),
        )
        .route(
            "/documents/{id}/download",
            get(handlers::documents::download_document),
        );

    // Body limit sits above the configured file limit so oversized uploads
    // reach the pipeline's own size validation and get a specific 413.
    let body_limit = state.documents.max_file_size * 2;

    Router::new()
        .route("/health", get(handlers::health::health))
        .nest(API_PREFIX, api)
        .merge(RapiDoc::with_openapi("/api-docs/openapi.json", ApiDoc::openapi()).path("/rapidoc"))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
