// loan-document-service/src/http/mod.rs

mod handlers;

use crate::pipeline::DocumentPipeline;
use axum::http::{header, HeaderName, Method};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");
pub const CHECKSUM_HEADER: HeaderName = HeaderName::from_static("x-content-sha256");

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<DocumentPipeline>,
    pub service_name: String,
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .expose_headers([
            header::CONTENT_DISPOSITION,
            REQUEST_ID_HEADER,
            CHECKSUM_HEADER,
        ]);

    Router::new()
        .route("/health", get(handlers::health_check))
        .route(
            "/api/generate-borrower-info-pdf",
            post(handlers::generate_borrower_info_pdf),
        )
        .route(
            "/api/generate-seeds-direct-debit-mandate-pdf",
            post(handlers::generate_mandate_pdf).get(handlers::preview_mandate),
        )
        .route(
            "/api/seeds-direct-debit-mandate",
            post(handlers::generate_legacy_mandate_pdf).get(handlers::preview_legacy_mandate),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
