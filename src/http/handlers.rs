// loan-document-service/src/http/handlers.rs

use crate::error::{ApiError, DocumentError};
use crate::http::{AppState, CHECKSUM_HEADER, REQUEST_ID_HEADER};
use crate::models::{BorrowerInfo, DirectDebitMandate, RenderedDocument};
use crate::pipeline::AssetMode;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use std::collections::HashMap;
use tracing::{info, Instrument};
use uuid::Uuid;

const BORROWER_INFO_FAILED: &str = "Failed to generate PDF";
const MANDATE_FAILED: &str = "Mandate generation failed";
const PREVIEW_FAILED: &str = "Preview generation failed";

pub async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": state.service_name,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn generate_borrower_info_pdf(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let request_id = Uuid::new_v4().to_string();
    let span = tracing::info_span!("borrower_info_pdf", request_id = %request_id);

    async move {
        info!(size_bytes = body.len(), "Starting PDF generation");

        let info: BorrowerInfo = serde_json::from_slice(&body)
            .map_err(|e| ApiError::new(BORROWER_INFO_FAILED, e.into()))?;

        let document = state
            .pipeline
            .borrower_info_pdf(info)
            .await
            .map_err(|e| ApiError::new(BORROWER_INFO_FAILED, e))?;

        Ok::<_, ApiError>(pdf_response(&request_id, document))
    }
    .instrument(span)
    .await
}

pub async fn generate_mandate_pdf(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, ApiError> {
    mandate_pdf(state, body, AssetMode::Inline).await
}

/// Earlier revision of the mandate endpoint; artwork is referenced, not inlined.
pub async fn generate_legacy_mandate_pdf(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, ApiError> {
    mandate_pdf(state, body, AssetMode::Remote).await
}

pub async fn preview_mandate(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Html<String>, ApiError> {
    mandate_preview(state, params, AssetMode::Inline).await
}

pub async fn preview_legacy_mandate(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Html<String>, ApiError> {
    mandate_preview(state, params, AssetMode::Remote).await
}

async fn mandate_pdf(state: AppState, body: Bytes, mode: AssetMode) -> Result<Response, ApiError> {
    let request_id = Uuid::new_v4().to_string();
    let span = tracing::info_span!("mandate_pdf", request_id = %request_id, mode = ?mode);

    async move {
        info!("Starting Direct Debit Mandate generation");

        let mandate: DirectDebitMandate = serde_json::from_slice(&body)
            .map_err(|e| ApiError::new(MANDATE_FAILED, e.into()))?;

        let document = state
            .pipeline
            .mandate_pdf(mandate, mode)
            .await
            .map_err(|e| ApiError::new(MANDATE_FAILED, e))?;

        Ok::<_, ApiError>(pdf_response(&request_id, document))
    }
    .instrument(span)
    .await
}

async fn mandate_preview(
    state: AppState,
    params: HashMap<String, String>,
    mode: AssetMode,
) -> Result<Html<String>, ApiError> {
    let mandate = DirectDebitMandate::example_with_overrides(&params);

    let html = state
        .pipeline
        .mandate_html(mandate, mode)
        .await
        .map_err(|e: DocumentError| ApiError::new(PREVIEW_FAILED, e))?;

    Ok(Html(html))
}

fn pdf_response(request_id: &str, document: RenderedDocument) -> Response {
    info!(
        file_name = %document.file_name,
        size_bytes = document.data.len(),
        rendering_duration_ms = document.rendering_duration_ms,
        "Returning PDF response"
    );

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, document.content_type.clone()),
            (header::CONTENT_DISPOSITION, document.content_disposition()),
            (REQUEST_ID_HEADER, request_id.to_string()),
            (CHECKSUM_HEADER, document.sha256_checksum.clone()),
        ],
        document.data,
    )
        .into_response()
}
