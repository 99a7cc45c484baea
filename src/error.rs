// loan-document-service/src/error.rs

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DocumentError>;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Template error: {0}")]
    TemplateError(#[from] handlebars::TemplateError),

    #[error("Rendering error: {0}")]
    RenderError(#[from] handlebars::RenderError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid request body: {0}")]
    InvalidRequest(#[from] serde_json::Error),

    #[error("Missing required fields: {0}")]
    MissingField(String),

    #[error("Failed to launch browser: {0}")]
    BrowserLaunch(String),

    #[error("PDF export failed: {0}")]
    PdfExport(String),

    #[error("Renderer task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),
}

impl DocumentError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            DocumentError::InvalidRequest(_) | DocumentError::MissingField(_) => {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_error_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.to_string(),
            error_type: match self {
                DocumentError::TemplateError(_) => "template_error",
                DocumentError::RenderError(_) => "render_error",
                DocumentError::IoError(_) => "io_error",
                DocumentError::InvalidRequest(_) => "invalid_request",
                DocumentError::MissingField(_) => "missing_field",
                DocumentError::BrowserLaunch(_) => "browser_launch",
                DocumentError::PdfExport(_) => "pdf_export",
                DocumentError::TaskFailed(_) => "task_failed",
            }
            .to_string(),
        }
    }
}

#[derive(Debug, serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_type: String,
}

/// Error returned by a route handler. `headline` names the failed operation,
/// the wrapped error goes into `details`.
#[derive(Debug)]
pub struct ApiError {
    pub headline: &'static str,
    pub source: DocumentError,
}

#[derive(Debug, serde::Serialize)]
struct ApiErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl ApiError {
    pub fn new(headline: &'static str, source: DocumentError) -> Self {
        Self { headline, source }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.source.status_code();

        let body = match self.source {
            // Validation failures carry their own message as the headline.
            DocumentError::MissingField(_) => ApiErrorBody {
                error: self.source.to_string(),
                details: None,
            },
            ref source => {
                let ErrorResponse { error, error_type } = source.to_error_response();
                if status.is_server_error() {
                    tracing::error!(error = %error, error_type = %error_type, "{}", self.headline);
                }
                ApiErrorBody {
                    error: self.headline.to_string(),
                    details: Some(error),
                }
            }
        };

        (status, Json(body)).into_response()
    }
}
