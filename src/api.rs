//! The HTTP surface: one quote-rendering endpoint plus a health check.

use std::path::PathBuf;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use devis_model::{QuoteInput, ValidationError};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::PipelineError;
use crate::assets;

#[derive(Clone)]
pub struct AppState {
    pub asset_dir: PathBuf,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/quote", post(create_quote))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("invalid JSON body: {0}")]
    InvalidJson(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("PDF generation failed: {0}")]
    Generation(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<PipelineError> for ServiceError {
    fn from(error: PipelineError) -> Self {
        match error {
            PipelineError::Validation(e) => ServiceError::Validation(e),
            PipelineError::Json(e) => ServiceError::InvalidJson(e.to_string()),
            PipelineError::Render(e) => ServiceError::Generation(e.to_string()),
            PipelineError::Io(e) => ServiceError::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::InvalidJson(message) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "InvalidJson", "message": message }),
            ),
            Self::Validation(error) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({
                    "error": "ValidationFailed",
                    "message": error.to_string(),
                    "violations": error.violations,
                }),
            ),
            Self::Generation(_) | Self::Internal(_) => {
                tracing::error!("request failed: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "InternalError", "message": "An internal error occurred" }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

/// Renders the posted quote record and answers with the PDF bytes.
async fn create_quote(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, ServiceError> {
    let input: QuoteInput =
        serde_json::from_slice(&body).map_err(|e| ServiceError::InvalidJson(e.to_string()))?;
    let quote = input.validate()?;

    let logo = assets::load_brand_asset(&state.asset_dir)
        .map_err(|e| ServiceError::Internal(e.to_string()))?;
    let pdf = crate::render_quote(&quote, logo)?;

    tracing::info!("rendered quote '{}' ({} bytes)", quote.number, pdf.len());

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"devis-{}.pdf\"", quote.number),
            ),
        ],
        pdf,
    ))
}

async fn health_check() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}
