use devis_model::ValidationError;
use devis_render::RenderError;
use thiserror::Error;

/// The error union surfaced to the entry points. The CLI turns it into
/// a diagnostic and a non-zero exit; the HTTP layer maps it onto a
/// status code. Nothing is retried.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("rendering error: {0}")]
    Render(#[from] RenderError),
}
