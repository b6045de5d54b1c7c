//! Error types for ferry-renderer.

use thiserror::Error;

/// All errors that can arise from filename rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The requested template engine is not registered.
    #[error("attempted to render file paths with unavailable engine '{0}'")]
    UnavailableEngine(String),

    /// Tera template engine error.
    #[error("failed to render file path: {0}")]
    Tera(#[from] tera::Error),

    /// JSON serialization error (building tera context).
    #[error("context serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The template rendered to an empty (or whitespace-only) path.
    #[error("template '{template}' rendered to an empty path")]
    EmptyPath { template: String },
}
