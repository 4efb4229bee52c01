//! Renderer error types.

use thiserror::Error;

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur while exporting a board.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The requested format was not compiled in.
    #[error("Export format unavailable: {0}")]
    Unsupported(String),

    /// Building, rasterizing or encoding the picture failed.
    #[error("Export failed: {0}")]
    Export(String),

    /// Writing the exported file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
