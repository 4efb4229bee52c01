//! Error types for sketchboard operations.

use thiserror::Error;

use crate::{ShapeId, ShapeKind};

/// Result type for sketchboard operations.
pub type SketchResult<T> = Result<T, SketchError>;

/// Errors that can occur in shape and session operations.
///
/// `UnsupportedKind` and `InvalidOperation` are contract violations by the
/// caller; they abort the operation and are never worth retrying.
#[derive(Debug, Error)]
pub enum SketchError {
    /// The factory cannot build a shape of this kind.
    #[error("Unsupported shape kind: {0}")]
    UnsupportedKind(ShapeKind),

    /// The mutation does not apply to this shape kind.
    #[error("Invalid operation `{operation}` on {kind} shape")]
    InvalidOperation {
        /// Name of the rejected mutation.
        operation: &'static str,
        /// Kind of the shape it was invoked on.
        kind: ShapeKind,
    },

    /// A radius, width or height was negative or not finite.
    #[error("Invalid extent: {0}")]
    InvalidExtent(String),

    /// Two shapes in one collection share an ID.
    #[error("Duplicate shape ID: {0}")]
    DuplicateShape(ShapeId),

    /// Shape not found in the session.
    #[error("Shape not found: {0}")]
    ShapeNotFound(ShapeId),

    /// Board serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
