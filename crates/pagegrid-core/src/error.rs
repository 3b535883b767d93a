//! Errors surfaced by the public builder surface.
//!
//! Lookup misses inside commands and gesture commits are not errors; they
//! are no-ops. Only misuse of the orchestrator (such as dropping an unknown
//! component) and failed save/load are reported.

use crate::model::CanvasId;
use crate::storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuilderError {
    #[error("Unknown component type: {0}")]
    UnknownComponentType(String),
    #[error("Canvas not found: {0}")]
    CanvasNotFound(CanvasId),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Result type for builder operations.
pub type BuilderResult<T> = Result<T, BuilderError>;
