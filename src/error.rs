//! Errors for the fallible edges of the crate: snapshot parsing and file I/O.
//!
//! Gesture handling itself never fails. Stale ids drop silently and
//! out-of-range attributes clamp.

use crate::element::ElementId;

/// Error returned when loading or saving a document snapshot.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    /// The snapshot is not valid JSON or does not match the element schema.
    #[error("invalid snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Reading or writing a snapshot file failed.
    #[error("snapshot I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// Two elements in a snapshot share the same id.
    #[error("duplicate element id in snapshot: {0}")]
    DuplicateId(ElementId),
}
