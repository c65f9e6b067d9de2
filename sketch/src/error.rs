//! Error types for sketch sessions

use std::path::PathBuf;

use sketch_resources::DecodeError;
use thiserror::Error;

use crate::backend::BackendError;

/// A single image or sound could not be loaded.
///
/// Decoding and uploading are separate failure points and are reported as
/// such.
#[derive(Error, Debug)]
pub enum ResourceLoadError {
    #[error("image decoding failed: {0}")]
    Decode(#[source] DecodeError),

    /// `path` is `None` for images built in memory
    #[error("texture upload failed{}: {source}", origin(path))]
    Upload {
        path: Option<PathBuf>,
        #[source]
        source: BackendError,
    },

    #[error("sound loading failed for {}: {source}", path.display())]
    Audio {
        path: PathBuf,
        #[source]
        source: BackendError,
    },
}

fn origin(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" for {}", p.display()))
        .unwrap_or_default()
}

#[derive(Error, Debug)]
pub enum SketchError {
    /// The window or render surface could not be created
    #[error("window initialization failed: {0}")]
    Init(#[source] BackendError),

    #[error(transparent)]
    ResourceLoad(#[from] ResourceLoadError),

    /// Opaque message surfaced by the backend
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("frame rate must be at least 1, got {0}")]
    InvalidFrameRate(u32),

    #[error("the loop is already running")]
    LoopRunning,

    #[error("the loop has terminated and cannot be restarted")]
    LoopTerminated,
}

/// Result type for sketch operations
pub type Result<T> = std::result::Result<T, SketchError>;
