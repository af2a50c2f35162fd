//! Error types shared across the editor.
//!
//! Every failure is terminal for the single action that raised it: callers
//! leave their prior state untouched and surface the error as a toast.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    /// Frame capture for a library thumbnail failed. Recovered with the placeholder.
    #[error("Thumbnail extraction failed: {0}")]
    ThumbnailExtraction(String),

    /// The source could not be decoded for preview playback
    #[error("Video decode failed: {0}")]
    VideoDecode(String),

    /// Pixel/time mapping requested with a zero-width track or zero-length clip
    #[error("No time mapping available (track width {width}, duration {duration})")]
    InvalidDragGeometry { width: f64, duration: f64 },

    /// A trim or move drag is already in progress
    #[error("Another timeline interaction is already active")]
    InteractionBusy,

    #[error("Invalid clip position {start:.3}..{end:.3} for a {duration:.3}s source")]
    InvalidPosition { start: f64, end: f64, duration: f64 },

    #[error("Invalid value for {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error("Unknown aspect ratio: {0}")]
    UnknownAspectRatio(String),

    #[error("Unsupported file type: {}", .0.display())]
    UnsupportedFile(PathBuf),

    /// ffprobe could not describe the file
    #[error("Probe failed: {0}")]
    Probe(String),

    #[error("No clip on the timeline")]
    NoClip,

    #[error("Project not found")]
    ProjectNotFound,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EditorError>;
