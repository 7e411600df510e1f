//! Central error types for the desktop shell.
//!
//! All errors implement `Serialize` for Tauri IPC compatibility.

use serde::Serialize;
use thiserror::Error;

/// Main error type for shell operations.
#[derive(Error, Debug)]
pub enum ShellError {
    /// Capture source enumeration failed
    #[error("Capture failed: {0}")]
    CaptureError(String),

    /// Config file could not be read or written
    #[error("Storage error: {0}")]
    StorageError(#[from] std::io::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Image processing error
    #[error("Image error: {0}")]
    ImageError(String),

    /// The main window does not exist (not created yet, or destroyed)
    #[error("Main window is not available")]
    MainWindowMissing,

    /// Window management error
    #[error("Window error: {0}")]
    WindowError(String),

    /// A picker session is already waiting for a selection
    #[error("A screen picker is already open")]
    PickerBusy,

    /// Badge count outside the accepted range
    #[error("Invalid badge count {count} (expected -1 or greater)")]
    InvalidBadgeCount { count: i64 },

    /// Rich presence connection failed
    #[error("Presence error: {0}")]
    PresenceError(String),

    /// OS autostart entry could not be changed
    #[error("Autostart error: {0}")]
    AutostartError(String),

    /// Tauri runtime error
    #[error("Tauri error: {0}")]
    Tauri(#[from] tauri::Error),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

/// Implement Serialize for Tauri IPC compatibility.
/// Tauri requires errors to be serializable to send to the frontend.
impl Serialize for ShellError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl From<image::ImageError> for ShellError {
    fn from(err: image::ImageError) -> Self {
        ShellError::ImageError(err.to_string())
    }
}

/// Extension trait for adding context to Results.
///
/// Similar to anyhow's `Context` trait, this allows chaining context
/// information onto errors for better debugging.
pub trait ResultExt<T> {
    /// Add context to an error, converting it to ShellError::Other.
    fn context(self, msg: &str) -> ShellResult<T>;

    /// Add context lazily (only evaluated on error).
    fn with_context<F: FnOnce() -> String>(self, f: F) -> ShellResult<T>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for Result<T, E> {
    fn context(self, msg: &str) -> ShellResult<T> {
        self.map_err(|e| ShellError::Other(format!("{}: {}", msg, e)))
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> ShellResult<T> {
        self.map_err(|e| ShellError::Other(format!("{}: {}", f(), e)))
    }
}

/// Type alias for Results using ShellError.
pub type ShellResult<T> = Result<T, ShellError>;
