//! Error types for vitrine
//!
//! Startup failures (missing textures, unreadable shaders, no GPU) are reported
//! through [`VitrineError`] so a demo fails before its first frame instead of
//! rendering a blank material.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Kind of resource that failed to load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Texture,
    Shader,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Texture => f.write_str("texture"),
            ResourceKind::Shader => f.write_str("shader"),
        }
    }
}

/// A texture or shader could not be read or decoded
#[derive(Debug, Error)]
#[error("failed to load {kind} '{}': {reason}", path.display())]
pub struct ResourceLoadError {
    pub kind: ResourceKind,
    pub path: PathBuf,
    pub reason: String,
}

impl ResourceLoadError {
    pub fn new(kind: ResourceKind, path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self {
            kind,
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// The host refused to open a surface for an exported frame
#[derive(Debug, Error)]
#[error("snapshot export blocked: {reason}")]
pub struct ExportBlockedError {
    pub reason: String,
}

impl ExportBlockedError {
    pub fn new(reason: impl ToString) -> Self {
        Self {
            reason: reason.to_string(),
        }
    }
}

/// The main error type for vitrine operations
#[derive(Debug, Error)]
pub enum VitrineError {
    #[error(transparent)]
    ResourceLoad(#[from] ResourceLoadError),

    #[error(transparent)]
    ExportBlocked(#[from] ExportBlockedError),

    #[error("no suitable GPU adapter found: {0}")]
    AdapterNotFound(String),

    #[error("failed to create GPU device: {0}")]
    DeviceCreation(String),

    #[error("surface error: {0}")]
    Surface(String),

    #[error("failed to read back rendered frame: {0}")]
    Readback(String),

    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] image::ImageError),

    #[error("unknown control: {0}")]
    UnknownControl(String),

    #[error("unknown scene object: {0}")]
    UnknownObject(String),

    #[error("unknown light: {0}")]
    UnknownLight(String),

    #[error("unknown material: {0}")]
    UnknownMaterial(String),

    #[error("control '{control}' expects a {expected} value")]
    ControlValueMismatch {
        control: String,
        expected: &'static str,
    },

    #[error("event loop error: {0}")]
    EventLoop(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for vitrine operations
pub type Result<T> = std::result::Result<T, VitrineError>;

impl From<winit::error::EventLoopError> for VitrineError {
    fn from(err: winit::error::EventLoopError) -> Self {
        VitrineError::EventLoop(err.to_string())
    }
}

impl From<winit::error::OsError> for VitrineError {
    fn from(err: winit::error::OsError) -> Self {
        VitrineError::EventLoop(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_load_message_names_path() {
        let err = VitrineError::from(ResourceLoadError::new(
            ResourceKind::Texture,
            "textures/missing.jpg",
            "No such file or directory",
        ));
        let message = err.to_string();
        assert!(message.contains("texture"));
        assert!(message.contains("textures/missing.jpg"));
    }

    #[test]
    fn test_export_blocked_converts() {
        let err: VitrineError = ExportBlockedError::new("exports disabled").into();
        assert!(matches!(err, VitrineError::ExportBlocked(_)));
    }
}
