// SPDX-License-Identifier: MPL-2.0

//! Error types for the scanner

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Camera error: {0}")]
    Camera(#[from] CameraError),

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    #[error("Gallery error: {0}")]
    Gallery(#[from] GalleryError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl AppError {
    /// Errors that end the scanning session instead of degrading it
    pub fn is_fatal(&self) -> bool {
        matches!(self, AppError::Camera(CameraError::PermissionDenied { .. }))
    }
}

/// Camera capture errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CameraError {
    #[error("No camera devices found")]
    NoCameraFound,

    #[error("Permission denied for camera {device}")]
    PermissionDenied { device: String },

    #[error("Initialization failed: {0}")]
    InitializationFailed(String),

    #[error("Backend error: {0}")]
    BackendError(String),
}

/// Errors from the decode collaborator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Decode timed out after {}ms", .0.as_millis())]
    TimedOut(Duration),

    #[error("Decode worker failed: {0}")]
    WorkerFailed(String),

    #[error("Invalid frame: {0}")]
    InvalidFrame(String),
}

/// Errors raised when handing a URL to the system
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("Failed to open {url}: {reason}")]
    OpenFailed { url: String, reason: String },
}

/// Errors in the gallery fallback path
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GalleryError {
    #[error("Failed to load image {path}: {reason}")]
    Load { path: PathBuf, reason: String },

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Configuration file errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No configuration directory available")]
    NoConfigDir,

    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write config {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
