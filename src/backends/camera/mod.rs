// SPDX-License-Identifier: MPL-2.0

//! Camera backend abstraction
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────┐
//! │   ScannerApp        │
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │ CaptureOrchestrator │  ← Facing → device selection, rebinding
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │  CameraBackend Trait│  ← Enumeration and session binding
//! └──────────┬──────────┘
//!            │
//!            ▼
//!       ┌─────────┐
//!       │GStreamer│  ← Concrete implementation
//!       └─────────┘
//! ```

pub mod enumeration;
pub mod orchestrator;
pub mod pipeline;
pub mod types;

pub use orchestrator::CaptureOrchestrator;
pub use types::*;

use crate::errors::CameraError;

/// Channel end a capture session pushes frames into
pub type FrameSender = tokio::sync::mpsc::Sender<CameraFrame>;

/// Channel end the scanner reads frames from
pub type FrameReceiver = tokio::sync::mpsc::Receiver<CameraFrame>;

/// A bound capture session
///
/// Frames flow while the session is alive; dropping it unbinds the camera.
pub trait CaptureSession: Send {
    /// The device this session is bound to
    fn device(&self) -> &CameraDevice;
}

/// Camera backend trait
pub trait CameraBackend: Send + Sync {
    /// Enumerate available cameras
    fn enumerate_cameras(&self) -> Vec<CameraDevice>;

    /// Bind a device to a preview/analysis sink
    ///
    /// Frames are delivered with `try_send`; when the receiver lags behind
    /// new frames are dropped instead of queued.
    fn bind(
        &self,
        device: &CameraDevice,
        frames: FrameSender,
    ) -> Result<Box<dyn CaptureSession>, CameraError>;
}

/// Get the GStreamer backend
pub fn get_backend() -> Box<dyn CameraBackend> {
    Box::new(pipeline::GStreamerBackend::new())
}
