// SPDX-License-Identifier: GPL-3.0-only

//! Capture orchestration
//!
//! Owns the active capture session. Every start is a full rebind: the old
//! session is dropped (releasing the device) before the next one is bound.

use super::enumeration::select_device;
use super::types::{CameraDevice, CameraFacing};
use super::{CameraBackend, CaptureSession, FrameSender};
use crate::errors::CameraError;
use tracing::{debug, info};

pub struct CaptureOrchestrator {
    backend: Box<dyn CameraBackend>,
    session: Option<Box<dyn CaptureSession>>,
    frames: FrameSender,
    front_device: Option<String>,
    back_device: Option<String>,
}

impl CaptureOrchestrator {
    pub fn new(backend: Box<dyn CameraBackend>, frames: FrameSender) -> Self {
        Self {
            backend,
            session: None,
            frames,
            front_device: None,
            back_device: None,
        }
    }

    /// Pin device paths to facings
    pub fn with_pinned_devices(mut self, front: Option<String>, back: Option<String>) -> Self {
        self.front_device = front;
        self.back_device = back;
        self
    }

    /// Unbind any previous session and bind the camera for `facing`
    pub fn start(&mut self, facing: CameraFacing) -> Result<&CameraDevice, CameraError> {
        self.stop();

        let cameras = self.backend.enumerate_cameras();
        if cameras.is_empty() {
            return Err(CameraError::NoCameraFound);
        }

        let pinned = match facing {
            CameraFacing::Front => self.front_device.as_deref(),
            CameraFacing::Back => self.back_device.as_deref(),
        };
        let device = select_device(&cameras, facing, pinned).ok_or(CameraError::NoCameraFound)?;

        info!(facing = %facing, device = %device.name, "Binding camera");
        let session = self.backend.bind(&device, self.frames.clone())?;
        Ok(self.session.insert(session).device())
    }

    /// Release the current session
    pub fn stop(&mut self) {
        if let Some(session) = self.session.take() {
            info!(device = %session.device().name, "Unbinding camera");
            drop(session);
        }
    }

    pub fn is_bound(&self) -> bool {
        self.session.is_some()
    }

    pub fn current_device(&self) -> Option<&CameraDevice> {
        self.session.as_ref().map(|s| s.device())
    }
}

impl Drop for CaptureOrchestrator {
    fn drop(&mut self) {
        if self.session.is_some() {
            debug!("Capture orchestrator dropped with a bound session");
            self.stop();
        }
    }
}
