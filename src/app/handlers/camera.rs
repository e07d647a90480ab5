// SPDX-License-Identifier: GPL-3.0-only

//! Camera control handlers

use crate::app::ScannerApp;
use crate::app::dispatcher::Notice;
use crate::errors::{AppError, CameraError};
use tracing::{error, info, warn};

impl ScannerApp {
    // =========================================================================
    // Camera Control Handlers
    // =========================================================================

    /// Bind the camera for the current facing
    ///
    /// Bind failures become notices; a permission failure also quits.
    pub fn start_camera(&mut self) {
        let facing = self.session.facing;
        let Some(camera) = self.camera.as_mut() else {
            warn!("No capture orchestrator attached");
            return;
        };

        let result = camera.start(facing).map(|device| device.name.clone());
        match result {
            Ok(name) => {
                info!(camera = %name, facing = %facing, "Camera started");
            }
            Err(e) => {
                let fatal = AppError::from(e.clone()).is_fatal();
                error!(error = %e, fatal, "Failed to start camera");
                self.preview = None;
                self.notify(Notice::error(camera_error_text(&e)));
                if fatal {
                    self.shutdown();
                }
            }
        }
    }

    pub(crate) fn handle_switch_camera(&mut self) {
        self.session.facing = self.session.facing.flipped();
        info!(facing = %self.session.facing, "Switching camera");
        self.notify(Notice::info(format!(
            "Switched to {} camera",
            self.session.facing.display_name()
        )));
        self.preview = None;
        self.start_camera();
    }
}

fn camera_error_text(error: &CameraError) -> String {
    match error {
        CameraError::PermissionDenied { .. } => "Camera permission denied".to_string(),
        CameraError::NoCameraFound => "No camera found".to_string(),
        other => format!("Camera unavailable: {}", other),
    }
}
