// SPDX-License-Identifier: GPL-3.0-only

//! System handlers: feedback toggles and the scan line ticker

use crate::app::ScannerApp;
use crate::config::Config;
use tracing::{info, warn};

impl ScannerApp {
    pub(crate) fn handle_toggle_vibration(&mut self) {
        let enabled = self.feedback.toggle_vibration();
        info!(enabled, "Vibration feedback");
        self.persist_feedback();
    }

    pub(crate) fn handle_toggle_sound(&mut self) {
        let enabled = self.feedback.toggle_sound();
        info!(enabled, "Sound feedback");
        self.persist_feedback();
    }

    fn persist_feedback(&self) {
        if !self.config.remember_feedback {
            return;
        }
        let Some(path) = self.config_path.as_deref() else {
            warn!("No config file to save feedback preferences to");
            return;
        };
        let prefs = self.feedback.preferences();
        if let Err(e) = Config::store_feedback(path, prefs.vibration_enabled, prefs.sound_enabled) {
            warn!(error = %e, "Failed to save feedback preferences");
        }
    }

    /// Scan line only moves while the scanner is armed
    pub(crate) fn handle_tick(&mut self) {
        if self.session.is_scanning() {
            self.animation.advance();
        }
    }
}
