// SPDX-License-Identifier: GPL-3.0-only

//! Detection feedback gated by the user's toggles

use crate::app::state::FeedbackPreferences;
use crate::backends::feedback::FeedbackDevice;
use crate::constants::feedback;
use std::sync::Arc;
use tracing::debug;

/// Fires vibration and beep according to [`FeedbackPreferences`]
pub struct FeedbackController {
    prefs: FeedbackPreferences,
    device: Arc<dyn FeedbackDevice>,
}

impl FeedbackController {
    pub fn new(prefs: FeedbackPreferences, device: Arc<dyn FeedbackDevice>) -> Self {
        Self { prefs, device }
    }

    pub fn preferences(&self) -> FeedbackPreferences {
        self.prefs
    }

    /// Flip the vibration toggle and return the new value
    pub fn toggle_vibration(&mut self) -> bool {
        self.prefs.vibration_enabled = !self.prefs.vibration_enabled;
        debug!(enabled = self.prefs.vibration_enabled, "Vibration toggled");
        self.prefs.vibration_enabled
    }

    /// Flip the sound toggle and return the new value
    pub fn toggle_sound(&mut self) -> bool {
        self.prefs.sound_enabled = !self.prefs.sound_enabled;
        debug!(enabled = self.prefs.sound_enabled, "Sound toggled");
        self.prefs.sound_enabled
    }

    /// Emit feedback for one accepted detection
    pub fn fire(&self) {
        if self.prefs.vibration_enabled {
            self.device.vibrate(feedback::VIBRATION_DURATION);
        }
        if self.prefs.sound_enabled {
            self.device.beep(feedback::BEEP_DURATION);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct RecordingDevice {
        events: Mutex<Vec<(&'static str, Duration)>>,
    }

    impl FeedbackDevice for RecordingDevice {
        fn vibrate(&self, duration: Duration) {
            self.events.lock().unwrap().push(("vibrate", duration));
        }

        fn beep(&self, duration: Duration) {
            self.events.lock().unwrap().push(("beep", duration));
        }
    }

    #[test]
    fn test_fire_respects_toggles() {
        let device = Arc::new(RecordingDevice::default());
        let mut controller = FeedbackController::new(FeedbackPreferences::default(), device.clone());

        controller.fire();
        assert_eq!(device.events.lock().unwrap().len(), 2);

        controller.toggle_sound();
        controller.fire();
        let events = device.events.lock().unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(events[2], ("vibrate", feedback::VIBRATION_DURATION));
    }

    #[test]
    fn test_both_disabled_is_silent() {
        let device = Arc::new(RecordingDevice::default());
        let mut controller = FeedbackController::new(FeedbackPreferences::default(), device.clone());
        assert!(!controller.toggle_vibration());
        assert!(!controller.toggle_sound());
        controller.fire();
        assert!(device.events.lock().unwrap().is_empty());
        assert!(controller.toggle_sound());
    }
}
