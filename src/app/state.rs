// SPDX-License-Identifier: GPL-3.0-only

//! Scanner state owned by the event loop

use crate::backends::camera::types::CameraFacing;
use crate::constants::animation;

/// Why the gate is closed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuppressReason {
    /// Cooling down after a live detection; carries the re-arm epoch
    Cooldown(u64),
    /// A gallery image is being decoded
    Gallery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GateState {
    #[default]
    Armed,
    Suppressed(SuppressReason),
}

/// De-duplication gate between detections and actions
///
/// Re-arm timers carry the epoch they were scheduled for; a timer whose
/// epoch no longer matches (because a gallery scan took over the gate)
/// leaves the gate alone.
#[derive(Debug, Default)]
pub struct ScanGate {
    state: GateState,
    next_epoch: u64,
}

impl ScanGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn is_armed(&self) -> bool {
        self.state == GateState::Armed
    }

    /// Close the gate for a live detection; `None` when already closed
    pub fn try_begin_cooldown(&mut self) -> Option<u64> {
        if !self.is_armed() {
            return None;
        }
        self.next_epoch += 1;
        let epoch = self.next_epoch;
        self.state = GateState::Suppressed(SuppressReason::Cooldown(epoch));
        Some(epoch)
    }

    /// Re-open after the cooldown scheduled for `epoch`
    pub fn rearm(&mut self, epoch: u64) -> bool {
        if self.state == GateState::Suppressed(SuppressReason::Cooldown(epoch)) {
            self.state = GateState::Armed;
            true
        } else {
            false
        }
    }

    /// Close the gate for a gallery decode, whatever its current state
    pub fn begin_gallery(&mut self) {
        self.state = GateState::Suppressed(SuppressReason::Gallery);
    }

    /// Re-open after a gallery decode finished
    pub fn end_gallery(&mut self) {
        if self.state == GateState::Suppressed(SuppressReason::Gallery) {
            self.state = GateState::Armed;
        }
    }
}

/// Scan session: gate plus the bound camera
#[derive(Debug, Default)]
pub struct ScanSession {
    pub gate: ScanGate,
    pub facing: CameraFacing,
}

impl ScanSession {
    pub fn new(facing: CameraFacing) -> Self {
        Self {
            gate: ScanGate::new(),
            facing,
        }
    }

    /// Scanning mode drives the scan line animation
    pub fn is_scanning(&self) -> bool {
        self.gate.is_armed()
    }
}

/// Two-state indicator for a toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleIndicator {
    On,
    Off,
}

impl ToggleIndicator {
    pub fn from_enabled(enabled: bool) -> Self {
        if enabled { Self::On } else { Self::Off }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::On => "on",
            Self::Off => "off",
        }
    }
}

/// User feedback toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedbackPreferences {
    pub vibration_enabled: bool,
    pub sound_enabled: bool,
}

impl Default for FeedbackPreferences {
    fn default() -> Self {
        Self {
            vibration_enabled: true,
            sound_enabled: true,
        }
    }
}

impl FeedbackPreferences {
    pub fn vibration_indicator(&self) -> ToggleIndicator {
        ToggleIndicator::from_enabled(self.vibration_enabled)
    }

    pub fn sound_indicator(&self) -> ToggleIndicator {
        ToggleIndicator::from_enabled(self.sound_enabled)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

/// Scan line position
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AnimationPhase {
    position: f32,
    direction: Direction,
}

impl AnimationPhase {
    pub fn position(&self) -> f32 {
        self.position
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Advance one step, bouncing at 0 and 1
    pub fn advance(&mut self) {
        let delta = match self.direction {
            Direction::Forward => animation::STEP,
            Direction::Backward => -animation::STEP,
        };
        self.position += delta;

        if self.position >= 1.0 {
            self.position = 1.0;
            self.direction = Direction::Backward;
        } else if self.position <= 0.0 {
            self.position = 0.0;
            self.direction = Direction::Forward;
        }
    }
}
