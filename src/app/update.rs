// SPDX-License-Identifier: GPL-3.0-only

//! Message update handling
//!
//! The main `update()` function acts as a dispatcher, while specific handlers
//! are implemented in the `handlers` submodules organized by functional domain.
//!
//! # Handler Modules
//!
//! - `handlers::detection`: frame admission, decode results, cooldown re-arm
//! - `handlers::camera`: camera binding and facing switch
//! - `handlers::gallery`: gallery picker and image scan
//! - `handlers::system`: feedback toggles, animation tick, quit

use crate::app::{Message, ScannerApp};

impl ScannerApp {
    /// Main message handler - routes messages to appropriate handler methods.
    pub fn update(&mut self, message: Message) {
        match message {
            // ===== Live scanning =====
            Message::FrameCaptured(frame) => self.handle_frame_captured(frame),
            Message::DecodeStalled(error) => self.handle_decode_stalled(error),
            Message::FrameDecoded(result) => self.handle_frame_decoded(result),
            Message::Rearm(epoch) => self.handle_rearm(epoch),

            // ===== Camera =====
            Message::SwitchCamera => self.handle_switch_camera(),

            // ===== Gallery =====
            Message::OpenGallery => self.handle_open_gallery(),
            Message::GalleryPicked(path) => self.handle_gallery_picked(path),
            Message::GalleryScanned(result) => self.handle_gallery_scanned(result),

            // ===== System =====
            Message::ToggleVibration => self.handle_toggle_vibration(),
            Message::ToggleSound => self.handle_toggle_sound(),
            Message::Tick => self.handle_tick(),
            Message::Quit => self.shutdown(),
        }
    }
}
