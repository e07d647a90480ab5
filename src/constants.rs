// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

use std::time::Duration;

/// Scan gate timing
pub mod timing {
    use super::Duration;

    /// Cooldown after a live detection before the gate re-arms
    pub const REARM_DELAY: Duration = Duration::from_millis(1000);

    /// Default watchdog for a single decode call
    pub const DECODE_TIMEOUT: Duration = Duration::from_millis(5000);

    /// How long a transient notice stays on screen
    pub const NOTICE_DURATION: Duration = Duration::from_millis(2000);

    /// Timeout for GStreamer state changes when starting a capture pipeline
    pub const START_TIMEOUT_SECS: u64 = 5;

    /// Timeout for GStreamer state changes when stopping a capture pipeline
    pub const STOP_TIMEOUT_SECS: u64 = 2;

    /// Log frame statistics every N frames
    pub const FRAME_LOG_INTERVAL: u64 = 120;
}

/// Scan line animation
pub mod animation {
    use super::Duration;

    /// Interval between animation ticks
    pub const TICK_INTERVAL: Duration = Duration::from_millis(50);

    /// Position delta applied per tick
    pub const STEP: f32 = 0.02;
}

/// Haptic and audio feedback
pub mod feedback {
    use super::Duration;

    /// Length of the haptic pulse
    pub const VIBRATION_DURATION: Duration = Duration::from_millis(200);

    /// Length of the beep tone
    pub const BEEP_DURATION: Duration = Duration::from_millis(200);

    /// Beep tone frequency in Hz
    pub const BEEP_FREQUENCY_HZ: f64 = 880.0;

    /// Beep volume (0.0 - 1.0)
    pub const BEEP_VOLUME: f64 = 0.5;

    /// Application id reported to feedbackd
    pub const FEEDBACKD_APP_ID: &str = "io.github.qrscan";

    /// feedbackd event used for a successful scan
    pub const FEEDBACKD_EVENT: &str = "button-pressed";
}

/// URL classification
pub mod links {
    /// Path segment marking a download link
    pub const DOWNLOAD_SEGMENT: &str = "/download/";

    /// File extensions that mark a URL as a file download
    pub const FILE_EXTENSIONS: &[&str] = &[
        "apk", "pdf", "zip", "rar", "exe", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "txt",
        "jpg", "jpeg", "png", "gif", "mp4", "mp3", "avi", "mkv",
    ];
}

/// Gallery image formats
pub mod file_formats {
    /// Image extensions offered by the gallery picker
    pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "bmp", "gif", "tiff"];
}

/// QR detection
pub mod detection {
    /// Frames larger than this are downscaled before decoding
    pub const MAX_DIMENSION: u32 = 640;
}
