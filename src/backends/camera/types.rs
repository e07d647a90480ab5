// SPDX-License-Identifier: GPL-3.0-only

//! Shared types for camera backends

use image::{GrayImage, RgbaImage};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

/// Which physical camera is bound for capture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraFacing {
    Front,
    #[default]
    Back,
}

impl CameraFacing {
    /// The opposite facing
    pub fn flipped(self) -> Self {
        match self {
            CameraFacing::Front => CameraFacing::Back,
            CameraFacing::Back => CameraFacing::Front,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            CameraFacing::Front => "front",
            CameraFacing::Back => "back",
        }
    }

    /// Parse a libcamera/device-tree location string ("front", "back", "external")
    pub fn from_location(location: &str) -> Option<Self> {
        match location.trim().to_ascii_lowercase().as_str() {
            "front" => Some(CameraFacing::Front),
            "back" | "rear" => Some(CameraFacing::Back),
            _ => None,
        }
    }
}

impl std::fmt::Display for CameraFacing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Sensor rotation in degrees (clockwise)
///
/// Camera sensors may be physically mounted at various angles relative to the device.
/// The value comes from libcamera's `api.libcamera.rotation` property in PipeWire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SensorRotation {
    /// No rotation (sensor is oriented correctly)
    #[default]
    None,
    /// 90 degrees clockwise
    Rotate90,
    /// 180 degrees (upside down)
    Rotate180,
    /// 270 degrees clockwise (90 degrees counter-clockwise)
    Rotate270,
}

impl SensorRotation {
    /// Create rotation from an integer degree value (normalised to 0-360).
    pub fn from_degrees_int(degrees: i32) -> Self {
        match degrees.rem_euclid(360) {
            90 => SensorRotation::Rotate90,
            180 => SensorRotation::Rotate180,
            270 => SensorRotation::Rotate270,
            _ => SensorRotation::None,
        }
    }

    /// Parse rotation from a string value (degrees)
    pub fn from_degrees(degrees: &str) -> Self {
        degrees
            .trim()
            .parse::<i32>()
            .map(Self::from_degrees_int)
            .unwrap_or_default()
    }

    /// Get the rotation in degrees
    pub fn degrees(&self) -> u32 {
        match self {
            SensorRotation::None => 0,
            SensorRotation::Rotate90 => 90,
            SensorRotation::Rotate180 => 180,
            SensorRotation::Rotate270 => 270,
        }
    }
}

impl std::fmt::Display for SensorRotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}

/// Represents a camera device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraDevice {
    pub name: String,
    /// V4L2 device node (e.g. /dev/video0), empty when only reachable through PipeWire
    pub path: String,
    /// PipeWire object serial for `pipewiresrc target-object`
    pub pipewire_serial: Option<String>,
    /// Mounting location reported by libcamera
    pub facing: Option<CameraFacing>,
    pub rotation: SensorRotation,
}

impl CameraDevice {
    /// Human readable location label
    pub fn location_label(&self) -> &'static str {
        self.facing.map(|f| f.display_name()).unwrap_or("external")
    }
}

/// Pixel layout of a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// 8-bit RGBA, 4 bytes per pixel
    Rgba,
    /// 8-bit luminance, 1 byte per pixel
    Gray8,
}

impl PixelFormat {
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            PixelFormat::Rgba => 4,
            PixelFormat::Gray8 => 1,
        }
    }
}

/// A single captured (or loaded) image handed to the decoder
#[derive(Clone)]
pub struct CameraFrame {
    pub width: u32,
    pub height: u32,
    /// Bytes per row, including padding
    pub stride: u32,
    pub format: PixelFormat,
    pub data: Arc<[u8]>,
    pub rotation: SensorRotation,
    pub captured_at: Instant,
}

impl std::fmt::Debug for CameraFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraFrame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("stride", &self.stride)
            .field("format", &self.format)
            .field("bytes", &self.data.len())
            .field("rotation", &self.rotation)
            .finish()
    }
}

impl CameraFrame {
    /// Wrap a decoded RGBA image
    pub fn from_rgba_image(image: RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            stride: width * 4,
            format: PixelFormat::Rgba,
            data: Arc::from(image.into_raw()),
            rotation: SensorRotation::None,
            captured_at: Instant::now(),
        }
    }

    /// Wrap a decoded luminance image
    pub fn from_luma_image(image: GrayImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            stride: width,
            format: PixelFormat::Gray8,
            data: Arc::from(image.into_raw()),
            rotation: SensorRotation::None,
            captured_at: Instant::now(),
        }
    }

    /// Check that the buffer covers every row
    pub fn is_complete(&self) -> bool {
        if self.width == 0 || self.height == 0 {
            return false;
        }
        let row_bytes = self.width as usize * self.format.bytes_per_pixel();
        if (self.stride as usize) < row_bytes {
            return false;
        }
        let needed = (self.height as usize - 1) * self.stride as usize + row_bytes;
        self.data.len() >= needed
    }

    /// RGB value at a pixel, clamped to the frame bounds
    pub fn rgb_at(&self, x: u32, y: u32) -> (u8, u8, u8) {
        let x = x.min(self.width.saturating_sub(1)) as usize;
        let y = y.min(self.height.saturating_sub(1)) as usize;
        let idx = y * self.stride as usize + x * self.format.bytes_per_pixel();

        match self.format {
            PixelFormat::Rgba => match self.data.get(idx..idx + 3) {
                Some(px) => (px[0], px[1], px[2]),
                None => (0, 0, 0),
            },
            PixelFormat::Gray8 => {
                let v = self.data.get(idx).copied().unwrap_or(0);
                (v, v, v)
            }
        }
    }

    /// BT.601 luminance at a pixel
    pub fn luma_at(&self, x: u32, y: u32) -> u8 {
        match self.format {
            PixelFormat::Gray8 => self.rgb_at(x, y).0,
            PixelFormat::Rgba => {
                let (r, g, b) = self.rgb_at(x, y);
                ((r as u32 * 299 + g as u32 * 587 + b as u32 * 114) / 1000) as u8
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facing_flip() {
        assert_eq!(CameraFacing::Back.flipped(), CameraFacing::Front);
        assert_eq!(CameraFacing::Front.flipped().flipped(), CameraFacing::Front);
    }

    #[test]
    fn test_facing_from_location() {
        assert_eq!(CameraFacing::from_location("Front"), Some(CameraFacing::Front));
        assert_eq!(CameraFacing::from_location("back"), Some(CameraFacing::Back));
        assert_eq!(CameraFacing::from_location("external"), None);
    }

    #[test]
    fn test_rotation_parse() {
        assert_eq!(SensorRotation::from_degrees("270"), SensorRotation::Rotate270);
        assert_eq!(SensorRotation::from_degrees("-90"), SensorRotation::Rotate270);
        assert_eq!(SensorRotation::from_degrees("garbage"), SensorRotation::None);
    }

    #[test]
    fn test_luma_with_stride_padding() {
        let data: Vec<u8> = vec![
            255, 255, 255, 255, // white
            0, 0, 0, 255, // black
            9, 9, // stride padding
            255, 0, 0, 255, // red
            0, 0, 0, 0, // black
            9, 9, // stride padding
        ];
        let frame = CameraFrame {
            width: 2,
            height: 2,
            stride: 10,
            format: PixelFormat::Rgba,
            data: Arc::from(data.as_slice()),
            rotation: SensorRotation::None,
            captured_at: Instant::now(),
        };

        assert!(frame.is_complete());
        assert_eq!(frame.luma_at(0, 0), 255);
        assert_eq!(frame.luma_at(1, 0), 0);
        assert_eq!(frame.luma_at(0, 1), 76);
        // Out of range coordinates clamp to the last pixel
        assert_eq!(frame.luma_at(5, 5), 0);
    }

    #[test]
    fn test_truncated_frame_is_incomplete() {
        let frame = CameraFrame {
            width: 4,
            height: 4,
            stride: 4,
            format: PixelFormat::Gray8,
            data: Arc::from(vec![0u8; 10].as_slice()),
            rotation: SensorRotation::None,
            captured_at: Instant::now(),
        };
        assert!(!frame.is_complete());
    }
}
