// SPDX-License-Identifier: GPL-3.0-only

//! QR code detection task
//!
//! This module implements QR code detection using the rqrr crate.
//! Frames are converted to luminance, optionally downscaled, searched for
//! QR grids and decoded, returning positions and decoded content.

use crate::app::frame_processor::types::{FrameRegion, QrDetection};
use crate::backends::camera::types::CameraFrame;
use crate::constants::detection;
use crate::errors::DecodeError;
use tracing::{debug, trace};

/// Decode collaborator
///
/// Implementations are called from a blocking worker and must not touch
/// scanner state.
pub trait QrDecoder: Send + Sync {
    /// Decode every QR code in a frame
    fn decode(&self, frame: &CameraFrame) -> Result<Vec<QrDetection>, DecodeError>;
}

/// QR code detector
///
/// Analyzes frames to detect and decode QR codes.
/// Optimized for real-time processing with frame downscaling.
#[derive(Debug, Clone)]
pub struct QrDetector {
    /// Maximum dimension for processing (frames are downscaled to this)
    max_dimension: u32,
}

impl Default for QrDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl QrDetector {
    /// Create a new QR detector with default settings
    pub fn new() -> Self {
        Self {
            max_dimension: detection::MAX_DIMENSION,
        }
    }

    /// Create a QR detector with custom max dimension
    pub fn with_max_dimension(max_dimension: u32) -> Self {
        Self {
            max_dimension: max_dimension.max(1),
        }
    }
}

impl QrDecoder for QrDetector {
    fn decode(&self, frame: &CameraFrame) -> Result<Vec<QrDetection>, DecodeError> {
        if !frame.is_complete() {
            return Err(DecodeError::InvalidFrame(format!(
                "{}x{} frame with {} bytes",
                frame.width,
                frame.height,
                frame.data.len()
            )));
        }
        Ok(detect_sync(frame, self.max_dimension))
    }
}

/// Synchronous QR detection (runs in blocking task)
fn detect_sync(frame: &CameraFrame, max_dimension: u32) -> Vec<QrDetection> {
    let start = std::time::Instant::now();

    let width = frame.width;
    let height = frame.height;

    let scale = if width > max_dimension || height > max_dimension {
        (width as f32 / max_dimension as f32).max(height as f32 / max_dimension as f32)
    } else {
        1.0
    };
    let proc_width = ((width as f32 / scale) as u32).max(1);
    let proc_height = ((height as f32 / scale) as u32).max(1);

    let luma = downscale_luma(frame, proc_width, proc_height);
    let mut prepared =
        rqrr::PreparedImage::prepare_from_greyscale(proc_width as usize, proc_height as usize, |x, y| {
            luma[y * proc_width as usize + x]
        });

    let grids = prepared.detect_grids();
    trace!(
        proc_width,
        proc_height,
        scale,
        grids = grids.len(),
        detect_ms = start.elapsed().as_millis(),
        "QR grid search complete"
    );

    let mut detections = Vec::with_capacity(grids.len());

    for grid in grids {
        let content = match grid.decode() {
            Ok((_meta, content)) => content,
            Err(e) => {
                debug!(error = %e, "Failed to decode QR code");
                continue;
            }
        };

        let xs = grid.bounds.iter().map(|p| p.x);
        let ys = grid.bounds.iter().map(|p| p.y);
        let min_x = xs.clone().min().unwrap_or(0).max(0) as f32;
        let max_x = xs.max().unwrap_or(0).min(proc_width as i32) as f32;
        let min_y = ys.clone().min().unwrap_or(0).max(0) as f32;
        let max_y = ys.max().unwrap_or(0).min(proc_height as i32) as f32;

        // Scale back to original frame coordinates
        let region = FrameRegion::from_pixels(
            (min_x * scale) as u32,
            (min_y * scale) as u32,
            ((max_x - min_x).max(0.0) * scale) as u32,
            ((max_y - min_y).max(0.0) * scale) as u32,
            width,
            height,
        );

        debug!(
            content = %content,
            x = region.x,
            y = region.y,
            width = region.width,
            height = region.height,
            "Detected QR code"
        );

        detections.push(QrDetection::new(region, content));
    }

    if !detections.is_empty() {
        debug!(
            count = detections.len(),
            total_ms = start.elapsed().as_millis(),
            "QR detection found codes"
        );
    }

    detections
}

/// Downscale a frame to a luminance buffer by box-averaging source pixels
fn downscale_luma(frame: &CameraFrame, dst_width: u32, dst_height: u32) -> Vec<u8> {
    let mut result = Vec::with_capacity((dst_width * dst_height) as usize);

    let x_ratio = frame.width as f32 / dst_width as f32;
    let y_ratio = frame.height as f32 / dst_height as f32;

    for y in 0..dst_height {
        let y0 = (y as f32 * y_ratio) as u32;
        let y1 = (((y + 1) as f32 * y_ratio) as u32).max(y0 + 1).min(frame.height);
        for x in 0..dst_width {
            let x0 = (x as f32 * x_ratio) as u32;
            let x1 = (((x + 1) as f32 * x_ratio) as u32).max(x0 + 1).min(frame.width);

            let mut sum = 0u32;
            let mut count = 0u32;
            for sy in y0..y1 {
                for sx in x0..x1 {
                    sum += frame.luma_at(sx, sy) as u32;
                    count += 1;
                }
            }
            result.push((sum / count.max(1)) as u8);
        }
    }

    result
}
