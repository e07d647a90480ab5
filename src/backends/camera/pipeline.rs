// SPDX-License-Identifier: MPL-2.0

//! GStreamer capture pipeline
//!
//! Builds `source ! videoconvert ! RGBA appsink` for a device and pushes
//! every sample into the scanner's frame channel.

use super::types::{CameraDevice, CameraFrame, PixelFormat};
use super::{CameraBackend, CaptureSession, FrameSender, enumeration};
use crate::constants::timing;
use crate::errors::CameraError;
use gstreamer::prelude::*;
use gstreamer_app::AppSink;
use gstreamer_video::VideoInfo;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Largest preview width requested from the source
const MAX_CAPTURE_WIDTH: u32 = 1280;

/// GStreamer-based camera backend
#[derive(Debug, Default)]
pub struct GStreamerBackend;

impl GStreamerBackend {
    pub fn new() -> Self {
        Self
    }
}

impl CameraBackend for GStreamerBackend {
    fn enumerate_cameras(&self) -> Vec<CameraDevice> {
        enumeration::enumerate_cameras()
    }

    fn bind(
        &self,
        device: &CameraDevice,
        frames: FrameSender,
    ) -> Result<Box<dyn CaptureSession>, CameraError> {
        let session = CapturePipeline::new(device, frames)?;
        Ok(Box::new(session))
    }
}

/// Running capture pipeline for one device
pub struct CapturePipeline {
    device: CameraDevice,
    pipeline: gstreamer::Pipeline,
    appsink: AppSink,
}

impl CapturePipeline {
    pub fn new(device: &CameraDevice, frame_sender: FrameSender) -> Result<Self, CameraError> {
        info!(device = %device.name, path = %device.path, "Creating capture pipeline");

        check_device_access(device)?;

        gstreamer::init().map_err(|e| CameraError::InitializationFailed(e.to_string()))?;

        let description = pipeline_description(device);
        debug!(pipeline = %description, "Launching pipeline");

        let pipeline = gstreamer::parse::launch(&description)
            .map_err(|e| CameraError::InitializationFailed(e.to_string()))?
            .dynamic_cast::<gstreamer::Pipeline>()
            .map_err(|_| {
                CameraError::InitializationFailed("Launch result is not a pipeline".to_string())
            })?;

        let appsink = pipeline
            .by_name("sink")
            .ok_or_else(|| CameraError::InitializationFailed("Failed to get appsink".to_string()))?
            .dynamic_cast::<AppSink>()
            .map_err(|_| {
                CameraError::InitializationFailed("Failed to cast appsink".to_string())
            })?;

        appsink.set_property("emit-signals", true);
        appsink.set_property("sync", false);
        appsink.set_property("max-buffers", 1u32);
        appsink.set_property("drop", true);

        let rotation = device.rotation;
        let frame_counter = Arc::new(AtomicU64::new(0));

        appsink.set_callbacks(
            gstreamer_app::AppSinkCallbacks::builder()
                .new_sample(move |appsink| {
                    let frame_start = Instant::now();
                    let frame_num = frame_counter.fetch_add(1, Ordering::Relaxed);

                    let sample = appsink.pull_sample().map_err(|e| {
                        error!(frame = frame_num, error = ?e, "Failed to pull sample");
                        gstreamer::FlowError::Eos
                    })?;

                    let buffer = sample.buffer().ok_or(gstreamer::FlowError::Error)?;
                    if buffer.flags().contains(gstreamer::BufferFlags::CORRUPTED) {
                        debug!(frame = frame_num, "Buffer marked as corrupted, skipping frame");
                        return Ok(gstreamer::FlowSuccess::Ok);
                    }

                    let caps = sample.caps().ok_or(gstreamer::FlowError::Error)?;
                    let video_info =
                        VideoInfo::from_caps(caps).map_err(|_| gstreamer::FlowError::Error)?;
                    let map = buffer
                        .map_readable()
                        .map_err(|_| gstreamer::FlowError::Error)?;

                    let frame = CameraFrame {
                        width: video_info.width(),
                        height: video_info.height(),
                        stride: video_info.stride()[0] as u32,
                        format: PixelFormat::Rgba,
                        data: Arc::from(map.as_slice()),
                        rotation,
                        captured_at: frame_start,
                    };

                    // Keep only what the scanner can take right now
                    match frame_sender.try_send(frame) {
                        Ok(()) => {
                            if frame_num % timing::FRAME_LOG_INTERVAL == 0 {
                                debug!(
                                    frame = frame_num,
                                    width = video_info.width(),
                                    height = video_info.height(),
                                    copy_us = frame_start.elapsed().as_micros(),
                                    "Frame delivered"
                                );
                            }
                        }
                        Err(tokio::sync::mpsc::error::TrySendError::Full(_)) => {}
                        Err(tokio::sync::mpsc::error::TrySendError::Closed(_)) => {
                            debug!("Frame receiver closed");
                            return Err(gstreamer::FlowError::Eos);
                        }
                    }

                    Ok(gstreamer::FlowSuccess::Ok)
                })
                .build(),
        );

        pipeline.set_state(gstreamer::State::Playing).map_err(|e| {
            CameraError::InitializationFailed(format!("Failed to start pipeline: {}", e))
        })?;

        let (result, state, _) = pipeline.state(gstreamer::ClockTime::from_seconds(
            timing::START_TIMEOUT_SECS,
        ));
        if let Err(e) = result {
            let _ = pipeline.set_state(gstreamer::State::Null);
            return Err(CameraError::InitializationFailed(format!(
                "Pipeline failed to reach PLAYING: {:?}",
                e
            )));
        }
        if state != gstreamer::State::Playing {
            warn!(state = ?state, "Pipeline is not in PLAYING state yet");
        }

        info!(device = %device.name, "Capture pipeline running");

        Ok(Self {
            device: device.clone(),
            pipeline,
            appsink,
        })
    }
}

impl CaptureSession for CapturePipeline {
    fn device(&self) -> &CameraDevice {
        &self.device
    }
}

impl Drop for CapturePipeline {
    fn drop(&mut self) {
        debug!(device = %self.device.name, "Stopping capture pipeline");
        self.appsink
            .set_callbacks(gstreamer_app::AppSinkCallbacks::builder().build());
        let _ = self.pipeline.set_state(gstreamer::State::Null);
        let (result, state, _) = self.pipeline.state(gstreamer::ClockTime::from_seconds(
            timing::STOP_TIMEOUT_SECS,
        ));
        debug!(result = ?result, state = ?state, "Capture pipeline stopped");
    }
}

/// Build the gst-launch description for a device
fn pipeline_description(device: &CameraDevice) -> String {
    let source = if !device.path.is_empty() {
        format!("v4l2src device={}", device.path)
    } else if let Some(serial) = &device.pipewire_serial {
        format!("pipewiresrc target-object={}", serial)
    } else {
        "autovideosrc".to_string()
    };

    format!(
        "{source} ! decodebin ! videoconvert ! videoscale ! \
         video/x-raw,format=RGBA,width=[1,{MAX_CAPTURE_WIDTH}],pixel-aspect-ratio=1/1 ! \
         appsink name=sink"
    )
}

/// Surface permission problems before GStreamer turns them into a generic error
fn check_device_access(device: &CameraDevice) -> Result<(), CameraError> {
    if device.path.is_empty() {
        return Ok(());
    }

    match std::fs::OpenOptions::new().read(true).open(&device.path) {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            Err(CameraError::PermissionDenied {
                device: device.path.clone(),
            })
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(
            CameraError::InitializationFailed(format!("{} does not exist", device.path)),
        ),
        Err(e) => {
            debug!(path = %device.path, error = %e, "Device access check inconclusive");
            Ok(())
        }
    }
}
