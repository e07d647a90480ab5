// SPDX-License-Identifier: GPL-3.0-only

//! Camera discovery through the GStreamer device monitor
//!
//! PipeWire exposes libcamera properties such as the mounting location and
//! sensor rotation; plain V4L2 devices only provide a device node.

use super::types::{CameraDevice, CameraFacing, SensorRotation};
use gstreamer::prelude::*;
use tracing::{debug, warn};

/// Enumerate video sources
pub fn enumerate_cameras() -> Vec<CameraDevice> {
    if let Err(e) = gstreamer::init() {
        warn!(error = %e, "GStreamer init failed");
        return Vec::new();
    }

    let monitor = gstreamer::DeviceMonitor::new();
    monitor.add_filter(Some("Video/Source"), None);

    if let Err(e) = monitor.start() {
        warn!(error = %e, "Failed to start device monitor");
        return Vec::new();
    }

    let mut cameras: Vec<CameraDevice> = Vec::new();
    for device in monitor.devices() {
        let name = device.display_name().to_string();
        let Some(props) = device.properties() else {
            debug!(name = %name, "Device has no properties, skipping");
            continue;
        };

        let get = |key: &str| props.get::<String>(key).ok();

        let path = get("api.v4l2.path")
            .or_else(|| get("device.path"))
            .or_else(|| get("object.path").and_then(|p| strip_v4l2_prefix(&p)))
            .unwrap_or_default();
        let pipewire_serial = get("object.serial").or_else(|| {
            props
                .get::<i64>("object.serial")
                .ok()
                .map(|s| s.to_string())
        });
        let facing = get("api.libcamera.location")
            .as_deref()
            .and_then(CameraFacing::from_location);
        let rotation = get("api.libcamera.rotation")
            .as_deref()
            .map(SensorRotation::from_degrees)
            .unwrap_or_default();

        let camera = CameraDevice {
            name,
            path,
            pipewire_serial,
            facing,
            rotation,
        };

        // PipeWire and V4L2 providers can both report the same node
        if !camera.path.is_empty() && cameras.iter().any(|c| c.path == camera.path) {
            debug!(path = %camera.path, "Skipping duplicate device");
            continue;
        }

        debug!(
            name = %camera.name,
            path = %camera.path,
            serial = ?camera.pipewire_serial,
            location = camera.location_label(),
            rotation = %camera.rotation,
            "Found video camera"
        );
        cameras.push(camera);
    }

    monitor.stop();
    cameras
}

/// `object.path = "v4l2:/dev/video0"` → `/dev/video0`
fn strip_v4l2_prefix(object_path: &str) -> Option<String> {
    object_path.strip_prefix("v4l2:").map(str::to_string)
}

/// Pick the device for a facing
///
/// A pinned path wins, then a device reporting the matching location. Without
/// location metadata the first camera is treated as the back camera and the
/// second as the front camera.
pub fn select_device(
    cameras: &[CameraDevice],
    facing: CameraFacing,
    pinned: Option<&str>,
) -> Option<CameraDevice> {
    if let Some(path) = pinned {
        if let Some(camera) = cameras.iter().find(|c| c.path == path) {
            return Some(camera.clone());
        }
        warn!(path, "Pinned camera not found, falling back to location lookup");
    }

    if let Some(camera) = cameras.iter().find(|c| c.facing == Some(facing)) {
        return Some(camera.clone());
    }

    let index = match facing {
        CameraFacing::Back => 0,
        CameraFacing::Front => cameras.len().saturating_sub(1).min(1),
    };
    cameras.get(index).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(path: &str, facing: Option<CameraFacing>) -> CameraDevice {
        CameraDevice {
            name: path.to_string(),
            path: path.to_string(),
            pipewire_serial: None,
            facing,
            rotation: SensorRotation::None,
        }
    }

    #[test]
    fn test_select_by_location() {
        let cameras = vec![
            device("/dev/video0", Some(CameraFacing::Front)),
            device("/dev/video2", Some(CameraFacing::Back)),
        ];
        let back = select_device(&cameras, CameraFacing::Back, None).unwrap();
        assert_eq!(back.path, "/dev/video2");
        let front = select_device(&cameras, CameraFacing::Front, None).unwrap();
        assert_eq!(front.path, "/dev/video0");
    }

    #[test]
    fn test_select_without_location() {
        let cameras = vec![device("/dev/video0", None), device("/dev/video2", None)];
        assert_eq!(
            select_device(&cameras, CameraFacing::Back, None).unwrap().path,
            "/dev/video0"
        );
        assert_eq!(
            select_device(&cameras, CameraFacing::Front, None).unwrap().path,
            "/dev/video2"
        );
    }

    #[test]
    fn test_single_camera_serves_both_facings() {
        let cameras = vec![device("/dev/video0", None)];
        assert!(select_device(&cameras, CameraFacing::Front, None).is_some());
        assert!(select_device(&cameras, CameraFacing::Back, None).is_some());
        assert!(select_device(&[], CameraFacing::Back, None).is_none());
    }

    #[test]
    fn test_pinned_device_wins() {
        let cameras = vec![
            device("/dev/video0", Some(CameraFacing::Back)),
            device("/dev/video4", None),
        ];
        let selected = select_device(&cameras, CameraFacing::Back, Some("/dev/video4")).unwrap();
        assert_eq!(selected.path, "/dev/video4");
    }

    #[test]
    fn test_strip_v4l2_prefix() {
        assert_eq!(
            strip_v4l2_prefix("v4l2:/dev/video0").as_deref(),
            Some("/dev/video0")
        );
        assert_eq!(strip_v4l2_prefix("libcamera:foo"), None);
    }
}
