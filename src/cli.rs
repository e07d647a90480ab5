// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands for headless scanner operations
//!
//! This module provides command-line functionality for:
//! - Listing available cameras
//! - Scanning a QR code from an image file
//! - Classifying a payload without scanning

use qrscan::app::dispatcher::{
    DryRunOpener, ResultDispatcher, StdoutNotifier, SystemUrlOpener, UrlOpener,
};
use qrscan::app::frame_processor::{
    FrameRegion, PayloadKind, QrAction, QrDetector, first_payload,
};
use qrscan::backends::camera::enumeration::enumerate_cameras;
use qrscan::config::Config;
use qrscan::storage::decode_image_file;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

/// JSON view of one scan result
#[derive(Debug, Serialize)]
struct ScanReport<'a> {
    kind: PayloadKind,
    content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    bounds: Option<&'a FrameRegion>,
}

/// List all available cameras
pub fn list_cameras() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize GStreamer
    gstreamer::init()?;

    let cameras = enumerate_cameras();

    if cameras.is_empty() {
        println!("No cameras found.");
        return Ok(());
    }

    println!("Available cameras:");
    println!();
    for (index, camera) in cameras.iter().enumerate() {
        println!("  [{}] {}", index, camera.name);
        println!("      Path: {}", camera.path);
        println!("      Location: {}", camera.location_label());
        if camera.rotation.degrees() != 0 {
            println!("      Rotation: {}", camera.rotation);
        }
        println!();
    }

    Ok(())
}

/// Scan an image file once and act on the first payload
pub fn scan_image(
    path: &Path,
    no_open: bool,
    json: bool,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Runtime::new()?;
    let decoder = Arc::new(QrDetector::with_max_dimension(config.max_dimension));
    let detections = runtime.block_on(decode_image_file(path, decoder, config.decode_timeout()))?;

    let Some(detection) = first_payload(&detections) else {
        if json {
            println!("null");
        } else {
            println!("No QR code recognized");
        }
        return Ok(());
    };

    if json {
        let report = ScanReport {
            kind: detection.action.kind(),
            content: &detection.content,
            bounds: Some(&detection.bounds),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let opener: Arc<dyn UrlOpener> = if no_open || !config.open_links {
        Arc::new(DryRunOpener)
    } else {
        Arc::new(SystemUrlOpener)
    };
    let dispatcher = ResultDispatcher::new(opener, Arc::new(StdoutNotifier));
    println!(
        "{}: {}",
        detection.action.kind().display_name(),
        detection.content
    );
    dispatcher.dispatch(&detection.action);

    Ok(())
}

/// Print how a payload would be handled
pub fn classify(text: &str, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let action = QrAction::classify(text);

    if json {
        let report = ScanReport {
            kind: action.kind(),
            content: action.text(),
            bounds: None,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{} ({})", action.kind().display_name(), action.action_label());
        println!("{}", action.text());
    }

    Ok(())
}
