// SPDX-License-Identifier: GPL-3.0-only

//! Gallery fallback handlers
//!
//! A gallery scan holds the gate for its whole duration, so live detections
//! are ignored until the picked image has been decoded and handled.

use super::detection::DetectionSource;
use crate::app::dispatcher::Notice;
use crate::app::frame_processor::{QrDetection, first_payload};
use crate::app::state::{GateState, SuppressReason};
use crate::app::{Message, ScannerApp};
use crate::errors::GalleryError;
use crate::storage;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

impl ScannerApp {
    fn gallery_busy(&self) -> bool {
        self.gallery_pending
            || self.session.gate.state() == GateState::Suppressed(SuppressReason::Gallery)
    }

    pub(crate) fn handle_open_gallery(&mut self) {
        if self.gallery_busy() {
            self.notify(Notice::info("Gallery scan already in progress"));
            return;
        }
        let Some(picker) = self.picker.clone() else {
            self.notify(Notice::error("Gallery is not available"));
            return;
        };

        self.gallery_pending = true;
        let sender = self.sender.clone();
        tokio::spawn(async move {
            let path = picker.pick_image().await;
            let _ = sender.send(Message::GalleryPicked(path));
        });
    }

    pub(crate) fn handle_gallery_picked(&mut self, path: Option<PathBuf>) {
        self.gallery_pending = false;
        match path {
            Some(path) => self.scan_from_gallery(path),
            None => info!("Gallery pick cancelled"),
        }
    }

    /// Decode a user-selected image through the live decoder
    pub fn scan_from_gallery(&mut self, path: PathBuf) {
        if self.gallery_busy() {
            self.notify(Notice::info("Gallery scan already in progress"));
            return;
        }

        info!(path = %path.display(), "Scanning image from gallery");
        self.session.gate.begin_gallery();

        let decoder = Arc::clone(&self.decoder);
        let timeout = self.config.decode_timeout();
        let sender = self.sender.clone();
        tokio::spawn(async move {
            let result = storage::decode_image_file(&path, decoder, timeout).await;
            let _ = sender.send(Message::GalleryScanned(result));
        });
    }

    pub(crate) fn handle_gallery_scanned(
        &mut self,
        result: Result<Vec<QrDetection>, GalleryError>,
    ) {
        match result {
            Ok(detections) => match first_payload(&detections) {
                Some(detection) => {
                    let detection = detection.clone();
                    self.handle_detection(detection, DetectionSource::Gallery);
                }
                None => {
                    info!("No QR code in gallery image");
                    self.notify(Notice::info("No QR code recognized"));
                }
            },
            Err(GalleryError::Load { path, reason }) => {
                warn!(path = %path.display(), reason = %reason, "Failed to load gallery image");
                self.notify(Notice::error(format!("Unable to load image: {}", reason)));
            }
            Err(GalleryError::Decode(e)) => {
                warn!(error = %e, "Gallery decode failed");
                self.notify(Notice::error(format!("Image scan failed: {}", e)));
            }
        }

        self.session.gate.end_gallery();
    }
}
