// SPDX-License-Identifier: GPL-3.0-only

//! Live detection handlers
//!
//! Frame admission, decode results and the cooldown that keeps one code from
//! being acted on again while it is still in view.

use crate::app::dispatcher::Notice;
use crate::app::frame_processor::{QrDetection, decode_until_finished, first_payload};
use crate::app::{Message, ScannerApp};
use crate::backends::camera::types::CameraFrame;
use crate::constants::timing;
use crate::errors::DecodeError;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Where an accepted payload came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DetectionSource {
    Live,
    Gallery,
}

impl ScannerApp {
    // =========================================================================
    // Frame Handlers
    // =========================================================================

    pub(crate) fn handle_frame_captured(&mut self, frame: CameraFrame) {
        self.frame_count += 1;
        if self.frame_count % timing::FRAME_LOG_INTERVAL == 0 {
            debug!(
                frames = self.frame_count,
                analyzed = self.analyzer.analyzed(),
                dropped = self.analyzer.dropped(),
                "Frame statistics"
            );
        }

        let frame = Arc::new(frame);
        self.preview = Some(Arc::clone(&frame));

        if !self.analyzer.try_acquire() {
            return;
        }

        let decoder = Arc::clone(&self.decoder);
        let timeout = self.config.decode_timeout();
        let sender = self.sender.clone();
        tokio::spawn(async move {
            let stall_sender = sender.clone();
            let result = decode_until_finished(decoder, frame, timeout, move |e| {
                let _ = stall_sender.send(Message::DecodeStalled(e));
            })
            .await;
            let _ = sender.send(Message::FrameDecoded(result));
        });
    }

    /// The slot stays taken until the stalled worker comes back
    pub(crate) fn handle_decode_stalled(&mut self, error: DecodeError) {
        warn!(error = %error, "Live decode stalled");
        self.notify(Notice::error(error.to_string()));
    }

    pub(crate) fn handle_frame_decoded(&mut self, result: Result<Vec<QrDetection>, DecodeError>) {
        self.analyzer.release();

        match result {
            Ok(detections) => {
                if let Some(detection) = first_payload(&detections) {
                    let detection = detection.clone();
                    self.handle_detection(detection, DetectionSource::Live);
                }
            }
            Err(DecodeError::InvalidFrame(reason)) => {
                debug!(reason = %reason, "Skipped malformed frame");
            }
            Err(DecodeError::TimedOut(_)) => {
                debug!("Stalled decode finished, slot free again");
            }
            Err(e) => {
                warn!(error = %e, "Live decode failed");
                self.notify(Notice::error(e.to_string()));
            }
        }
    }

    /// Act on one decoded payload
    ///
    /// Live payloads pass through the gate; gallery payloads already hold it.
    pub(crate) fn handle_detection(&mut self, detection: QrDetection, source: DetectionSource) {
        if source == DetectionSource::Live {
            let Some(epoch) = self.session.gate.try_begin_cooldown() else {
                debug!("Gate suppressed, ignoring detection");
                return;
            };
            self.schedule_rearm(epoch);
        }

        info!(
            kind = detection.action.kind().display_name(),
            source = ?source,
            "QR code accepted"
        );

        self.feedback.fire();
        self.dispatcher.dispatch(&detection.action);
        self.last_detection = Some(detection);
    }

    fn schedule_rearm(&self, epoch: u64) {
        let delay = self.config.rearm_delay();
        let sender = self.sender.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = sender.send(Message::Rearm(epoch));
        });
    }

    pub(crate) fn handle_rearm(&mut self, epoch: u64) {
        if self.session.gate.rearm(epoch) {
            debug!(epoch, "Scanner re-armed");
        } else {
            debug!(epoch, "Ignoring stale re-arm");
        }
    }
}
