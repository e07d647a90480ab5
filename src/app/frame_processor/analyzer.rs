// SPDX-License-Identifier: GPL-3.0-only

//! Live frame admission
//!
//! One frame is decoded at a time. Frames that arrive while a decode is in
//! flight are dropped rather than queued, so the analyzed frame is always
//! close to the newest one.

use super::tasks::QrDecoder;
use super::types::QrDetection;
use crate::backends::camera::types::CameraFrame;
use crate::errors::DecodeError;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Single-slot admission control for live frames
#[derive(Debug, Default)]
pub struct FrameAnalyzer {
    in_flight: bool,
    analyzed: u64,
    dropped: u64,
}

impl FrameAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the decode slot; false means the frame should be dropped
    pub fn try_acquire(&mut self) -> bool {
        if self.in_flight {
            self.dropped += 1;
            return false;
        }
        self.in_flight = true;
        self.analyzed += 1;
        true
    }

    /// Free the decode slot once a result (or failure) came back
    pub fn release(&mut self) {
        self.in_flight = false;
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight
    }

    /// Frames handed to the decoder
    pub fn analyzed(&self) -> u64 {
        self.analyzed
    }

    /// Frames dropped because the slot was taken
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

/// Run a decode on the blocking pool, bounded by an optional watchdog
///
/// The frame is moved into the worker and released when the worker returns,
/// whether the decode succeeded or not. A timed out worker cannot be
/// cancelled; it finishes in the background and its result is discarded.
pub async fn decode_with_watchdog(
    decoder: Arc<dyn QrDecoder>,
    frame: Arc<CameraFrame>,
    timeout: Option<Duration>,
) -> Result<Vec<QrDetection>, DecodeError> {
    let worker = tokio::task::spawn_blocking(move || decoder.decode(&frame));

    let joined = match timeout {
        Some(limit) => match tokio::time::timeout(limit, worker).await {
            Ok(joined) => joined,
            Err(_) => {
                warn!(timeout_ms = limit.as_millis(), "QR decode timed out");
                return Err(DecodeError::TimedOut(limit));
            }
        },
        None => worker.await,
    };

    worker_result(joined)
}

/// Run a live decode that only returns once the worker is done
///
/// When the watchdog expires `on_stall` is called once with the timeout
/// error, then the worker is still awaited so the caller keeps its decode
/// slot until the blocking thread is free again. The late result of a
/// stalled worker is discarded and reported as the timeout.
pub async fn decode_until_finished<F>(
    decoder: Arc<dyn QrDecoder>,
    frame: Arc<CameraFrame>,
    timeout: Option<Duration>,
    on_stall: F,
) -> Result<Vec<QrDetection>, DecodeError>
where
    F: FnOnce(DecodeError) + Send,
{
    let mut worker = tokio::task::spawn_blocking(move || decoder.decode(&frame));

    let Some(limit) = timeout else {
        return worker_result(worker.await);
    };

    match tokio::time::timeout(limit, &mut worker).await {
        Ok(joined) => worker_result(joined),
        Err(_) => {
            warn!(timeout_ms = limit.as_millis(), "QR decode stalled");
            on_stall(DecodeError::TimedOut(limit));

            let late = worker.await;
            debug!(finished = late.is_ok(), "Stalled QR decode returned, result discarded");
            Err(DecodeError::TimedOut(limit))
        }
    }
}

fn worker_result(
    joined: Result<Result<Vec<QrDetection>, DecodeError>, tokio::task::JoinError>,
) -> Result<Vec<QrDetection>, DecodeError> {
    joined.unwrap_or_else(|e| {
        warn!(error = %e, "QR detection task panicked");
        Err(DecodeError::WorkerFailed(e.to_string()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::camera::types::{PixelFormat, SensorRotation};
    use std::time::Instant;

    struct SlowDecoder(Duration);

    impl QrDecoder for SlowDecoder {
        fn decode(&self, _frame: &CameraFrame) -> Result<Vec<QrDetection>, DecodeError> {
            std::thread::sleep(self.0);
            Ok(Vec::new())
        }
    }

    struct PanickingDecoder;

    impl QrDecoder for PanickingDecoder {
        fn decode(&self, _frame: &CameraFrame) -> Result<Vec<QrDetection>, DecodeError> {
            panic!("decoder exploded");
        }
    }

    fn frame() -> Arc<CameraFrame> {
        Arc::new(CameraFrame {
            width: 1,
            height: 1,
            stride: 1,
            format: PixelFormat::Gray8,
            data: Arc::from(vec![0u8].as_slice()),
            rotation: SensorRotation::None,
            captured_at: Instant::now(),
        })
    }

    #[test]
    fn test_single_slot() {
        let mut analyzer = FrameAnalyzer::new();
        assert!(analyzer.try_acquire());
        assert!(!analyzer.try_acquire());
        assert!(!analyzer.try_acquire());
        analyzer.release();
        assert!(analyzer.try_acquire());
        assert_eq!(analyzer.analyzed(), 2);
        assert_eq!(analyzer.dropped(), 2);
    }

    #[tokio::test]
    async fn test_watchdog_expires() {
        let decoder = Arc::new(SlowDecoder(Duration::from_millis(500)));
        let result =
            decode_with_watchdog(decoder, frame(), Some(Duration::from_millis(20))).await;
        assert_eq!(result, Err(DecodeError::TimedOut(Duration::from_millis(20))));
    }

    #[tokio::test]
    async fn test_no_watchdog_waits() {
        let decoder = Arc::new(SlowDecoder(Duration::from_millis(20)));
        let result = decode_with_watchdog(decoder, frame(), None).await;
        assert_eq!(result, Ok(Vec::new()));
    }

    #[tokio::test]
    async fn test_panicking_decoder_is_reported() {
        let result = decode_with_watchdog(Arc::new(PanickingDecoder), frame(), None).await;
        assert!(matches!(result, Err(DecodeError::WorkerFailed(_))));
    }

    #[tokio::test]
    async fn test_stalled_decode_waits_for_worker() {
        let decoder = Arc::new(SlowDecoder(Duration::from_millis(150)));
        let limit = Duration::from_millis(20);
        let stalls = std::sync::Mutex::new(Vec::new());
        let started = Instant::now();

        let result = decode_until_finished(decoder, frame(), Some(limit), |e| {
            stalls.lock().unwrap().push(e)
        })
        .await;

        assert_eq!(result, Err(DecodeError::TimedOut(limit)));
        assert_eq!(*stalls.lock().unwrap(), vec![DecodeError::TimedOut(limit)]);
        assert!(started.elapsed() >= Duration::from_millis(150));
    }

    #[tokio::test]
    async fn test_fast_decode_never_stalls() {
        let decoder = Arc::new(SlowDecoder(Duration::from_millis(1)));
        let result = decode_until_finished(decoder, frame(), Some(Duration::from_secs(5)), |_| {
            panic!("watchdog fired for a fast decode")
        })
        .await;
        assert_eq!(result, Ok(Vec::new()));
    }

    #[tokio::test]
    async fn test_frame_released_after_decode() {
        let frame = frame();
        let decoder = Arc::new(SlowDecoder(Duration::from_millis(1)));
        decode_with_watchdog(decoder, Arc::clone(&frame), None)
            .await
            .unwrap();
        assert_eq!(Arc::strong_count(&frame), 1);
    }
}
