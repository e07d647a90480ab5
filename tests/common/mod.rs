// SPDX-License-Identifier: MPL-2.0

//! Shared mocks for integration tests

#![allow(dead_code)]

use futures::future::BoxFuture;
use qrscan::app::dispatcher::{Notice, Notifier, UrlOpener};
use qrscan::app::frame_processor::{FrameRegion, QrDecoder, QrDetection};
use qrscan::backends::camera::orchestrator::CaptureOrchestrator;
use qrscan::backends::camera::types::{CameraDevice, CameraFacing, CameraFrame, SensorRotation};
use qrscan::backends::camera::{CameraBackend, CaptureSession, FrameSender};
use qrscan::backends::feedback::FeedbackDevice;
use qrscan::errors::{CameraError, DecodeError, DispatchError};
use qrscan::storage::ImagePicker;
use qrscan::{Collaborators, Config, Message, ScannerApp};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver};

#[derive(Default)]
pub struct RecordingOpener {
    pub opened: Mutex<Vec<String>>,
}

impl UrlOpener for RecordingOpener {
    fn open(&self, url: &str) -> Result<(), DispatchError> {
        self.opened.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

impl RecordingOpener {
    pub fn count(&self) -> usize {
        self.opened.lock().unwrap().len()
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub notices: Mutex<Vec<Notice>>,
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}

impl RecordingNotifier {
    pub fn texts(&self) -> Vec<String> {
        self.notices
            .lock()
            .unwrap()
            .iter()
            .map(|n| n.text.clone())
            .collect()
    }

    pub fn contains(&self, text: &str) -> bool {
        self.texts().iter().any(|t| t == text)
    }
}

#[derive(Default)]
pub struct CountingFeedback {
    pub vibrations: AtomicUsize,
    pub beeps: AtomicUsize,
}

impl FeedbackDevice for CountingFeedback {
    fn vibrate(&self, _duration: Duration) {
        self.vibrations.fetch_add(1, Ordering::SeqCst);
    }

    fn beep(&self, _duration: Duration) {
        self.beeps.fetch_add(1, Ordering::SeqCst);
    }
}

impl CountingFeedback {
    pub fn vibrations(&self) -> usize {
        self.vibrations.load(Ordering::SeqCst)
    }

    pub fn beeps(&self) -> usize {
        self.beeps.load(Ordering::SeqCst)
    }
}

/// Decoder that returns the same payloads for every frame
pub struct FixedDecoder {
    payloads: Vec<String>,
}

impl FixedDecoder {
    pub fn new(payloads: &[&str]) -> Self {
        Self {
            payloads: payloads.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl QrDecoder for FixedDecoder {
    fn decode(&self, _frame: &CameraFrame) -> Result<Vec<QrDetection>, DecodeError> {
        Ok(self.payloads.iter().map(|p| detection(p)).collect())
    }
}

/// Decoder that blocks for a while and tracks how many decodes overlap
pub struct SlowDecoder {
    delay: Duration,
    active: AtomicUsize,
    pub peak: AtomicUsize,
    pub calls: AtomicUsize,
}

impl SlowDecoder {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            active: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
        }
    }
}

impl QrDecoder for SlowDecoder {
    fn decode(&self, _frame: &CameraFrame) -> Result<Vec<QrDetection>, DecodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        std::thread::sleep(self.delay);
        self.active.fetch_sub(1, Ordering::SeqCst);
        Ok(vec![detection("https://example.com/late")])
    }
}

/// Picker that always returns the same path
pub struct StaticPicker(pub Option<PathBuf>);

impl ImagePicker for StaticPicker {
    fn pick_image(&self) -> BoxFuture<'static, Option<PathBuf>> {
        let path = self.0.clone();
        Box::pin(async move { path })
    }
}

pub fn detection(content: &str) -> QrDetection {
    QrDetection::new(
        FrameRegion {
            x: 0.25,
            y: 0.25,
            width: 0.5,
            height: 0.5,
        },
        content.to_string(),
    )
}

/// Scanner wired to recording collaborators
pub struct Harness {
    pub app: ScannerApp,
    pub messages: UnboundedReceiver<Message>,
    pub opener: Arc<RecordingOpener>,
    pub notifier: Arc<RecordingNotifier>,
    pub feedback: Arc<CountingFeedback>,
}

impl Harness {
    pub fn new(decoder: Arc<dyn QrDecoder>) -> Self {
        Self::with_config(Config::default(), decoder, None)
    }

    pub fn with_config(
        config: Config,
        decoder: Arc<dyn QrDecoder>,
        picker: Option<Arc<dyn ImagePicker>>,
    ) -> Self {
        let (sender, messages) = mpsc::unbounded_channel();
        let opener = Arc::new(RecordingOpener::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let feedback = Arc::new(CountingFeedback::default());

        let app = ScannerApp::new(
            config,
            Collaborators {
                decoder,
                opener: opener.clone(),
                notifier: notifier.clone(),
                feedback: feedback.clone(),
                picker,
            },
            sender,
        );

        Self {
            app,
            messages,
            opener,
            notifier,
            feedback,
        }
    }

    /// Point the scanner at the config file it was loaded from
    pub fn with_config_path(mut self, path: PathBuf) -> Self {
        self.app = self.app.with_config_path(Some(path));
        self
    }

    /// Wait for the next message posted by background work and apply it
    pub async fn pump(&mut self) -> &'static str {
        let message = self
            .messages
            .recv()
            .await
            .expect("scanner channel closed");
        let name = message_name(&message);
        self.app.update(message);
        name
    }
}

fn message_name(message: &Message) -> &'static str {
    match message {
        Message::FrameCaptured(_) => "FrameCaptured",
        Message::DecodeStalled(_) => "DecodeStalled",
        Message::FrameDecoded(_) => "FrameDecoded",
        Message::Rearm(_) => "Rearm",
        Message::ToggleVibration => "ToggleVibration",
        Message::ToggleSound => "ToggleSound",
        Message::SwitchCamera => "SwitchCamera",
        Message::OpenGallery => "OpenGallery",
        Message::GalleryPicked(_) => "GalleryPicked",
        Message::GalleryScanned(_) => "GalleryScanned",
        Message::Tick => "Tick",
        Message::Quit => "Quit",
    }
}

/// Small blank PNG the gallery path can load
pub fn write_blank_png(dir: &Path) -> PathBuf {
    let path = dir.join("blank.png");
    image::GrayImage::from_pixel(16, 16, image::Luma([255u8]))
        .save(&path)
        .unwrap();
    path
}

pub fn gray_frame() -> CameraFrame {
    CameraFrame::from_luma_image(image::GrayImage::from_pixel(8, 8, image::Luma([128u8])))
}

pub struct FakeSession {
    device: CameraDevice,
}

impl CaptureSession for FakeSession {
    fn device(&self) -> &CameraDevice {
        &self.device
    }
}

/// Backend with a back and a front camera, or failing every bind
pub struct FakeBackend {
    pub bind_error: Option<CameraError>,
    pub binds: Arc<AtomicUsize>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            bind_error: None,
            binds: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing(error: CameraError) -> Self {
        Self {
            bind_error: Some(error),
            binds: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl CameraBackend for FakeBackend {
    fn enumerate_cameras(&self) -> Vec<CameraDevice> {
        vec![
            CameraDevice {
                name: "Rear Camera".into(),
                path: "/dev/video0".into(),
                pipewire_serial: None,
                facing: Some(CameraFacing::Back),
                rotation: SensorRotation::None,
            },
            CameraDevice {
                name: "Selfie Camera".into(),
                path: "/dev/video2".into(),
                pipewire_serial: None,
                facing: Some(CameraFacing::Front),
                rotation: SensorRotation::Rotate270,
            },
        ]
    }

    fn bind(
        &self,
        device: &CameraDevice,
        _frames: FrameSender,
    ) -> Result<Box<dyn CaptureSession>, CameraError> {
        if let Some(error) = &self.bind_error {
            return Err(error.clone());
        }
        self.binds.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeSession {
            device: device.clone(),
        }))
    }
}

pub fn fake_orchestrator(backend: FakeBackend) -> CaptureOrchestrator {
    let (frames, _receiver) = mpsc::channel(1);
    CaptureOrchestrator::new(Box::new(backend), frames)
}
