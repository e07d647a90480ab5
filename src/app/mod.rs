// SPDX-License-Identifier: MPL-2.0

//! Scanner controller
//!
//! [`ScannerApp`] is the single owner of all scanner state. Everything that
//! happens (captured frames, decode results, timers, key presses, gallery
//! picks) arrives as a [`Message`] and is applied by [`ScannerApp::update`].
//! Background work never touches the state directly; it posts a message
//! back on the owner's channel when it is done.
//!
//! # Architecture
//!
//! - `state`: scan gate, session, feedback toggles, animation phase
//! - `frame_processor`: payload classification and QR decoding
//! - `dispatcher`: system actions and user notices
//! - `feedback`: vibration/beep gated by the toggles
//! - `update`: message routing
//! - `handlers`: message handlers grouped by domain

pub mod dispatcher;
pub mod feedback;
pub mod frame_processor;
mod handlers;
pub mod state;
mod update;

use crate::app::dispatcher::{Notice, Notifier, ResultDispatcher, UrlOpener};
use crate::app::feedback::FeedbackController;
use crate::app::frame_processor::{FrameAnalyzer, QrDecoder, QrDetection};
use crate::app::state::{AnimationPhase, FeedbackPreferences, GateState, ScanSession};
use crate::backends::camera::orchestrator::CaptureOrchestrator;
use crate::backends::camera::types::{CameraDevice, CameraFacing, CameraFrame};
use crate::backends::feedback::FeedbackDevice;
use crate::config::Config;
use crate::errors::{DecodeError, GalleryError};
use crate::storage::ImagePicker;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

/// Everything that can change scanner state
#[derive(Debug)]
pub enum Message {
    /// Newest frame from the capture session
    FrameCaptured(CameraFrame),
    /// Live decode exceeded the watchdog; the worker is still running
    DecodeStalled(DecodeError),
    /// Live decode finished
    FrameDecoded(Result<Vec<QrDetection>, DecodeError>),
    /// Cooldown elapsed for the given gate epoch
    Rearm(u64),
    ToggleVibration,
    ToggleSound,
    SwitchCamera,
    OpenGallery,
    /// Picker closed; `None` when cancelled
    GalleryPicked(Option<PathBuf>),
    /// Gallery decode finished
    GalleryScanned(Result<Vec<QrDetection>, GalleryError>),
    /// Animation tick
    Tick,
    Quit,
}

/// External collaborators the controller drives
pub struct Collaborators {
    pub decoder: Arc<dyn QrDecoder>,
    pub opener: Arc<dyn UrlOpener>,
    pub notifier: Arc<dyn Notifier>,
    pub feedback: Arc<dyn FeedbackDevice>,
    pub picker: Option<Arc<dyn ImagePicker>>,
}

pub struct ScannerApp {
    config: Config,
    config_path: Option<PathBuf>,
    session: ScanSession,
    feedback: FeedbackController,
    dispatcher: ResultDispatcher,
    analyzer: FrameAnalyzer,
    animation: AnimationPhase,
    decoder: Arc<dyn QrDecoder>,
    picker: Option<Arc<dyn ImagePicker>>,
    camera: Option<CaptureOrchestrator>,
    sender: UnboundedSender<Message>,
    preview: Option<Arc<CameraFrame>>,
    last_detection: Option<QrDetection>,
    gallery_pending: bool,
    frame_count: u64,
    should_quit: bool,
}

impl ScannerApp {
    /// `sender` is the owner loop's own channel; background work posts
    /// its results there.
    pub fn new(config: Config, collaborators: Collaborators, sender: UnboundedSender<Message>) -> Self {
        let prefs = FeedbackPreferences {
            vibration_enabled: config.vibration_enabled,
            sound_enabled: config.sound_enabled,
        };

        Self {
            session: ScanSession::new(config.camera_facing),
            feedback: FeedbackController::new(prefs, collaborators.feedback),
            dispatcher: ResultDispatcher::new(collaborators.opener, collaborators.notifier),
            analyzer: FrameAnalyzer::new(),
            animation: AnimationPhase::default(),
            decoder: collaborators.decoder,
            picker: collaborators.picker,
            camera: None,
            sender,
            preview: None,
            last_detection: None,
            gallery_pending: false,
            frame_count: 0,
            should_quit: false,
            config_path: None,
            config,
        }
    }

    /// File the config was loaded from; remembered toggles are written there
    pub fn with_config_path(mut self, path: Option<PathBuf>) -> Self {
        self.config_path = path;
        self
    }

    /// Hand the capture orchestrator to the controller
    pub fn attach_camera(&mut self, camera: CaptureOrchestrator) {
        self.camera = Some(camera);
    }

    /// Release the camera and stop
    pub fn shutdown(&mut self) {
        if let Some(camera) = self.camera.as_mut() {
            camera.stop();
        }
        self.should_quit = true;
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn gate_state(&self) -> GateState {
        self.session.gate.state()
    }

    pub fn is_scanning(&self) -> bool {
        self.session.is_scanning()
    }

    pub fn facing(&self) -> CameraFacing {
        self.session.facing
    }

    pub fn preferences(&self) -> FeedbackPreferences {
        self.feedback.preferences()
    }

    pub fn animation(&self) -> AnimationPhase {
        self.animation
    }

    pub fn analyzer(&self) -> &FrameAnalyzer {
        &self.analyzer
    }

    /// Frame to show in the preview
    pub fn preview(&self) -> Option<&Arc<CameraFrame>> {
        self.preview.as_ref()
    }

    /// Most recent accepted detection (for the overlay)
    pub fn last_detection(&self) -> Option<&QrDetection> {
        self.last_detection.as_ref()
    }

    pub fn current_device(&self) -> Option<&CameraDevice> {
        self.camera.as_ref().and_then(|c| c.current_device())
    }

    pub fn is_gallery_pending(&self) -> bool {
        self.gallery_pending
    }

    fn notify(&self, notice: Notice) {
        self.dispatcher.notifier().notify(notice);
    }
}
