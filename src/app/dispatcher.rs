// SPDX-License-Identifier: GPL-3.0-only

//! Result dispatch
//!
//! Turns a classified [`QrAction`] into a system action and a user notice.
//! Failures never leave this module; they are logged and shown as notices.

use crate::app::frame_processor::QrAction;
use crate::constants::timing;
use crate::errors::DispatchError;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::{error, info};

/// Notice severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Short message shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

/// Hands URLs to the operating system
pub trait UrlOpener: Send + Sync {
    fn open(&self, url: &str) -> Result<(), DispatchError>;
}

/// Shows notices to the user
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Opens URLs with the desktop's default handler
#[derive(Debug, Default)]
pub struct SystemUrlOpener;

impl UrlOpener for SystemUrlOpener {
    fn open(&self, url: &str) -> Result<(), DispatchError> {
        info!(url = %url, "Opening URL from QR code");
        open::that_detached(url).map_err(|e| DispatchError::OpenFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Logs URLs instead of opening them
#[derive(Debug, Default)]
pub struct DryRunOpener;

impl UrlOpener for DryRunOpener {
    fn open(&self, url: &str) -> Result<(), DispatchError> {
        info!(url = %url, "Not opening URL (dry run)");
        Ok(())
    }
}

/// Prints notices, one per line
#[derive(Debug, Default)]
pub struct StdoutNotifier;

impl Notifier for StdoutNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Info => println!("{}", notice.text),
            NoticeLevel::Error => eprintln!("{}", notice.text),
        }
    }
}

/// Holds the latest notice until it expires; read by the terminal front end
pub struct NoticeBoard {
    current: Mutex<Option<(Notice, Instant)>>,
    duration: Duration,
}

impl Default for NoticeBoard {
    fn default() -> Self {
        Self::new(timing::NOTICE_DURATION)
    }
}

impl NoticeBoard {
    pub fn new(duration: Duration) -> Self {
        Self {
            current: Mutex::new(None),
            duration,
        }
    }

    /// Notice still on screen, if any
    pub fn current(&self) -> Option<Notice> {
        let mut guard = self.current.lock().unwrap_or_else(|e| e.into_inner());
        match guard.as_ref() {
            Some((notice, shown_at)) if shown_at.elapsed() < self.duration => Some(notice.clone()),
            Some(_) => {
                *guard = None;
                None
            }
            None => None,
        }
    }
}

impl Notifier for NoticeBoard {
    fn notify(&self, notice: Notice) {
        let mut guard = self.current.lock().unwrap_or_else(|e| e.into_inner());
        *guard = Some((notice, Instant::now()));
    }
}

/// What the dispatcher did with a payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Opened,
    Shown,
    Failed,
}

/// Routes classified payloads to the opener and the notifier
#[derive(Clone)]
pub struct ResultDispatcher {
    opener: Arc<dyn UrlOpener>,
    notifier: Arc<dyn Notifier>,
}

impl ResultDispatcher {
    pub fn new(opener: Arc<dyn UrlOpener>, notifier: Arc<dyn Notifier>) -> Self {
        Self { opener, notifier }
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    pub fn dispatch(&self, action: &QrAction) -> DispatchOutcome {
        match action {
            QrAction::WebLink(url) => {
                self.open_with_notices(url, "Opening page...", "Unable to open page")
            }
            QrAction::FileLink(url) => {
                self.open_with_notices(url, "Downloading file...", "Unable to download file")
            }
            QrAction::PlainText(text) => {
                info!(len = text.len(), "Showing QR text");
                self.notifier
                    .notify(Notice::info(format!("Scan result: {}", text)));
                DispatchOutcome::Shown
            }
        }
    }

    /// The intent notice is only shown once the handler accepted the URL
    fn open_with_notices(&self, url: &str, opened: &str, failed: &str) -> DispatchOutcome {
        match self.opener.open(url) {
            Ok(()) => {
                self.notifier.notify(Notice::info(opened));
                DispatchOutcome::Opened
            }
            Err(e) => {
                error!(url = %url, error = %e, "Failed to dispatch QR action");
                self.notifier.notify(Notice::error(failed));
                DispatchOutcome::Failed
            }
        }
    }
}
