// SPDX-License-Identifier: MPL-2.0

//! qrscan - real-time QR code scanner
//!
//! Detects QR codes in a live camera feed (or in an image picked from the
//! gallery), classifies the decoded text as a web link, a file link or plain
//! text, and hands it to the matching system action.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`app`]: Scanner controller, scan gate, classification and dispatch
//! - [`backends`]: Camera capture and haptic/audio feedback devices
//! - [`config`]: User configuration handling
//! - [`storage`]: Gallery image loading and picking
//! - [`terminal`]: Terminal front end
//!
//! # Example
//!
//! ```
//! use qrscan::QrAction;
//!
//! let action = QrAction::classify("https://example.com/app.apk");
//! assert!(matches!(action, QrAction::FileLink(_)));
//! ```

pub mod app;
pub mod backends;
pub mod config;
pub mod constants;
pub mod errors;
pub mod storage;
pub mod terminal;

// Re-export commonly used types
pub use app::frame_processor::{PayloadKind, QrAction, QrDetection};
pub use app::{Collaborators, Message, ScannerApp};
pub use config::Config;
pub use errors::AppError;
