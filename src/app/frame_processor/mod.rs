// SPDX-License-Identifier: MPL-2.0

//! Frame processor module for async frame analysis
//!
//! Live frames pass through the [`FrameAnalyzer`] slot and are decoded on
//! the blocking pool; results are classified into [`QrAction`]s.

pub mod analyzer;
pub mod tasks;
pub mod types;

pub use analyzer::{FrameAnalyzer, decode_until_finished, decode_with_watchdog};
pub use tasks::{QrDecoder, QrDetector, qr_detector};
pub use types::{FrameRegion, PayloadKind, QrAction, QrDetection, first_payload};
