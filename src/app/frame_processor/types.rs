// SPDX-License-Identifier: MPL-2.0

//! Core types for frame processing results
//!
//! These types represent the output of the decoder and the classification
//! that decides which action a scan triggers.

use crate::constants::links;
use serde::Serialize;

/// A rectangular region within a frame
///
/// Coordinates are normalized (0.0 to 1.0) relative to the frame dimensions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameRegion {
    /// Left edge (0.0 = left of frame, 1.0 = right of frame)
    pub x: f32,
    /// Top edge (0.0 = top of frame, 1.0 = bottom of frame)
    pub y: f32,
    /// Width as fraction of frame width
    pub width: f32,
    /// Height as fraction of frame height
    pub height: f32,
}

impl FrameRegion {
    /// Create a frame region from pixel coordinates
    pub fn from_pixels(
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        frame_width: u32,
        frame_height: u32,
    ) -> Self {
        Self {
            x: x as f32 / frame_width as f32,
            y: y as f32 / frame_height as f32,
            width: width as f32 / frame_width as f32,
            height: height as f32 / frame_height as f32,
        }
    }
}

/// Kind of payload, without the text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadKind {
    WebLink,
    FileLink,
    PlainText,
}

impl PayloadKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            PayloadKind::WebLink => "web link",
            PayloadKind::FileLink => "file link",
            PayloadKind::PlainText => "plain text",
        }
    }
}

/// Action derived from decoded QR content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QrAction {
    /// URL to open in a browser
    WebLink(String),
    /// URL pointing at a downloadable file
    FileLink(String),
    /// Anything that is not an absolute URL
    PlainText(String),
}

impl QrAction {
    /// Classify decoded content
    ///
    /// Total: anything that is not an absolute `scheme://host` URL is plain text.
    /// Links are trimmed; plain text keeps the decoded content as is.
    pub fn classify(content: &str) -> Self {
        let trimmed = content.trim();

        if !is_valid_url(trimmed) {
            return Self::PlainText(content.to_string());
        }

        if is_file_url(trimmed) {
            Self::FileLink(trimmed.to_string())
        } else {
            Self::WebLink(trimmed.to_string())
        }
    }

    pub fn kind(&self) -> PayloadKind {
        match self {
            Self::WebLink(_) => PayloadKind::WebLink,
            Self::FileLink(_) => PayloadKind::FileLink,
            Self::PlainText(_) => PayloadKind::PlainText,
        }
    }

    /// The classified text
    pub fn text(&self) -> &str {
        match self {
            Self::WebLink(s) | Self::FileLink(s) | Self::PlainText(s) => s,
        }
    }

    /// Get the primary action label for this payload
    pub fn action_label(&self) -> &'static str {
        match self {
            Self::WebLink(_) => "Open Link",
            Self::FileLink(_) => "Download File",
            Self::PlainText(_) => "Show Text",
        }
    }
}

/// Absolute URL check: `scheme://host[...]` with no whitespace
pub fn is_valid_url(s: &str) -> bool {
    if s.is_empty() || s.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((scheme, rest)) = s.split_once("://") else {
        return false;
    };

    let mut scheme_chars = scheme.chars();
    let scheme_ok = scheme_chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && scheme_chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    if !scheme_ok {
        return false;
    }

    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    // Drop userinfo and port
    let host_port = authority.rsplit('@').next().unwrap_or_default();
    let host = if host_port.starts_with('[') {
        host_port.split_inclusive(']').next().unwrap_or_default()
    } else {
        host_port.split(':').next().unwrap_or_default()
    };

    !host.is_empty() && host != "[]"
}

/// Download link check on an already validated URL, case-insensitive
pub fn is_file_url(url: &str) -> bool {
    let lower = url.to_lowercase();
    if lower.contains(links::DOWNLOAD_SEGMENT) {
        return true;
    }

    links::FILE_EXTENSIONS.iter().any(|ext| {
        lower
            .strip_suffix(ext)
            .is_some_and(|stem| stem.ends_with('.'))
    })
}

/// A detected QR code with its location and parsed content
#[derive(Debug, Clone, PartialEq)]
pub struct QrDetection {
    /// Bounding box of the QR code in normalized frame coordinates
    pub bounds: FrameRegion,
    /// Raw content decoded from the QR code
    pub content: String,
    /// Classified action based on content
    pub action: QrAction,
}

impl QrDetection {
    /// Create a new QR detection result
    pub fn new(bounds: FrameRegion, content: String) -> Self {
        let action = QrAction::classify(&content);
        Self {
            bounds,
            content,
            action,
        }
    }
}

/// First detection that carries a payload
pub fn first_payload(detections: &[QrDetection]) -> Option<&QrDetection> {
    detections.iter().find(|d| !d.content.is_empty())
}
