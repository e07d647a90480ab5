// SPDX-License-Identifier: MPL-2.0

//! Device backends
//!
//! - [`camera`]: camera enumeration and capture sessions
//! - [`feedback`]: haptic and audio feedback

pub mod camera;
pub mod feedback;
