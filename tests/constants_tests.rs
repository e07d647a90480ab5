// SPDX-License-Identifier: MPL-2.0

//! Integration tests for constants module

use qrscan::constants::{animation, feedback, links, timing};
use std::time::Duration;

#[test]
fn test_file_extension_set() {
    // 20 download extensions, no duplicates, no leading dots
    assert_eq!(links::FILE_EXTENSIONS.len(), 20);
    let mut sorted = links::FILE_EXTENSIONS.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    assert_eq!(sorted.len(), 20);
    assert!(links::FILE_EXTENSIONS.iter().all(|e| !e.starts_with('.')));
}

#[test]
fn test_animation_steps_fit_range() {
    // A full sweep takes a whole number of ticks
    let steps = 1.0 / animation::STEP;
    assert!((steps - steps.round()).abs() < 1e-3);
    assert_eq!(animation::TICK_INTERVAL, Duration::from_millis(50));
}

#[test]
fn test_feedback_is_short() {
    assert!(feedback::VIBRATION_DURATION <= Duration::from_millis(500));
    assert!(feedback::BEEP_DURATION <= Duration::from_millis(500));
}

#[test]
fn test_timing_defaults() {
    assert_eq!(timing::REARM_DELAY, Duration::from_millis(1000));
    assert!(timing::DECODE_TIMEOUT > timing::REARM_DELAY);
}
