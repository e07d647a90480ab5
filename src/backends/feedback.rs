// SPDX-License-Identifier: GPL-3.0-only

//! Haptic and audio feedback devices
//!
//! Haptics go through feedbackd (`org.sigxcpu.Feedback` on the session bus),
//! which drives the vibration motor on Linux phones. The beep is a short sine
//! tone played through GStreamer. Both are best-effort: a missing daemon or
//! audio sink is logged at debug level and otherwise ignored.

use crate::constants::feedback as consts;
use gstreamer::prelude::*;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;
use zbus::zvariant::Value;

/// Device side of the feedback controller
pub trait FeedbackDevice: Send + Sync {
    /// Single haptic pulse
    fn vibrate(&self, duration: Duration);

    /// Single short tone
    fn beep(&self, duration: Duration);
}

/// feedbackd haptics plus a GStreamer beep
#[derive(Debug, Default)]
pub struct SystemFeedback;

impl FeedbackDevice for SystemFeedback {
    fn vibrate(&self, duration: Duration) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            debug!("No runtime for haptic feedback");
            return;
        };
        handle.spawn(async move {
            if let Err(e) = trigger_haptic(duration).await {
                debug!(error = %e, "Haptic feedback unavailable");
            }
        });
    }

    fn beep(&self, duration: Duration) {
        std::thread::spawn(move || {
            if let Err(e) = play_tone(duration) {
                debug!(error = %e, "Audio feedback unavailable");
            }
        });
    }
}

/// Ask feedbackd for a short haptic event
async fn trigger_haptic(duration: Duration) -> Result<u32, zbus::Error> {
    let connection = zbus::Connection::session().await?;

    let proxy = zbus::Proxy::new(
        &connection,
        "org.sigxcpu.Feedback",
        "/org/sigxcpu/Feedback",
        "org.sigxcpu.Feedback",
    )
    .await?;

    let hints: HashMap<&str, Value<'_>> = HashMap::new();
    // feedbackd timeouts are in seconds; -1 lets the event's own short pattern run
    let timeout: i32 = -1;

    let id: u32 = proxy
        .call(
            "TriggerFeedback",
            &(
                consts::FEEDBACKD_APP_ID,
                consts::FEEDBACKD_EVENT,
                hints,
                timeout,
            ),
        )
        .await?;

    debug!(id, duration_ms = duration.as_millis(), "Haptic feedback triggered");
    Ok(id)
}

/// Play a sine beep and block until it is done
fn play_tone(duration: Duration) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    gstreamer::init()?;

    let description = format!(
        "audiotestsrc wave=sine freq={} volume={} is-live=true ! audioconvert ! autoaudiosink",
        consts::BEEP_FREQUENCY_HZ,
        consts::BEEP_VOLUME
    );
    let pipeline = gstreamer::parse::launch(&description)?;

    pipeline.set_state(gstreamer::State::Playing)?;
    std::thread::sleep(duration);
    pipeline.set_state(gstreamer::State::Null)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vibrate_without_runtime_does_not_panic() {
        SystemFeedback.vibrate(Duration::from_millis(1));
    }
}
