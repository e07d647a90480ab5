// SPDX-License-Identifier: GPL-3.0-only

//! User configuration
//!
//! Stored as JSON in `$XDG_CONFIG_HOME/qrscan/config.json`. A missing file
//! yields the defaults; toggles changed at runtime are only written back
//! when `remember_feedback` is set.

use crate::backends::camera::types::CameraFacing;
use crate::constants::{detection, timing};
use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

const CONFIG_DIR_NAME: &str = "qrscan";
const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Haptic pulse on detection
    pub vibration_enabled: bool,
    /// Beep on detection
    pub sound_enabled: bool,
    /// Camera used at startup
    pub camera_facing: CameraFacing,
    /// Device path pinned to the front facing (overrides location lookup)
    pub front_device: Option<String>,
    /// Device path pinned to the back facing (overrides location lookup)
    pub back_device: Option<String>,
    /// Cooldown after a live detection
    pub rearm_delay_ms: u64,
    /// Watchdog for a single decode; `None` waits forever
    pub decode_timeout_ms: Option<u64>,
    /// Frames are downscaled to this size before decoding
    pub max_dimension: u32,
    /// Persist vibration/sound toggles when they change
    pub remember_feedback: bool,
    /// Hand links to the system URL handler (off = log only)
    pub open_links: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            vibration_enabled: true,
            sound_enabled: true,
            camera_facing: CameraFacing::Back,
            front_device: None,
            back_device: None,
            rearm_delay_ms: timing::REARM_DELAY.as_millis() as u64,
            decode_timeout_ms: Some(timing::DECODE_TIMEOUT.as_millis() as u64),
            max_dimension: detection::MAX_DIMENSION,
            remember_feedback: false,
            open_links: true,
        }
    }
}

impl Config {
    /// Default location of the config file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load the config from the default location, falling back to defaults
    pub fn load() -> Self {
        let Some(path) = Self::default_path() else {
            warn!("No config directory, using defaults");
            return Self::default();
        };

        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable config");
                Self::default()
            }
        }
    }

    /// Load the config from a specific file
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write the feedback toggles into the file at `path`
    ///
    /// Only the two toggle fields change; everything else keeps its on-disk
    /// value, so command line overrides never end up in the file. A missing
    /// file starts from the defaults.
    pub fn store_feedback(path: &Path, vibration: bool, sound: bool) -> Result<(), ConfigError> {
        let mut stored = if path.exists() {
            Self::load_from(path)?
        } else {
            Self::default()
        };
        stored.vibration_enabled = vibration;
        stored.sound_enabled = sound;
        stored.save_to(path)
    }

    /// Save the config to a specific file, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }

        // serde_json cannot fail on this struct
        let contents = serde_json::to_string_pretty(self).unwrap_or_default();
        std::fs::write(path, contents).map_err(write_err)?;

        debug!(path = %path.display(), "Config saved");
        Ok(())
    }

    pub fn rearm_delay(&self) -> Duration {
        Duration::from_millis(self.rearm_delay_ms)
    }

    /// Decode watchdog, `None` when disabled (unset or zero)
    pub fn decode_timeout(&self) -> Option<Duration> {
        self.decode_timeout_ms
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }

    /// Device path pinned to a facing, if any
    pub fn pinned_device(&self, facing: CameraFacing) -> Option<&str> {
        match facing {
            CameraFacing::Front => self.front_device.as_deref(),
            CameraFacing::Back => self.back_device.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{ "sound_enabled": false }"#).unwrap();
        assert!(!config.sound_enabled);
        assert!(config.vibration_enabled);
        assert_eq!(config.rearm_delay(), Duration::from_millis(1000));
    }

    #[test]
    fn test_zero_timeout_disables_watchdog() {
        let config = Config {
            decode_timeout_ms: Some(0),
            ..Config::default()
        };
        assert_eq!(config.decode_timeout(), None);

        let config = Config {
            decode_timeout_ms: None,
            ..Config::default()
        };
        assert_eq!(config.decode_timeout(), None);
    }

    #[test]
    fn test_store_feedback_keeps_other_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "rearm_delay_ms": 250, "sound_enabled": true }"#).unwrap();

        Config::store_feedback(&path, true, false).unwrap();

        let stored = Config::load_from(&path).unwrap();
        assert!(!stored.sound_enabled);
        assert!(stored.vibration_enabled);
        assert_eq!(stored.rearm_delay_ms, 250);
    }

    #[test]
    fn test_store_feedback_refuses_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ broken").unwrap();

        assert!(matches!(
            Config::store_feedback(&path, false, false),
            Err(ConfigError::Parse { .. })
        ));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ broken");
    }

    #[test]
    fn test_pinned_device() {
        let config = Config {
            front_device: Some("/dev/video2".to_string()),
            ..Config::default()
        };
        assert_eq!(config.pinned_device(CameraFacing::Front), Some("/dev/video2"));
        assert_eq!(config.pinned_device(CameraFacing::Back), None);
    }
}
