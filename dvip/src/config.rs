use crate::{
    protocol::{
        choice::{DEFAULT_PAN_TILT_SPEED, DEFAULT_ZOOM_SPEED},
        Frame, LengthMode, DEFAULT_PORT,
    },
    Error, Result,
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Connection settings for a single camera.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct DvipConfig {
    /// Camera host name or IP address. When `None`, the controller stays
    /// disconnected.
    pub host: Option<String>,
    pub port: u16,
    /// VISCA device address, `1..=7`.
    pub device_address: u8,
    /// Send a status inquiry every second while connected.
    pub poll: bool,
    /// Initial pan/tilt speed id.
    pub pan_tilt_speed: u8,
    /// Initial zoom speed id.
    pub zoom_speed: u8,
    pub length_mode: LengthMode,
}

impl Default for DvipConfig {
    fn default() -> Self {
        Self {
            host: None,
            port: DEFAULT_PORT,
            device_address: Frame::MIN_ADDRESS,
            poll: false,
            pan_tilt_speed: DEFAULT_PAN_TILT_SPEED,
            zoom_speed: DEFAULT_ZOOM_SPEED,
            length_mode: LengthMode::default(),
        }
    }
}

impl DvipConfig {
    /// Default settings for a camera at `host`.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: Some(host.into()),
            ..Default::default()
        }
    }

    /// Checks the settings can be used to connect.
    ///
    /// Unknown speed ids are not an error here: they fall back to defaults
    /// when the session starts.
    pub fn validate(&self) -> Result {
        if !(Frame::MIN_ADDRESS..=Frame::MAX_ADDRESS).contains(&self.device_address) {
            error!("device address {} out of range", self.device_address);
            return Err(Error::InvalidConfig("device address must be 1..=7"));
        }

        if self.port == 0 {
            return Err(Error::InvalidConfig("port must not be 0"));
        }

        if let Some(host) = &self.host {
            if host.trim().is_empty() {
                return Err(Error::InvalidConfig("host must not be empty"));
            }
        }

        Ok(())
    }
}
