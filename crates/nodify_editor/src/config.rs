// SPDX-License-Identifier: MIT OR Apache-2.0
//! Interaction settings, stored as RON.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How a rewired link is reported to graph observers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RewireNotification {
    /// One `Relink` event
    #[default]
    Relink,
    /// A `DelLink` event followed by an `AddLink` event
    DeleteThenAdd,
}

/// What dropping a link onto an already connected pin does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OccupiedTarget {
    /// Delete the pin's current link, then connect
    #[default]
    Replace,
    /// Treat the pin as an invalid target
    Reject,
}

/// Socket interaction settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// How rewires are reported
    pub rewire_notification: RewireNotification,
    /// Policy for drops onto connected pins
    pub occupied_target: OccupiedTarget,
    /// Straight segments used when flattening a link curve
    pub curve_segments: usize,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            rewire_notification: RewireNotification::Relink,
            occupied_target: OccupiedTarget::Replace,
            curve_segments: 32,
        }
    }
}

impl InteractionConfig {
    /// Parse settings from RON. Missing fields keep their defaults.
    pub fn from_ron(source: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(source)?;
        if config.curve_segments == 0 {
            return Err(ConfigError::Invalid("curve_segments must be at least 1".to_string()));
        }
        Ok(config)
    }

    /// Serialize settings as pretty RON
    pub fn to_ron(&self) -> Result<String, ConfigError> {
        let pretty = ron::ser::PrettyConfig::default()
            .struct_names(true)
            .enumerate_arrays(false);
        Ok(ron::ser::to_string_pretty(self, pretty)?)
    }

    /// Load settings from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_ron(&content)?;
        tracing::debug!("Loaded interaction config from {:?}", path);
        Ok(config)
    }

    /// Save settings to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_ron()?)?;
        Ok(())
    }
}
