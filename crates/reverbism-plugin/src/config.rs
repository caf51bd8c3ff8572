//! Static plugin configuration.
//!
//! Chosen once per instance by the embedding host, typically from a small
//! TOML document:
//!
//! ```toml
//! layout = "independent"
//! smoothing_ms = 20.0
//! ```
//!
//! Missing fields take their defaults; unknown fields are rejected so typos
//! surface instead of silently changing the sound.

use crate::error::ConfigError;
use crate::params::ParamLayout;
use serde::{Deserialize, Serialize};

/// Longest accepted coefficient ramp.
pub const MAX_SMOOTHING_MS: f32 = 1000.0;

/// Per-instance settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PluginConfig {
    /// Control layout exposed to the host.
    pub layout: ParamLayout,
    /// Ramp time for reverb coefficient changes, in milliseconds.
    pub smoothing_ms: f32,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            layout: ParamLayout::Percentage,
            smoothing_ms: reverbism_effects::reverb::DEFAULT_SMOOTHING_MS,
        }
    }
}

impl PluginConfig {
    /// Default settings with the given layout.
    pub fn with_layout(layout: ParamLayout) -> Self {
        Self {
            layout,
            ..Self::default()
        }
    }

    /// Parse and validate a TOML document.
    ///
    /// # Example
    ///
    /// ```rust
    /// use reverbism_plugin::{ParamLayout, PluginConfig};
    ///
    /// let config = PluginConfig::from_toml_str("layout = \"independent\"").unwrap();
    /// assert_eq!(config.layout, ParamLayout::Independent);
    /// assert_eq!(config.smoothing_ms, 10.0);
    /// ```
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string(self)?)
    }

    /// Check that every field is in range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.smoothing_ms.is_finite() || !(0.0..=MAX_SMOOTHING_MS).contains(&self.smoothing_ms) {
            return Err(ConfigError::InvalidSmoothing(self.smoothing_ms));
        }
        Ok(())
    }
}
