//! Session configuration
//!
//! Loaded from TOML by hosts that ship a config file; browser hosts use the
//! defaults and adjust the default size at runtime.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ConfigError;

/// Range offered for the default width of new placements
pub const DEFAULT_WIDTH_RANGE: (f64, f64) = (0.05, 0.30);
/// Range offered for the default height of new placements
pub const DEFAULT_HEIGHT_RANGE: (f64, f64) = (0.03, 0.20);

/// Size of newly created placements, in page-relative units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignatureSize {
    pub width: f64,
    pub height: f64,
}

impl Default for SignatureSize {
    fn default() -> Self {
        Self {
            width: 0.15,
            height: 0.08,
        }
    }
}

impl SignatureSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Bound to the adjustable ranges; non-finite values fall back to the default
    pub fn clamped(self) -> Self {
        let default = Self::default();
        let (min_w, max_w) = DEFAULT_WIDTH_RANGE;
        let (min_h, max_h) = DEFAULT_HEIGHT_RANGE;
        let width = if self.width.is_finite() {
            self.width.clamp(min_w, max_w)
        } else {
            default.width
        };
        let height = if self.height.is_finite() {
            self.height.clamp(min_h, max_h)
        } else {
            default.height
        };
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionMode {
    /// Placements can be created, moved, resized and removed
    #[default]
    Interactive,
    /// Read-only viewing: pointer and page events are ignored
    Preview,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Initial size of new placements
    pub default_size: SignatureSize,
    /// Half-extent of a corner handle's hit area, page-relative
    pub handle_tolerance: f64,
    pub mode: SessionMode,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_size: SignatureSize::default(),
            handle_tolerance: 0.015,
            mode: SessionMode::Interactive,
        }
    }
}

impl SessionConfig {
    /// Load and validate configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the TOML is malformed, or
    /// a value is out of range.
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Parse and validate configuration from a TOML string. Missing keys take
    /// their defaults.
    pub fn from_toml(s: &str) -> anyhow::Result<Self> {
        let config: SessionConfig = toml::from_str(s).context("Failed to parse TOML")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let (min_w, max_w) = DEFAULT_WIDTH_RANGE;
        let (min_h, max_h) = DEFAULT_HEIGHT_RANGE;
        let size = self.default_size;

        if !(min_w..=max_w).contains(&size.width) {
            return Err(ConfigError::Width(size.width));
        }
        if !(min_h..=max_h).contains(&size.height) {
            return Err(ConfigError::Height(size.height));
        }
        if !(self.handle_tolerance > 0.0 && self.handle_tolerance < 0.5) {
            return Err(ConfigError::HandleTolerance(self.handle_tolerance));
        }
        Ok(())
    }
}
