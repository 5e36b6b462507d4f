//! Reveal configuration
//!
//! Every field has a default, so an empty TOML document is a valid config:
//!
//! ```toml
//! threshold = 0.1
//! root_margin = "0px 0px -50px 0px"
//! fade_duration_ms = 600
//! easing = "easeOutQuart"
//!
//! [classes]
//! fade_up = "fade-in-up"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use reveal_animation::Easing;
use reveal_core::{ObserverOptions, RootMargin};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration loading and validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("threshold must be within 0.0..=1.0, got {0}")]
    InvalidThreshold(f32),

    #[error("{0} must be greater than zero")]
    InvalidDuration(&'static str),
}

/// Marker classes that opt an element into reveal behaviour
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct MarkerClasses {
    pub fade_up: String,
    pub fade_left: String,
    pub counter: String,
}

impl Default for MarkerClasses {
    fn default() -> Self {
        Self {
            fade_up: "fade-in-up".to_string(),
            fade_left: "fade-in-left".to_string(),
            counter: "counter".to_string(),
        }
    }
}

impl MarkerClasses {
    pub fn all(&self) -> [&str; 3] {
        [
            self.fade_up.as_str(),
            self.fade_left.as_str(),
            self.counter.as_str(),
        ]
    }
}

/// Reveal controller configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RevealConfig {
    /// Visible fraction at which an element triggers
    pub threshold: f32,
    /// Viewport adjustment; the default ends the trigger zone 50px above the bottom edge
    pub root_margin: RootMargin,
    pub fade_duration_ms: u32,
    /// Starting vertical offset of `fade-in-up` elements (px)
    pub fade_up_offset: f32,
    /// Starting horizontal offset of `fade-in-left` elements (px)
    pub fade_left_offset: f32,
    /// Counter duration when `data-duration` is missing or unusable
    pub counter_duration_ms: u32,
    pub easing: Easing,
    pub classes: MarkerClasses,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            root_margin: RootMargin::new(0.0, 0.0, -50.0, 0.0),
            fade_duration_ms: 600,
            fade_up_offset: 30.0,
            fade_left_offset: -50.0,
            counter_duration_ms: 2000,
            easing: Easing::EaseOutQuart,
            classes: MarkerClasses::default(),
        }
    }
}

impl RevealConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: RevealConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(ConfigError::InvalidThreshold(self.threshold));
        }
        if self.fade_duration_ms == 0 {
            return Err(ConfigError::InvalidDuration("fade_duration_ms"));
        }
        if self.counter_duration_ms == 0 {
            return Err(ConfigError::InvalidDuration("counter_duration_ms"));
        }
        Ok(())
    }

    /// Options for the visibility watcher
    pub fn observer_options(&self) -> ObserverOptions {
        ObserverOptions {
            threshold: self.threshold,
            root_margin: self.root_margin,
        }
    }
}
