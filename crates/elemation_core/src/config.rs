//! Elemation configuration
//!
//! Mirrors the construction parameters of an elemation and can be embedded in
//! TOML files as an `[elemation]` table:
//!
//! ```toml
//! trigger = "#features"
//! targets = ".card"
//! interval_ms = 300
//! append_class = "scrolled-to"
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ElemationError, Result};

/// Target selector used when none is configured
pub const DEFAULT_SELECTORS: &str = "div";

/// Class appended to each target when none is configured
pub const DEFAULT_APPEND_CLASS: &str = "scrolled-to";

/// Delay between successive targets when none is configured
pub const DEFAULT_INTERVAL_MS: u64 = 500;

/// Construction parameters for an elemation
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ElemationConfig {
    /// Selector of the element whose span arms the trigger
    #[serde(default)]
    pub trigger: Option<String>,
    /// Selector of the elements that receive the class
    #[serde(default)]
    pub targets: Option<String>,
    /// Milliseconds between successive targets
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// Class appended to each target, separated by a space
    #[serde(default = "default_append_class")]
    pub append_class: String,
    /// Minimum viewport width (stored, not consulted)
    #[serde(default)]
    pub min_width: Option<f32>,
    /// Minimum viewport height (stored, not consulted)
    #[serde(default)]
    pub min_height: Option<f32>,
}

fn default_interval_ms() -> u64 {
    DEFAULT_INTERVAL_MS
}

fn default_append_class() -> String {
    DEFAULT_APPEND_CLASS.to_string()
}

impl Default for ElemationConfig {
    fn default() -> Self {
        Self {
            trigger: None,
            targets: None,
            interval_ms: DEFAULT_INTERVAL_MS,
            append_class: default_append_class(),
            min_width: None,
            min_height: None,
        }
    }
}

impl ElemationConfig {
    /// Parse from a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: ElemationConfig =
            toml::from_str(source).map_err(|e| ElemationError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to a TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ElemationError::Config(e.to_string()))
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// Trigger selector, with a blank selector treated as absent
    pub fn trigger_selector(&self) -> Option<&str> {
        non_blank(&self.trigger)
    }

    /// Target selector, with a blank selector treated as absent
    pub fn target_selector(&self) -> Option<&str> {
        non_blank(&self.targets)
    }

    /// Returns true when both selectors are present, which activates the
    /// elemation at construction
    pub fn activates_immediately(&self) -> bool {
        self.trigger_selector().is_some() && self.target_selector().is_some()
    }

    /// Check the values a host cannot reject on its own
    pub fn validate(&self) -> Result<()> {
        validate_class(&self.append_class)?;

        for (name, value) in [("min_width", self.min_width), ("min_height", self.min_height)] {
            if value.is_some_and(|v| !v.is_finite() || v < 0.0) {
                return Err(ElemationError::Config(format!(
                    "`{name}` must be a non-negative number"
                )));
            }
        }

        Ok(())
    }
}

fn non_blank(selector: &Option<String>) -> Option<&str> {
    selector.as_deref().filter(|s| !s.trim().is_empty())
}

/// The appended class may hold several classes but must not be blank
pub fn validate_class(class: &str) -> Result<()> {
    if class.trim().is_empty() {
        return Err(ElemationError::Config(format!(
            "append class {class:?} must not be empty"
        )));
    }
    Ok(())
}
