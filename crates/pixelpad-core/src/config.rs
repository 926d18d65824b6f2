//! Processing configuration.
//!
//! Every field has a default, so callers may pass a partial object (for
//! example from JavaScript) and get the stock behaviour for the rest.

use serde::{Deserialize, Serialize};

use crate::error::ProcessError;
use crate::padding::PADDING_MARKER;

/// Binary-search bounds for the size-target search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Lowest quality probed (0.0 to 1.0).
    pub min_quality: f32,
    /// Highest quality probed (0.0 to 1.0).
    pub max_quality: f32,
    /// Number of encode attempts.
    pub iterations: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_quality: 0.05,
            max_quality: 0.98,
            iterations: 10,
        }
    }
}

impl SearchConfig {
    pub fn validate(&self) -> Result<(), ProcessError> {
        let in_range = |q: f32| (0.0..=1.0).contains(&q);
        if !in_range(self.min_quality) || !in_range(self.max_quality) {
            return Err(ProcessError::InvalidConfig(
                "quality bounds must lie within 0.0..=1.0".to_string(),
            ));
        }
        if self.min_quality >= self.max_quality {
            return Err(ProcessError::InvalidConfig(format!(
                "min_quality ({}) must be below max_quality ({})",
                self.min_quality, self.max_quality
            )));
        }
        if self.iterations == 0 {
            return Err(ProcessError::InvalidConfig(
                "iterations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Settings for a [`Session`](crate::session::Session).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessConfig {
    pub search: SearchConfig,
    /// Quality for direct re-encodes, enlarge bases and PDF conversion.
    pub high_quality: f32,
    /// Text written right after the original bytes when padding.
    pub padding_marker: String,
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            search: SearchConfig::default(),
            high_quality: 0.98,
            padding_marker: String::from_utf8_lossy(PADDING_MARKER).into_owned(),
        }
    }
}

impl ProcessConfig {
    pub fn validate(&self) -> Result<(), ProcessError> {
        self.search.validate()?;
        if !(0.0..=1.0).contains(&self.high_quality) {
            return Err(ProcessError::InvalidConfig(format!(
                "high_quality ({}) must lie within 0.0..=1.0",
                self.high_quality
            )));
        }
        Ok(())
    }
}
