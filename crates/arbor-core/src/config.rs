//! Aggregate configuration.

use crate::error::Result;
use crate::feedback::FeedbackConfig;
use crate::search::{BeamConfig, ExplorerConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for every engine, loadable from one JSON document.
///
/// Missing sections and fields fall back to their defaults:
///
/// ```
/// use arbor_core::config::ArborConfig;
///
/// let config = ArborConfig::from_json(r#"{ "beam": { "max_steps": 4 } }"#).unwrap();
/// assert_eq!(config.beam.max_steps, 4);
/// assert_eq!(config.beam.initial_width, 5);
/// assert_eq!(config.explorer.max_depth, 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArborConfig {
    /// Adaptive beam search.
    pub beam: BeamConfig,
    /// Thought exploration.
    pub explorer: ExplorerConfig,
    /// Expert feedback.
    pub feedback: FeedbackConfig,
}

impl ArborConfig {
    /// Check every section.
    pub fn validate(&self) -> Result<()> {
        self.beam.validate()?;
        self.explorer.validate()?;
        self.feedback.validate()
    }

    /// Parse and validate a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Serialize as pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
