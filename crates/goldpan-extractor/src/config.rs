//! Configuration for the extraction coordinator

use serde::{Deserialize, Serialize};

/// Configuration for a two-phase extraction run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Minimum phase-1 confidence a candidate needs to reach phase 2
    pub confidence_threshold: f64,

    /// Sampling temperature for the high-recall phase-1 call
    pub phase1_temperature: f32,

    /// Sampling temperature for the high-precision refinement call
    pub phase2_temperature: f32,

    /// Maximum input content length (characters)
    pub max_content_length: usize,

    /// Words taken from each side of a passage for display boundaries
    pub boundary_words: usize,

    /// Collapse near-duplicate nuggets after the merge
    pub dedupe_similar: bool,
}

impl Default for ExtractionConfig {
    /// Default configuration with balanced settings
    fn default() -> Self {
        Self {
            confidence_threshold: 0.75,
            phase1_temperature: 0.7,
            phase2_temperature: 0.2,
            max_content_length: 500_000,
            boundary_words: 5,
            dedupe_similar: false,
        }
    }
}

impl ExtractionConfig {
    /// Strict preset: fewer, higher-confidence nuggets, deduplicated
    pub fn strict() -> Self {
        Self {
            confidence_threshold: 0.85,
            phase1_temperature: 0.5,
            phase2_temperature: 0.1,
            max_content_length: 500_000,
            boundary_words: 5,
            dedupe_similar: true,
        }
    }

    /// Lenient preset: favors recall over precision
    pub fn lenient() -> Self {
        Self {
            confidence_threshold: 0.60,
            phase1_temperature: 1.0,
            phase2_temperature: 0.3,
            max_content_length: 1_000_000,
            boundary_words: 5,
            dedupe_similar: false,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(format!(
                "confidence_threshold {} out of range [0.0, 1.0]",
                self.confidence_threshold
            ));
        }
        for (name, value) in [
            ("phase1_temperature", self.phase1_temperature),
            ("phase2_temperature", self.phase2_temperature),
        ] {
            if !(0.0..=2.0).contains(&value) {
                return Err(format!("{} {} out of range [0.0, 2.0]", name, value));
            }
        }
        if self.max_content_length == 0 {
            return Err("max_content_length must be greater than 0".to_string());
        }
        if self.boundary_words == 0 {
            return Err("boundary_words must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
