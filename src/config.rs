//! Engine configuration.
//!
//! All fields have defaults, so an empty JSON object is a valid config.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ============================================================================
// EngineConfig
// ============================================================================

/// Tuning knobs shared by every search an engine runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Vertex count above which distance and predecessor buffers are
    /// initialized in parallel (with the `parallel` feature).
    pub parallel_init_threshold: usize,

    /// Initial capacity of the per-vertex pending-edge buffer.
    pub generator_edge_buffer: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            parallel_init_threshold: 100,
            generator_edge_buffer: 8,
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.generator_edge_buffer == 0 {
            return Err(Error::Config("generator_edge_buffer must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_is_default() {
        assert_eq!(EngineConfig::from_json("{}").unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = EngineConfig::from_json(r#"{"parallel_init_threshold": 5000}"#).unwrap();
        assert_eq!(config.parallel_init_threshold, 5000);
        assert_eq!(config.generator_edge_buffer, 8);
    }

    #[test]
    fn test_zero_buffer_rejected() {
        let err = EngineConfig::from_json(r#"{"generator_edge_buffer": 0}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(EngineConfig::from_json("{"), Err(Error::Json(_))));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(EngineConfig::load("/nonexistent/engine.json"), Err(Error::Io(_))));
    }

    #[test]
    fn test_json_roundtrip() {
        let config = EngineConfig { parallel_init_threshold: 7, generator_edge_buffer: 2 };
        assert_eq!(EngineConfig::from_json(&config.to_json().unwrap()).unwrap(), config);
    }
}
