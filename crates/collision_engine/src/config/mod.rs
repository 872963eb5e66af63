//! Configuration system
//!
//! Tuning knobs (octree subdivision thresholds, debug colors) are plain
//! serde types. The [`Config`] trait adds file loading/saving in TOML or
//! RON so applications can ship the same structs they construct in code.

pub use serde::{Deserialize, Serialize};

/// Configuration trait
///
/// Implemented by any serializable settings struct with sensible defaults;
/// see [`crate::spatial::OctreeConfig`].
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from a `.toml` or `.ron` file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to a `.toml` or `.ron` file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, Default::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::OctreeConfig;

    #[test]
    fn test_toml_roundtrip() {
        let path = std::env::temp_dir().join("collision_engine_octree.toml");
        let path = path.to_str().expect("temp path is valid UTF-8");

        let config = OctreeConfig {
            ideal_entity_count: 7,
            max_level: 4,
        };
        config.save_to_file(path).expect("save");

        let loaded = OctreeConfig::load_from_file(path).expect("load");
        assert_eq!(loaded.ideal_entity_count, 7);
        assert_eq!(loaded.max_level, 4);

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_unsupported_format_is_rejected() {
        let result = OctreeConfig::default().save_to_file("octree.yaml");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }
}
