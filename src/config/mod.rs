// Host configuration - RON file on disk
// The score itself is compiled in and never persisted

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("Config serialization error: {0}")]
    Serialize(#[from] ron::Error),
}

/// Session configuration: which instrument to load and how to loop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostConfig {
    /// Path to the instrument cdylib
    pub plugin_path: PathBuf,

    /// Fixed tempo; no tempo changes mid-session
    pub bpm: f64,

    /// Repeat period of the score, in beats
    pub loop_length_beats: f64,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            plugin_path: PathBuf::from("instrument.so"),
            bpm: 120.0,
            loop_length_beats: 5.0,
        }
    }
}

impl HostConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config = ron::from_str(&contents)?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?;
        fs::write(path, contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HostConfig::default();

        assert_eq!(config.bpm, 120.0);
        assert_eq!(config.loop_length_beats, 5.0);
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("loophost.ron");

        let config = HostConfig {
            plugin_path: PathBuf::from("/opt/instruments/pad.so"),
            bpm: 90.0,
            loop_length_beats: 8.0,
        };
        config.save(&path).unwrap();

        let loaded = HostConfig::load(&path).unwrap();
        assert_eq!(loaded.plugin_path, config.plugin_path);
        assert_eq!(loaded.bpm, 90.0);
        assert_eq!(loaded.loop_length_beats, 8.0);
    }

    #[test]
    fn test_load_missing_file() {
        let result = HostConfig::load(Path::new("/nonexistent/loophost.ron"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.ron");
        fs::write(&path, "(plugin_path: 42)").unwrap();

        let result = HostConfig::load(&path);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
