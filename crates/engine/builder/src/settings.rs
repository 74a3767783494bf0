//! Build settings
//!
//! Plain numeric limits the core receives from outside, persisted as TOML
//! in the user config directory. Missing or unreadable files fall back to
//! defaults so a bad edit never breaks the pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use structure::Limits;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSettings {
    /// API key for the generation endpoint (empty disables generation)
    pub api_key: String,
    /// Model identifier sent to the generation endpoint
    pub model: String,
    /// Upper bound on total cells the generator is asked to produce
    pub max_blocks: u32,
    /// Per-tick write budget of the batch executor
    pub blocks_per_tick: usize,
    /// Generation request timeout
    pub timeout_seconds: u64,
    /// Maximum cell count of a single region
    pub max_region_volume: u64,
    /// Maximum absolute relative coordinate
    pub max_coordinate: i32,
    /// Generation requests allowed per refill interval
    pub rate_limit_tokens: u32,
    pub rate_limit_refill_seconds: u64,
    /// Extra attempts for retryable generation failures
    pub max_retries: u32,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "anthropic/claude-sonnet-4-5".into(),
            max_blocks: 1_000_000,
            blocks_per_tick: 500,
            timeout_seconds: 60,
            max_region_volume: 100_000,
            max_coordinate: 200,
            rate_limit_tokens: 3,
            rate_limit_refill_seconds: 60,
            max_retries: 2,
        }
    }
}

impl BuildSettings {
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("voxelforge").join("settings.toml"))
    }

    /// Load settings from the config file, or defaults if absent/invalid
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    /// Save settings to the config file
    pub fn save(&self) -> Result<(), String> {
        let path = Self::config_path().ok_or("Could not determine config directory")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize settings: {}", e))?;
        std::fs::write(&path, content).map_err(|e| format!("Failed to write settings: {}", e))?;
        Ok(())
    }

    /// Bounds projection consumed by the structure compiler and validator
    pub fn limits(&self) -> Limits {
        Limits {
            max_coordinate: self.max_coordinate,
            max_region_volume: self.max_region_volume,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = BuildSettings::default();
        assert_eq!(settings.blocks_per_tick, 500);
        assert_eq!(settings.max_coordinate, 200);
        assert_eq!(settings.max_region_volume, 100_000);
        assert_eq!(settings.rate_limit_tokens, 3);
        assert_eq!(settings.max_retries, 2);
        assert!(settings.api_key.is_empty());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let settings: BuildSettings = toml::from_str("blocks_per_tick = 64").unwrap();
        assert_eq!(settings.blocks_per_tick, 64);
        assert_eq!(settings.max_coordinate, 200);
    }

    #[test]
    fn test_limits_projection() {
        let mut settings = BuildSettings::default();
        settings.max_coordinate = 50;
        settings.max_region_volume = 1_000;
        let limits = settings.limits();
        assert_eq!(limits.max_coordinate, 50);
        assert_eq!(limits.max_region_volume, 1_000);
    }
}
