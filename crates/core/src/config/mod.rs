use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Result;

/// Standard gravitational acceleration used when a scene omits `world`.
pub const DEFAULT_GRAVITY: f64 = 9.8;

/// Top-level configuration structure for the application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub compiler: CompilerConfig,
}

impl AppConfig {
    /// Parses a configuration document. Absent keys fall back to defaults.
    pub fn from_json_str(source: &str) -> Result<Self> {
        Ok(serde_json::from_str(source)?)
    }

    /// Reads and parses a configuration file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_json_str(&source)
    }
}

/// Constants the scene compiler substitutes when the input leaves them out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Magnitude of the default gravity vector, applied along -y.
    pub gravity: f64,
    /// Density given to dynamic bodies that carry neither mass nor density.
    pub default_density: f64,
    /// Transmission ratio for pulley joints that do not specify one.
    pub default_pulley_ratio: f64,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            gravity: DEFAULT_GRAVITY,
            default_density: 1.0,
            default_pulley_ratio: 1.0,
        }
    }
}
