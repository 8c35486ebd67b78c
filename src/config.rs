//! Engine configuration.
//!
//! Loaded from TOML; every field is optional and falls back to the defaults
//! below. A parsed [`EngineConfig`] is not trusted until [`EngineConfig::validate`]
//! turns it into a [`ValidConfig`].
//!
//! ```toml
//! grid_size = 8
//! seed = 12345
//!
//! [theme]
//! name = "classic"
//! kinds = 5
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::core::{GameSession, SimpleRng};
use crate::types::{
    Theme, ThemeError, DEFAULT_GRID_SIZE, DEFAULT_THEME_KINDS, MAX_GRID_SIZE, MIN_GRID_SIZE,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("grid size {size} is outside {min}..={max}", min = MIN_GRID_SIZE, max = MAX_GRID_SIZE)]
    GridSize { size: u8 },

    #[error(transparent)]
    Theme(#[from] ThemeError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub name: String,
    /// Number of tile kinds, lettered `A` onwards
    pub kinds: u8,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            name: "classic".to_string(),
            kinds: DEFAULT_THEME_KINDS as u8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub grid_size: u8,
    pub theme: ThemeConfig,
    /// Fixed seed for reproducible games; `None` lets the caller pick one
    pub seed: Option<u32>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            theme: ThemeConfig::default(),
            seed: None,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading config");
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        info!(
            grid_size = config.grid_size,
            theme = %config.theme.name,
            kinds = config.theme.kinds,
            "config loaded"
        );
        Ok(config)
    }

    /// Check ranges and build the theme
    pub fn validate(&self) -> Result<ValidConfig, ConfigError> {
        if !(MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&self.grid_size) {
            return Err(ConfigError::GridSize {
                size: self.grid_size,
            });
        }
        let theme = Theme::with_kind_count(self.theme.name.clone(), self.theme.kinds as usize)?;
        Ok(ValidConfig {
            grid_size: self.grid_size,
            theme,
            seed: self.seed,
        })
    }
}

/// Configuration that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidConfig {
    pub grid_size: u8,
    pub theme: Theme,
    pub seed: Option<u32>,
}

impl ValidConfig {
    /// Start a session seeded with the configured seed, or `fallback_seed`
    pub fn session(&self, fallback_seed: u32) -> GameSession<SimpleRng> {
        let seed = self.seed.unwrap_or(fallback_seed);
        GameSession::new(self.grid_size, self.theme.clone(), SimpleRng::new(seed))
    }
}
