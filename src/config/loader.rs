//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources using Figment:
//! 1. Built-in defaults (Serialized)
//! 2. Global config (~/.config/scaleflow/config.toml)
//! 3. Project config (.scaleflow/config.toml)
//! 4. Environment variables (SCALEFLOW_* prefix)

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::env;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::types::FlowConfig;
use crate::types::{FlowError, Result};

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with full resolution chain using Figment:
    /// defaults → global → project → env vars
    pub fn load() -> Result<FlowConfig> {
        let mut figment = Figment::new().merge(Serialized::defaults(FlowConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            debug!("Loading global config from: {}", global_path.display());
            figment = figment.merge(Toml::file(&global_path));
        }

        let project_path = Self::project_config_path();
        if project_path.exists() {
            debug!("Loading project config from: {}", project_path.display());
            figment = figment.merge(Toml::file(&project_path));
        }

        // e.g. SCALEFLOW_RULES__LOW_QUALITY_THRESHOLD -> rules.low_quality_threshold
        figment = figment.merge(Env::prefixed("SCALEFLOW_").split("__").lowercase(true));

        let config: FlowConfig = figment
            .extract()
            .map_err(|e| FlowError::Config(format!("configuration error: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file only
    pub fn load_from_file(path: &Path) -> Result<FlowConfig> {
        let config: FlowConfig = Figment::new()
            .merge(Serialized::defaults(FlowConfig::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(|e| FlowError::Config(format!("configuration error: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    // =========================================================================
    // Path Management
    // =========================================================================

    /// Get path to global config directory (~/.config/scaleflow/)
    pub fn global_dir() -> Option<PathBuf> {
        env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                env::var("HOME")
                    .ok()
                    .map(|home| PathBuf::from(home).join(".config"))
            })
            .map(|p| p.join("scaleflow"))
    }

    /// Get path to global config file
    pub fn global_config_path() -> Option<PathBuf> {
        Self::global_dir().map(|dir| dir.join("config.toml"))
    }

    /// Get path to project config file
    pub fn project_config_path() -> PathBuf {
        PathBuf::from(".scaleflow/config.toml")
    }
}

// =============================================================================
// Tests
// =============================================================================
