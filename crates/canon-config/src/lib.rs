//! # canon-config
//!
//! Layered configuration loading for Canon using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`CANON_*` prefix, `__` as separator)
//! 2. Project-level `.canon/config.toml`
//! 3. User-level `~/.config/canon/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `CANON_DATABASE__PATH` -> `database.path`,
//! `CANON_SWEEP__INTERVAL_SECS` -> `sweep.interval_secs`, etc. The `__`
//! (double underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use canon_config::CanonConfig;
//!
//! // Load from all sources (dotenvy + TOML + env):
//! let config = CanonConfig::load_with_dotenv().expect("config");
//!
//! // Or without dotenvy (env vars must already be set):
//! let config = CanonConfig::load().expect("config");
//!
//! println!("Store path: {}", config.database.path);
//! ```

mod database;
mod error;
mod sweep;

pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use sweep::SweepConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CanonConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub sweep: SweepConfig,
}

impl CanonConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    ///
    /// Precedence (highest to lowest):
    /// 1. Environment variables (`CANON_*` prefix)
    /// 2. `.canon/config.toml` (project-local)
    /// 3. `~/.config/canon/config.toml` (user-global)
    /// 4. Default values
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` if extraction fails, or
    /// `ConfigError::InvalidValue` for out-of-range values.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract().map_err(ConfigError::from)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    ///
    /// Calls `dotenvy` to load the `.env` file from the workspace root before
    /// building the figment. This is the typical entry point for the owning
    /// application and for tests.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` if extraction fails.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".canon/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment = figment.merge(Env::prefixed("CANON_").split("__"));

        figment
    }

    /// Check cross-field constraints figment cannot express.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the sweep is enabled with a
    /// zero interval.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sweep.enabled && self.sweep.interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "sweep.interval_secs".to_string(),
                reason: "must be at least 1 second when the sweep is enabled".to_string(),
            });
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("canon").join("config.toml"))
    }

    /// Load `.env` from the workspace root.
    ///
    /// Walks up from `CARGO_MANIFEST_DIR` (if available) or current dir
    /// looking for a `.env` file. Silently does nothing if no `.env` is found.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            // Walk up at most 3 levels (crate -> crates/ -> workspace root)
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        // Fallback: try current directory
        let _ = dotenvy::dotenv();
    }
}
