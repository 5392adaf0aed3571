//! Document store configuration.

use serde::{Deserialize, Serialize};

fn default_path() -> String {
    ".canon/canon.db".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Path to the libSQL database file, or `:memory:` for an ephemeral store.
    #[serde(default = "default_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
        }
    }
}

impl DatabaseConfig {
    /// Whether the store is ephemeral (in-memory).
    #[must_use]
    pub fn is_memory(&self) -> bool {
        self.path == ":memory:"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_path_is_project_local() {
        let config = DatabaseConfig::default();
        assert_eq!(config.path, ".canon/canon.db");
        assert!(!config.is_memory());
    }

    #[test]
    fn memory_detection() {
        let config = DatabaseConfig {
            path: ":memory:".into(),
        };
        assert!(config.is_memory());
    }
}
