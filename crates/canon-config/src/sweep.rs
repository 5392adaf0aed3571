//! Expiration sweep configuration.

use serde::{Deserialize, Serialize};

/// Default sweep interval in seconds, matching the usual document-store
/// TTL monitor cadence.
const fn default_interval_secs() -> u64 {
    60
}

const fn default_enabled() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SweepConfig {
    /// Whether the background expiration sweep runs at all.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Seconds between sweep passes. Expired documents are removed
    /// eventually, not at their exact expiration instant.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            interval_secs: default_interval_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_sweep_runs_every_minute() {
        let config = SweepConfig::default();
        assert!(config.enabled);
        assert_eq!(config.interval_secs, 60);
    }
}
