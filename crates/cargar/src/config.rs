//! Run configuration.
//!
//! Everything a load run is parameterized by: target address, session
//! count, duration, think-time bounds, fixture directory, asset-discovery
//! toggle, and per-action weights. Loadable from a YAML scenario file;
//! the CLI overlays its flags on top.

use crate::action::ActionWeights;
use crate::result::{CargarError, CargarResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

fn default_host() -> String {
    "http://localhost:8000".to_string()
}

fn default_users() -> u32 {
    10
}

fn default_duration_secs() -> u64 {
    60
}

fn default_wait_min_secs() -> f64 {
    1.0
}

fn default_wait_max_secs() -> f64 {
    5.0
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_timeout_secs() -> u64 {
    30
}

/// Configuration for one load run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Base address of the target deployment
    #[serde(default = "default_host")]
    pub host: String,
    /// Number of concurrent simulated sessions
    #[serde(default = "default_users")]
    pub users: u32,
    /// Run duration in seconds
    #[serde(default = "default_duration_secs")]
    pub duration_secs: u64,
    /// Lower think-time bound in seconds
    #[serde(default = "default_wait_min_secs")]
    pub wait_min_secs: f64,
    /// Upper think-time bound in seconds
    #[serde(default = "default_wait_max_secs")]
    pub wait_max_secs: f64,
    /// Directory holding the three fixture CSV files
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Whether page loads also fetch embedded static/media assets
    #[serde(default)]
    pub fetch_static_assets: bool,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Per-action selection weights
    #[serde(default)]
    pub weights: ActionWeights,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            users: default_users(),
            duration_secs: default_duration_secs(),
            wait_min_secs: default_wait_min_secs(),
            wait_max_secs: default_wait_max_secs(),
            data_dir: default_data_dir(),
            fetch_static_assets: false,
            timeout_secs: default_timeout_secs(),
            weights: ActionWeights::default(),
        }
    }
}

impl RunConfig {
    /// Default configuration against the given host.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Self::default()
        }
    }

    /// Set the session count.
    #[must_use]
    pub fn with_users(mut self, users: u32) -> Self {
        self.users = users;
        self
    }

    /// Set the run duration.
    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration_secs = duration.as_secs();
        self
    }

    /// Set the think-time bounds in seconds.
    #[must_use]
    pub fn with_wait_time(mut self, min_secs: f64, max_secs: f64) -> Self {
        self.wait_min_secs = min_secs;
        self.wait_max_secs = max_secs;
        self
    }

    /// Set the fixture directory.
    #[must_use]
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Enable or disable static asset discovery.
    #[must_use]
    pub fn with_fetch_static_assets(mut self, enabled: bool) -> Self {
        self.fetch_static_assets = enabled;
        self
    }

    /// Set the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = timeout.as_secs();
        self
    }

    /// Set the action weights.
    #[must_use]
    pub fn with_weights(mut self, weights: ActionWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Run duration as a `Duration`.
    #[must_use]
    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.duration_secs)
    }

    /// Request timeout as a `Duration`.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Parse a configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> CargarResult<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| CargarError::config(format!("failed to parse scenario: {e}")))
    }

    /// Load a configuration from a YAML scenario file.
    pub fn load(path: &Path) -> CargarResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Check the configuration describes a runnable load test.
    pub fn validate(&self) -> CargarResult<()> {
        if self.host.is_empty() {
            return Err(CargarError::config("host must not be empty"));
        }
        if self.users == 0 {
            return Err(CargarError::config("users must be at least 1"));
        }
        if self.duration_secs == 0 {
            return Err(CargarError::config("duration must be at least 1 second"));
        }
        if !(self.wait_min_secs.is_finite() && self.wait_max_secs.is_finite()) {
            return Err(CargarError::config("think-time bounds must be finite"));
        }
        if self.wait_min_secs < 0.0 || self.wait_max_secs < self.wait_min_secs {
            return Err(CargarError::config(format!(
                "think-time bounds must satisfy 0 <= min <= max, got {}..{}",
                self.wait_min_secs, self.wait_max_secs
            )));
        }
        if self.timeout_secs == 0 {
            return Err(CargarError::config("timeout must be at least 1 second"));
        }
        self.weights.validate()
    }
}
