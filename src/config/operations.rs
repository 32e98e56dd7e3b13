//! Config loading, layering, validation, and key lookup.

use super::model::{Config, Overrides};
use super::types::CONFIG_FILE_NAME;
use crate::error::{Result, ScaffoldError};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

impl Config {
    /// Load config from a YAML file.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    ///
    /// # Returns
    ///
    /// * `Ok(Config)` - Successfully loaded and validated config
    /// * `Err(ScaffoldError::UserError)` - Read error, parse error or validation failure
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            ScaffoldError::UserError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Find and load the config for a run.
    ///
    /// An explicit path must exist. Otherwise `scaffold.yaml` in `dir` is used
    /// when present, and defaults when not.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            debug!(path = %path.display(), "loading config");
            return Self::load(path);
        }

        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            debug!(path = %candidate.display(), "loading config");
            return Self::load(candidate);
        }

        debug!("no config file, using defaults");
        Ok(Self::default())
    }

    /// Parse config from a YAML string.
    ///
    /// An empty document yields the defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = if yaml.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(yaml).map_err(|e| {
                ScaffoldError::UserError(format!("failed to parse config YAML: {}", e))
            })?
        };

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| {
            ScaffoldError::UserError(format!("failed to serialize config to YAML: {}", e))
        })
    }

    /// Layer command-line values over this config and re-validate.
    pub fn with_overrides(mut self, overrides: Overrides) -> Result<Self> {
        if let Some(v) = overrides.output_dir {
            self.output_dir = v;
        }
        if let Some(v) = overrides.base_package {
            self.base_package = v;
        }
        if let Some(v) = overrides.worker_count {
            self.worker_count = v;
        }
        if let Some(v) = overrides.template {
            self.template = v;
        }
        if let Some(v) = overrides.language {
            self.language = v;
        }
        if let Some(v) = overrides.templates_dir {
            self.templates_dir = v;
        }
        if let Some(v) = overrides.model {
            self.model = v;
        }
        if let Some(v) = overrides.api_url {
            self.api_url = v;
        }
        if let Some(v) = overrides.timeout_seconds {
            self.timeout_seconds = v;
        }
        if overrides.event_log.is_some() {
            self.event_log = overrides.event_log;
        }

        self.validate()?;
        Ok(self)
    }

    /// Validate config values and return error on invalid values.
    ///
    /// Validation rules:
    /// - `worker_count`, `queue_capacity` and `timeout_seconds` must be positive
    /// - `api_url` and `template` must be non-empty
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("worker_count", self.worker_count as u64),
            ("queue_capacity", self.queue_capacity as u64),
            ("timeout_seconds", self.timeout_seconds),
        ];
        for (field, value) in positive {
            if value == 0 {
                return Err(ScaffoldError::UserError(format!(
                    "config validation failed: {} must be greater than 0",
                    field
                )));
            }
        }

        if self.api_url.trim().is_empty() {
            return Err(ScaffoldError::UserError(
                "config validation failed: api_url must not be empty".to_string(),
            ));
        }

        if self.template.trim().is_empty() {
            return Err(ScaffoldError::UserError(
                "config validation failed: template must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Pick the API key: the explicit value first, then the variable named by
    /// `api_key_env` as returned by `lookup`.
    pub fn resolve_api_key<F>(&self, explicit: Option<&str>, lookup: F) -> Result<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = explicit.map(str::trim).filter(|k| !k.is_empty()) {
            return Ok(key.to_string());
        }

        lookup(&self.api_key_env)
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                ScaffoldError::UserError(format!(
                    "no API key: pass --api-key or set the {} environment variable",
                    self.api_key_env
                ))
            })
    }
}
