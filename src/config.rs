use eyre::{Result, WrapErr};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub login: LoginConfig,
    pub import: ImportConfig,
    pub assignments: AssignmentsConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoginConfig {
    /// Failed attempts after which an identifier is locked out.
    pub max_attempts: u32,
}

impl Default for LoginConfig {
    fn default() -> Self {
        Self { max_attempts: 3 }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImportConfig {
    /// Simulated latency of every imported file, in milliseconds.
    pub delay_ms: u64,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self { delay_ms: 50 }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssignmentsConfig {
    /// Simulated latency of an assignment submission, in milliseconds.
    pub latency_ms: u64,
}

impl Default for AssignmentsConfig {
    fn default() -> Self {
        Self { latency_ms: 150 }
    }
}

impl Config {
    pub fn load(file_name: &Path) -> Result<Config> {
        let contents = std::fs::read_to_string(file_name)
            .wrap_err_with(|| format!("cannot load configuration file {}", file_name.display()))?;
        Self::parse(&contents).wrap_err("cannot parse configuration file")
    }

    pub fn parse(contents: &str) -> Result<Config> {
        Ok(toml::from_str(contents)?)
    }

    pub fn import_delay(&self) -> Duration {
        Duration::from_millis(self.import.delay_ms)
    }

    pub fn submission_latency(&self) -> Duration {
        Duration::from_millis(self.assignments.latency_ms)
    }
}
