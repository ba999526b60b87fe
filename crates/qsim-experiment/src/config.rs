//! Configuration for experiments and circuit execution.
//!
//! Supports loading configuration from:
//! 1. Configuration files (YAML)
//! 2. Environment variables (with QSIM_ prefix)
//!
//! Configuration precedence (highest to lowest):
//! 1. Environment variables
//! 2. Configuration file
//! 3. Default values

use std::path::Path;

use qsim_core::{ExecutionMode, NORM_TOLERANCE};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Complete runner configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Trial count, seeding and parallelism
    #[serde(default)]
    pub experiment: ExperimentConfig,

    /// Circuit execution settings
    #[serde(default)]
    pub simulation: SimulationConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Experiment settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentConfig {
    /// Number of independent trials
    #[serde(default = "default_trials")]
    pub trials: usize,

    /// Base seed; drawn from entropy and logged when absent
    #[serde(default)]
    pub seed: Option<u64>,

    /// Number of worker threads
    #[serde(default = "default_workers")]
    pub workers: usize,
}

/// Circuit execution settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Gate application strategy: "auto", "dense" or "strided"
    #[serde(default)]
    pub execution_mode: ExecutionMode,

    /// Normalization tolerance for circuits and measurement, in `(0, 1)`
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions
fn default_trials() -> usize {
    1000
}

fn default_workers() -> usize {
    1
}

fn default_tolerance() -> f64 {
    NORM_TOLERANCE
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        ExperimentConfig {
            trials: default_trials(),
            seed: None,
            workers: default_workers(),
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            execution_mode: ExecutionMode::default(),
            tolerance: default_tolerance(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: default_log_level(),
        }
    }
}

impl ExperimentConfig {
    pub fn with_trials(mut self, trials: usize) -> Self {
        self.trials = trials;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }
}

impl RunnerConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Io(format!("{}: {e}", path.as_ref().display())))?;

        let config: RunnerConfig =
            serde_yaml_ng::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Defaults overridden by environment variables.
    pub fn from_env() -> Self {
        RunnerConfig::default().merge_env()
    }

    /// Load configuration with the following precedence:
    /// 1. Load from file if provided
    /// 2. Apply environment variable overrides
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => RunnerConfig::default(),
        };

        let config = config.merge_env();
        config.validate()?;
        Ok(config)
    }

    /// Merge `QSIM_*` environment variables into this configuration.
    pub fn merge_env(mut self) -> Self {
        self.apply_overrides(|key| std::env::var(key).ok());
        self
    }

    /// Apply overrides from `lookup`, keyed by environment variable name.
    ///
    /// Only keys that resolve override the current values. Values that do
    /// not parse are ignored with a warning.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // Experiment
        if let Some(v) = lookup("QSIM_TRIALS") {
            if let Some(val) = parse_or_warn("QSIM_TRIALS", &v) {
                self.experiment.trials = val;
            }
        }
        if let Some(v) = lookup("QSIM_SEED") {
            if let Some(val) = parse_or_warn("QSIM_SEED", &v) {
                self.experiment.seed = Some(val);
            }
        }
        if let Some(v) = lookup("QSIM_WORKERS") {
            if let Some(val) = parse_or_warn("QSIM_WORKERS", &v) {
                self.experiment.workers = val;
            }
        }

        // Simulation
        if let Some(v) = lookup("QSIM_EXECUTION_MODE") {
            if let Some(val) = parse_or_warn("QSIM_EXECUTION_MODE", &v) {
                self.simulation.execution_mode = val;
            }
        }
        if let Some(v) = lookup("QSIM_TOLERANCE") {
            if let Some(val) = parse_or_warn("QSIM_TOLERANCE", &v) {
                self.simulation.tolerance = val;
            }
        }

        // Logging
        if let Some(v) = lookup("QSIM_LOG_LEVEL") {
            self.logging.level = v;
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.experiment.trials == 0 {
            return Err(ConfigError::Invalid(
                "trials must be greater than 0".to_string(),
            ));
        }

        if self.experiment.workers == 0 {
            return Err(ConfigError::Invalid(
                "workers must be greater than 0".to_string(),
            ));
        }

        let tolerance = self.simulation.tolerance;
        if !(tolerance > 0.0 && tolerance < 1.0) {
            return Err(ConfigError::Invalid(format!(
                "tolerance must be positive and below 1, got {tolerance}"
            )));
        }

        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => {
                return Err(ConfigError::Invalid(format!("Invalid log level: {other}")));
            }
        }

        Ok(())
    }
}

fn parse_or_warn<T: std::str::FromStr>(key: &str, value: &str) -> Option<T> {
    match value.trim().parse() {
        Ok(val) => Some(val),
        Err(_) => {
            warn!(key, value, "ignoring unparsable environment override");
            None
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Validation error: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn overrides(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = RunnerConfig::default();
        assert_eq!(config.experiment.trials, 1000);
        assert_eq!(config.experiment.seed, None);
        assert_eq!(config.experiment.workers, 1);
        assert_eq!(config.simulation.execution_mode, ExecutionMode::Auto);
        assert_eq!(config.simulation.tolerance, NORM_TOLERANCE);
        assert_eq!(config.logging.level, "warn");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_trials() {
        let mut config = RunnerConfig::default();
        config.experiment.trials = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validate_rejects_bad_tolerance() {
        let mut config = RunnerConfig::default();
        config.simulation.tolerance = 0.0;
        assert!(config.validate().is_err());
        config.simulation.tolerance = f64::NAN;
        assert!(config.validate().is_err());
        for tolerance in [1.0, 2.0, f64::INFINITY] {
            config.simulation.tolerance = tolerance;
            let err = config.validate().unwrap_err();
            assert!(err.to_string().contains("below 1"), "{err}");
        }
        config.simulation.tolerance = 0.5;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let mut config = RunnerConfig::default();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overrides_apply() {
        let mut config = RunnerConfig::default();
        config.apply_overrides(overrides(&[
            ("QSIM_TRIALS", "250"),
            ("QSIM_SEED", "42"),
            ("QSIM_WORKERS", "4"),
            ("QSIM_EXECUTION_MODE", "strided"),
            ("QSIM_TOLERANCE", "1e-6"),
            ("QSIM_LOG_LEVEL", "debug"),
        ]));
        assert_eq!(config.experiment.trials, 250);
        assert_eq!(config.experiment.seed, Some(42));
        assert_eq!(config.experiment.workers, 4);
        assert_eq!(config.simulation.execution_mode, ExecutionMode::Strided);
        assert_eq!(config.simulation.tolerance, 1e-6);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_unparsable_override_is_ignored() {
        let mut config = RunnerConfig::default();
        config.apply_overrides(overrides(&[("QSIM_TRIALS", "many"), ("QSIM_SEED", "-1")]));
        assert_eq!(config.experiment.trials, 1000);
        assert_eq!(config.experiment.seed, None);
    }

    #[test]
    fn test_from_file_partial_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "experiment:\n  trials: 500\n  seed: 7\nsimulation:\n  execution_mode: dense\n"
        )
        .unwrap();

        let config = RunnerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.experiment.trials, 500);
        assert_eq!(config.experiment.seed, Some(7));
        assert_eq!(config.experiment.workers, 1);
        assert_eq!(config.simulation.execution_mode, ExecutionMode::Dense);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_from_file_errors() {
        let err = RunnerConfig::from_file("/nonexistent/qsim.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "experiment: [not, a, map]").unwrap();
        let err = RunnerConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "experiment:\n  trials: 0").unwrap();
        let err = RunnerConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }
}
