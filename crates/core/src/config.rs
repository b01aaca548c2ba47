//! Engine defaults for calling layers, with file and environment overrides.
//!
//! Precedence: env > file > built-in default. The engine functions always
//! take explicit arguments; this config only supplies the defaults a calling
//! layer falls back to when a request leaves them out.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::recommend::{OptimizeMode, Weights, DEFAULT_MAX_RESULTS, DEFAULT_WEIGHTS};

pub const DEFAULT_CONFIG_FILE: &str = "greencart.toml";
pub const CONFIG_PATH_ENV: &str = "GREENCART_CONFIG";

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EngineConfig {
    /// Weights applied when a request supplies none.
    pub weights: Weights,
    /// Maximum substitutes returned per recommendation.
    pub max_results: usize,
    /// Optimizer mode applied when a request supplies none.
    pub mode: OptimizeMode,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            weights: DEFAULT_WEIGHTS,
            max_results: DEFAULT_MAX_RESULTS,
            mode: OptimizeMode::Balanceado,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    /// Explicit config file path; falls back to `GREENCART_CONFIG`, then to
    /// `greencart.toml` in the working directory if it exists.
    pub config_path: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("failed to parse config file {path}: {source}")]
    Parse { path: PathBuf, source: toml::de::Error },
    #[error("invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    weights: Option<FileWeights>,
    recommend: Option<FileRecommend>,
    optimize: Option<FileOptimize>,
}

#[derive(Debug, Default, Deserialize)]
struct FileWeights {
    price: Option<f64>,
    co2: Option<f64>,
    health: Option<f64>,
    social: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct FileRecommend {
    max_results: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct FileOptimize {
    mode: Option<String>,
}

impl EngineConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = resolve_config_path(options.config_path) {
            let file = read_file_config(&path)?;
            config.apply_file(file)?;
        }
        config.apply_env()?;
        config.validate()?;

        Ok(config)
    }

    fn apply_file(&mut self, file: FileConfig) -> Result<(), ConfigError> {
        if let Some(weights) = file.weights {
            self.weights = Weights {
                price: weights.price.unwrap_or(self.weights.price),
                co2: weights.co2.unwrap_or(self.weights.co2),
                health: weights.health.unwrap_or(self.weights.health),
                social: weights.social.unwrap_or(self.weights.social),
            };
        }
        if let Some(recommend) = file.recommend {
            if let Some(max_results) = recommend.max_results {
                self.max_results = max_results;
            }
        }
        if let Some(optimize) = file.optimize {
            if let Some(mode) = optimize.mode {
                self.mode = OptimizeMode::parse(&mode).ok_or(ConfigError::Invalid {
                    field: "optimize.mode",
                    reason: format!("unknown mode `{mode}`"),
                })?;
            }
        }
        Ok(())
    }

    fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = env_f64("GREENCART_W_PRICE")? {
            self.weights.price = value;
        }
        if let Some(value) = env_f64("GREENCART_W_CO2")? {
            self.weights.co2 = value;
        }
        if let Some(value) = env_f64("GREENCART_W_HEALTH")? {
            self.weights.health = value;
        }
        if let Some(value) = env_f64("GREENCART_W_SOCIAL")? {
            self.weights.social = value;
        }
        if let Ok(raw) = env::var("GREENCART_MAX_RESULTS") {
            self.max_results = raw.trim().parse().map_err(|_| ConfigError::Invalid {
                field: "GREENCART_MAX_RESULTS",
                reason: format!("`{raw}` is not a valid count"),
            })?;
        }
        if let Ok(raw) = env::var("GREENCART_MODE") {
            self.mode = OptimizeMode::parse(&raw).ok_or(ConfigError::Invalid {
                field: "GREENCART_MODE",
                reason: format!("unknown mode `{raw}`"),
            })?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("weights.price", self.weights.price),
            ("weights.co2", self.weights.co2),
            ("weights.health", self.weights.health),
            ("weights.social", self.weights.social),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid {
                    field: "weights",
                    reason: format!("{field} must be a non-negative number, got {value}"),
                });
            }
        }

        if self.max_results == 0 {
            return Err(ConfigError::Invalid {
                field: "recommend.max_results",
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(())
    }
}

fn resolve_config_path(explicit: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path);
    }
    if let Ok(path) = env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(path);
        if !path.as_os_str().is_empty() {
            return Some(path);
        }
    }

    let default = Path::new(DEFAULT_CONFIG_FILE);
    default.exists().then(|| default.to_path_buf())
}

fn read_file_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
    toml::from_str(&raw).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
}

fn env_f64(name: &'static str) -> Result<Option<f64>, ConfigError> {
    match env::var(name) {
        Ok(raw) => {
            let value = raw.trim().parse().map_err(|_| ConfigError::Invalid {
                field: name,
                reason: format!("`{raw}` is not a valid number"),
            })?;
            Ok(Some(value))
        }
        Err(_) => Ok(None),
    }
}
