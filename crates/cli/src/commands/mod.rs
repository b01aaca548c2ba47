pub mod config;
pub mod optimize;
pub mod recommend;
pub mod score;
pub mod suggest;

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use greencart_core::{CartLine, Item, Weights};

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct FailurePayload {
    command: String,
    status: String,
    error_class: String,
    message: String,
}

impl CommandResult {
    /// Successful commands print the domain payload itself, not an envelope
    /// around it.
    pub fn success(payload: serde_json::Value) -> Self {
        let output = serde_json::to_string(&payload)
            .unwrap_or_else(|error| format!("{{\"error\":\"{error}\"}}"));
        Self { exit_code: 0, output }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = FailurePayload {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: error_class.to_string(),
            message: message.into(),
        };
        let output = serde_json::to_string(&payload).unwrap_or_else(|error| {
            format!("{{\"status\":\"error\",\"message\":\"{error}\"}}")
        });
        Self { exit_code, output }
    }
}

#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to read {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("failed to parse {path}: {source}")]
    Parse { path: PathBuf, source: serde_json::Error },
}

impl InputError {
    pub fn class(&self) -> &'static str {
        match self {
            Self::Io { .. } => "io",
            Self::Parse { .. } => "parse",
        }
    }
}

/// Catalog files are a bare JSON array of item records.
pub fn load_catalog(path: &Path) -> Result<Vec<Item>, InputError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| InputError::Io { path: path.to_path_buf(), source })?;
    serde_json::from_str(&raw)
        .map_err(|source| InputError::Parse { path: path.to_path_buf(), source })
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CartFile {
    Wrapped { items: Vec<CartLine> },
    Bare(Vec<CartLine>),
}

/// Cart files accept either `{"items": [{"id", "qty"}]}` or a bare array
/// of lines.
pub fn load_cart(path: &Path) -> Result<Vec<CartLine>, InputError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| InputError::Io { path: path.to_path_buf(), source })?;
    let parsed: CartFile = serde_json::from_str(&raw)
        .map_err(|source| InputError::Parse { path: path.to_path_buf(), source })?;

    Ok(match parsed {
        CartFile::Wrapped { items } => items,
        CartFile::Bare(lines) => lines,
    })
}

/// Per-invocation weight overrides shared by the recommend and score
/// commands. Unset components fall back to the configured defaults.
#[derive(Debug, Default, clap::Args)]
pub struct WeightArgs {
    #[arg(long, help = "Weight for price")]
    pub w_price: Option<f64>,
    #[arg(long, help = "Weight for CO2 emissions")]
    pub w_co2: Option<f64>,
    #[arg(long, help = "Weight for health score")]
    pub w_health: Option<f64>,
    #[arg(long, help = "Weight for social score")]
    pub w_social: Option<f64>,
}

impl WeightArgs {
    pub fn resolve(&self, base: Weights) -> Weights {
        Weights {
            price: self.w_price.unwrap_or(base.price),
            co2: self.w_co2.unwrap_or(base.co2),
            health: self.w_health.unwrap_or(base.health),
            social: self.w_social.unwrap_or(base.social),
        }
    }
}
