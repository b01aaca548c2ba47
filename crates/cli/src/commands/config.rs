use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use toml::Value;

use greencart_core::config::{CONFIG_PATH_ENV, DEFAULT_CONFIG_FILE};
use greencart_core::EngineConfig;

use super::CommandResult;

pub fn run(config_path: Option<&Path>, config: &EngineConfig) -> CommandResult {
    let file_path = detect_config_path(config_path);
    let file_doc = file_path.as_deref().and_then(load_config_doc);

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];

    for (key, value, env_var) in [
        ("weights.price", config.weights.price.to_string(), "GREENCART_W_PRICE"),
        ("weights.co2", config.weights.co2.to_string(), "GREENCART_W_CO2"),
        ("weights.health", config.weights.health.to_string(), "GREENCART_W_HEALTH"),
        ("weights.social", config.weights.social.to_string(), "GREENCART_W_SOCIAL"),
        ("recommend.max_results", config.max_results.to_string(), "GREENCART_MAX_RESULTS"),
        ("optimize.mode", config.mode.as_str().to_string(), "GREENCART_MODE"),
    ] {
        let source = field_source(key, env_var, file_doc.as_ref(), file_path.as_deref());
        lines.push(format!("{key} = {value} ({source})"));
    }

    CommandResult { exit_code: 0, output: lines.join("\n") }
}

fn detect_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Ok(path) = env::var(CONFIG_PATH_ENV) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    let default = Path::new(DEFAULT_CONFIG_FILE);
    default.exists().then(|| default.to_path_buf())
}

fn load_config_doc(path: &Path) -> Option<Value> {
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key: &str,
    env_var: &str,
    file_doc: Option<&Value>,
    file_path: Option<&Path>,
) -> String {
    if env::var(env_var).is_ok() {
        return format!("env:{env_var}");
    }

    if let (Some(doc), Some(path)) = (file_doc, file_path) {
        let mut cursor = Some(doc);
        for part in key.split('.') {
            cursor = cursor.and_then(|value| value.get(part));
        }
        if cursor.is_some() {
            return format!("file:{}", path.display());
        }
    }

    "default".to_string()
}
