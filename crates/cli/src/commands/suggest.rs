use std::path::PathBuf;

use serde_json::json;
use tracing::debug;

use greencart_core::{suggest_for_cart, EngineConfig, SuggestMode, SUGGESTIONS_PER_ITEM};

use super::{load_cart, load_catalog, CommandResult};

#[derive(Debug, clap::Args)]
pub struct SuggestArgs {
    #[arg(long, help = "Catalog JSON file (array of item records)")]
    pub catalog: PathBuf,
    #[arg(long, help = "Cart JSON file ({\"items\": [{\"id\", \"qty\"}]} or a bare array)")]
    pub cart: PathBuf,
    #[arg(long, help = "Weight preset: ahorro or ambiente")]
    pub mode: Option<String>,
    #[arg(long, help = "Maximum suggestions per cart item")]
    pub k: Option<usize>,
}

pub fn run(args: &SuggestArgs, _config: &EngineConfig) -> CommandResult {
    let catalog = match load_catalog(&args.catalog) {
        Ok(catalog) => catalog,
        Err(error) => {
            return CommandResult::failure("suggest", error.class(), error.to_string(), 2)
        }
    };
    let lines = match load_cart(&args.cart) {
        Ok(lines) => lines,
        Err(error) => {
            return CommandResult::failure("suggest", error.class(), error.to_string(), 2)
        }
    };

    // Unknown mode strings fall back to ambiente rather than failing the run.
    let mode = args.mode.as_deref().and_then(SuggestMode::parse).unwrap_or_default();
    let k = args.k.unwrap_or(SUGGESTIONS_PER_ITEM);

    debug!(lines = lines.len(), mode = mode.as_str(), k, "suggesting cart-wide substitutes");

    let result = suggest_for_cart(&lines, mode, &catalog, k);

    CommandResult::success(json!({
        "suggestions": result.suggestions,
        "currentTotals": result.current_totals,
        "suggestedTotals": result.suggested_totals,
        "mode": result.mode,
    }))
}
