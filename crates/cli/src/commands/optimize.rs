use std::path::PathBuf;

use serde_json::json;
use tracing::debug;

use greencart_core::{
    cart_totals, errors::validate_budget, optimize_cart, EngineConfig, OptimizeMode,
};

use super::{load_cart, load_catalog, CommandResult};

#[derive(Debug, clap::Args)]
pub struct OptimizeArgs {
    #[arg(long, help = "Catalog JSON file (array of item records)")]
    pub catalog: PathBuf,
    #[arg(long, help = "Cart JSON file ({\"items\": [{\"id\", \"qty\"}]} or a bare array)")]
    pub cart: PathBuf,
    #[arg(long, help = "Total budget, must be positive")]
    pub budget: f64,
    #[arg(long, help = "Weight preset: ahorro, ambiente, or balanceado")]
    pub mode: Option<String>,
}

pub fn run(args: &OptimizeArgs, config: &EngineConfig) -> CommandResult {
    if let Err(error) = validate_budget(args.budget) {
        return CommandResult::failure("optimize", "invalid_request", error.to_string(), 2);
    }

    let catalog = match load_catalog(&args.catalog) {
        Ok(catalog) => catalog,
        Err(error) => {
            return CommandResult::failure("optimize", error.class(), error.to_string(), 2)
        }
    };
    let lines = match load_cart(&args.cart) {
        Ok(lines) => lines,
        Err(error) => {
            return CommandResult::failure("optimize", error.class(), error.to_string(), 2)
        }
    };

    // Unknown mode strings fall back to the configured default rather than
    // failing the run.
    let mode = args
        .mode
        .as_deref()
        .and_then(OptimizeMode::parse)
        .unwrap_or(config.mode);

    debug!(lines = lines.len(), budget = args.budget, mode = mode.as_str(), "optimizing cart");

    let current_totals = cart_totals(&lines, &catalog);
    let outcome = optimize_cart(&lines, args.budget, mode, &catalog);

    CommandResult::success(json!({
        "optimizedItems": outcome.optimized_items,
        "totals": outcome.totals,
        "currentTotals": current_totals,
        "mode": outcome.mode,
        "budget": outcome.budget,
    }))
}
