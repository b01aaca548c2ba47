use std::path::PathBuf;

use serde_json::json;
use tracing::debug;

use greencart_core::{errors::validate_target_id, recommend_for_item, EngineConfig};

use super::{load_catalog, CommandResult, WeightArgs};

#[derive(Debug, clap::Args)]
pub struct RecommendArgs {
    #[arg(long, help = "Catalog JSON file (array of item records)")]
    pub catalog: PathBuf,
    #[arg(long, help = "Id of the item to find substitutes for")]
    pub target: String,
    #[arg(long, help = "Maximum number of substitutes to return")]
    pub k: Option<usize>,
    #[command(flatten)]
    pub weights: WeightArgs,
}

pub fn run(args: &RecommendArgs, config: &EngineConfig) -> CommandResult {
    if let Err(error) = validate_target_id(&args.target) {
        return CommandResult::failure("recommend", "invalid_request", error.to_string(), 2);
    }

    let catalog = match load_catalog(&args.catalog) {
        Ok(catalog) => catalog,
        Err(error) => {
            return CommandResult::failure("recommend", error.class(), error.to_string(), 2)
        }
    };

    let Some(target) = catalog.iter().find(|item| item.id == args.target) else {
        return CommandResult::failure(
            "recommend",
            "not_found",
            format!("item `{}` is not in the catalog", args.target),
            1,
        );
    };

    let weights = args.weights.resolve(config.weights);
    let k = args.k.unwrap_or(config.max_results);
    debug!(target = %target.id, candidates = catalog.len(), k, "ranking substitutes");

    let suggestions = recommend_for_item(target, &catalog, &weights, k);

    CommandResult::success(json!({
        "targetId": target.id,
        "suggestions": suggestions,
    }))
}
