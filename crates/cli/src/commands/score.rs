use std::path::PathBuf;

use serde_json::json;
use tracing::debug;

use greencart_core::{build_category_norms, score_item, EngineConfig};

use super::{load_catalog, CommandResult, WeightArgs};

#[derive(Debug, clap::Args)]
pub struct ScoreArgs {
    #[arg(long, help = "Catalog JSON file (array of item records)")]
    pub catalog: PathBuf,
    #[arg(long, help = "Id of the item to score")]
    pub item: String,
    #[command(flatten)]
    pub weights: WeightArgs,
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

pub fn run(args: &ScoreArgs, config: &EngineConfig) -> CommandResult {
    let catalog = match load_catalog(&args.catalog) {
        Ok(catalog) => catalog,
        Err(error) => return CommandResult::failure("score", error.class(), error.to_string(), 2),
    };

    let Some(item) = catalog.iter().find(|item| item.id == args.item) else {
        return CommandResult::failure(
            "score",
            "not_found",
            format!("item `{}` is not in the catalog", args.item),
            1,
        );
    };

    let weights = args.weights.resolve(config.weights).normalized();
    debug!(item = %item.id, catalog = catalog.len(), "scoring against catalog-wide normalizers");

    let norms = build_category_norms(catalog.iter());
    let score = score_item(item, &weights, norms.get(&item.category_key()));

    CommandResult::success(json!({
        "id": item.id,
        "category": item.category,
        "sustainability_score": round_to(score.score, 4),
        "ratio": round_to(score.ratio, 8),
    }))
}
