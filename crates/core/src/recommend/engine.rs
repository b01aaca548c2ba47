//! Single-item substitute recommendation.

use serde::{Deserialize, Serialize};

use crate::domain::item::Item;

use super::normalize::{build_category_norms, Weights};
use super::scoring::score_item;
use super::similarity::similar_candidates;

/// Truncated view of a ranked substitute, ready for a calling layer to emit.
/// `sustainability_score` is rounded to 4 decimals, `ratio` to 8; rounding
/// happens only here, at the formatting boundary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubstituteSummary {
    pub id: String,
    pub name: String,
    pub brand: String,
    pub category: String,
    pub unit: String,
    #[serde(rename = "packSize")]
    pub pack_size: Option<f64>,
    pub price: Option<f64>,
    pub co2_kg: Option<f64>,
    pub health_score: Option<f64>,
    pub social_score: Option<f64>,
    pub sustainability_score: f64,
    pub ratio: f64,
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

pub(super) fn summarize(item: &Item, score: super::ItemScore) -> SubstituteSummary {
    SubstituteSummary {
        id: item.id.clone(),
        name: item.name.clone(),
        brand: item.brand.clone(),
        category: item.category.clone(),
        unit: item.unit.clone(),
        pack_size: item.pack_size,
        price: item.price,
        co2_kg: item.co2_kg,
        health_score: item.health_score,
        social_score: item.social_score,
        sustainability_score: round_to(score.score, 4),
        ratio: round_to(score.ratio, 8),
    }
}

/// Rank substitutes for `target` from an already similarity-filtered pool.
///
/// Normalizers are built over `{target} ∪ candidates`, so scores are only
/// comparable within this call. Survivors must improve on the target by at
/// least one criterion (price, emissions, or ratio); an empty result is a
/// valid outcome, not an error.
pub fn recommend(
    target: &Item,
    candidates: &[Item],
    weights: &Weights,
    k: usize,
) -> Vec<SubstituteSummary> {
    let refs: Vec<&Item> = candidates.iter().collect();
    recommend_refs(target, &refs, weights, k)
}

/// Tiered matching plus ranking in one step: the flow a calling layer uses
/// when it holds the full catalog rather than a prefiltered pool.
pub fn recommend_for_item(
    target: &Item,
    catalog: &[Item],
    weights: &Weights,
    k: usize,
) -> Vec<SubstituteSummary> {
    let candidates = similar_candidates(target, catalog);
    recommend_refs(target, &candidates, weights, k)
}

fn recommend_refs(
    target: &Item,
    candidates: &[&Item],
    weights: &Weights,
    k: usize,
) -> Vec<SubstituteSummary> {
    let weights = weights.normalized();

    let norms =
        build_category_norms(std::iter::once(target).chain(candidates.iter().copied()));
    let target_score = score_item(target, &weights, norms.get(&target.category_key()));

    let mut scored: Vec<(&Item, super::ItemScore)> = candidates
        .iter()
        .map(|item| (*item, score_item(item, &weights, norms.get(&item.category_key()))))
        .collect();

    // Keep candidates that improve on at least one criterion. Missing price
    // or emissions compare as +infinity on either side.
    scored.retain(|(item, score)| {
        item.price.unwrap_or(f64::INFINITY) <= target.price.unwrap_or(f64::INFINITY)
            || item.co2_kg.unwrap_or(f64::INFINITY) <= target.co2_kg.unwrap_or(f64::INFINITY)
            || score.ratio < target_score.ratio
    });

    scored.sort_by(|a, b| {
        a.1.ratio.total_cmp(&b.1.ratio).then_with(|| {
            a.0.price
                .unwrap_or(f64::INFINITY)
                .total_cmp(&b.0.price.unwrap_or(f64::INFINITY))
        })
    });

    scored.into_iter().take(k).map(|(item, score)| summarize(item, score)).collect()
}
