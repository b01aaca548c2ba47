//! Batch substitute suggestions for a whole cart.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::domain::cart::{CartLine, CartTotals};
use crate::domain::item::Item;

use super::engine::{summarize, SubstituteSummary};
use super::normalize::build_category_norms;
use super::scoring::{score_item, ItemScore};
use super::similarity::is_similar;
use super::{Weights, STRICT_PACK_TOLERANCE};

/// Weight preset for cart-wide suggestions. Distinct from the optimizer
/// presets: suggestion weights lean harder on the dominant attribute and
/// there is no balanced variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestMode {
    Ahorro,
    Ambiente,
}

impl SuggestMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ahorro => "ahorro",
            Self::Ambiente => "ambiente",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "ahorro" => Some(Self::Ahorro),
            "ambiente" => Some(Self::Ambiente),
            _ => None,
        }
    }

    /// Raw preset weights; normalize before scoring.
    pub fn preset(&self) -> Weights {
        match self {
            Self::Ahorro => Weights { price: 0.7, co2: 0.15, health: 0.1, social: 0.05 },
            Self::Ambiente => Weights { price: 0.2, co2: 0.6, health: 0.15, social: 0.05 },
        }
    }
}

impl Default for SuggestMode {
    fn default() -> Self {
        Self::Ambiente
    }
}

/// Per-product suggestion lists plus the cart totals before and after
/// swapping each line for its best suggestion.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSuggestions {
    pub suggestions: BTreeMap<String, Vec<SubstituteSummary>>,
    pub current_totals: CartTotals,
    pub suggested_totals: CartTotals,
    pub mode: SuggestMode,
}

/// Suggest substitutes for every resolvable cart line at once.
///
/// Candidates come from the strict similarity predicate (±30% pack, unit
/// match) and exclude both the line's own item and every other id the cart
/// already holds: a product the shopper picked deliberately is never offered
/// as a replacement for another line. Scores use catalog-global normalizers,
/// the improvement filter from the single-item recommender, and a plain
/// ratio sort; each list is capped at `k_per_item`. `suggested_totals`
/// replaces each line with its top suggestion when one exists, otherwise the
/// line's own item, quantity-weighted like [`crate::cart_totals`].
pub fn suggest_for_cart(
    lines: &[CartLine],
    mode: SuggestMode,
    catalog: &[Item],
    k_per_item: usize,
) -> CartSuggestions {
    let weights = mode.preset().normalized();
    let norms = build_category_norms(catalog.iter());
    let by_id: BTreeMap<&str, &Item> =
        catalog.iter().map(|item| (item.id.as_str(), item)).collect();
    let desired: BTreeSet<&str> = lines.iter().map(|line| line.id.as_str()).collect();

    let mut suggestions: BTreeMap<String, Vec<SubstituteSummary>> = BTreeMap::new();
    let mut current_totals = CartTotals::default();
    let mut suggested_totals = CartTotals::default();

    for line in lines {
        let Some(target) = by_id.get(line.id.as_str()).copied() else {
            continue;
        };

        let target_score = score_item(target, &weights, norms.get(&target.category_key()));

        let mut scored: Vec<(&Item, ItemScore)> = catalog
            .iter()
            .filter(|candidate| {
                candidate.id != target.id && !desired.contains(candidate.id.as_str())
            })
            .filter(|candidate| is_similar(target, candidate, STRICT_PACK_TOLERANCE))
            .map(|candidate| {
                (candidate, score_item(candidate, &weights, norms.get(&candidate.category_key())))
            })
            .collect();

        scored.retain(|(item, score)| {
            item.price.unwrap_or(f64::INFINITY) <= target.price.unwrap_or(f64::INFINITY)
                || item.co2_kg.unwrap_or(f64::INFINITY) <= target.co2_kg.unwrap_or(f64::INFINITY)
                || score.ratio < target_score.ratio
        });

        scored.sort_by(|a, b| a.1.ratio.total_cmp(&b.1.ratio));
        scored.truncate(k_per_item);

        if line.qty > 0 {
            current_totals.add_item(target, line.qty);
            let pick = scored.first().map(|(item, _)| *item).unwrap_or(target);
            suggested_totals.add_item(pick, line.qty);
        }

        let summaries =
            scored.into_iter().map(|(item, score)| summarize(item, score)).collect();
        suggestions.insert(target.id.clone(), summaries);
    }

    CartSuggestions { suggestions, current_totals, suggested_totals, mode }
}
