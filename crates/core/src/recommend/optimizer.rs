//! Greedy budget optimization over a cart and the full catalog.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::cart::{CartLine, CartTotals};
use crate::domain::item::Item;

use super::normalize::{build_category_norms, Weights};
use super::scoring::{score_item, ItemScore};
use super::similarity::is_similar;
use super::{STRICT_PACK_TOLERANCE, SUBSTITUTES_PER_LINE};

/// Weight preset selecting what the optimizer favors.
///
/// The serialized names are part of the wire contract and stay Spanish:
/// `ahorro` (savings-heavy), `ambiente` (emissions-heavy), `balanceado`
/// (balanced).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptimizeMode {
    Ahorro,
    Ambiente,
    Balanceado,
}

impl OptimizeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ahorro => "ahorro",
            Self::Ambiente => "ambiente",
            Self::Balanceado => "balanceado",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "ahorro" => Some(Self::Ahorro),
            "ambiente" => Some(Self::Ambiente),
            "balanceado" => Some(Self::Balanceado),
            _ => None,
        }
    }

    /// Raw preset weights; normalize before scoring.
    pub fn preset(&self) -> Weights {
        match self {
            Self::Ahorro => Weights { price: 0.7, co2: 0.1, health: 0.1, social: 0.1 },
            Self::Ambiente => Weights { price: 0.2, co2: 0.5, health: 0.2, social: 0.1 },
            Self::Balanceado => Weights { price: 0.4, co2: 0.3, health: 0.2, social: 0.1 },
        }
    }
}

impl Default for OptimizeMode {
    fn default() -> Self {
        Self::Balanceado
    }
}

/// One consolidated pick in the optimized list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OptimizedItem {
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
    pub qty: i64,
}

/// Result of a cart optimization run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeOutcome {
    pub optimized_items: Vec<OptimizedItem>,
    pub totals: CartTotals,
    pub mode: OptimizeMode,
    pub budget: f64,
}

impl OptimizeOutcome {
    fn empty(mode: OptimizeMode, budget: f64) -> Self {
        Self { optimized_items: Vec::new(), totals: CartTotals::default(), mode, budget }
    }
}

/// Greedily fill `budget` with the most sustainability-per-currency entries
/// drawn from each cart line's option set (original plus best substitutes).
///
/// Every physical unit of a line gets an independent copy of the line's
/// option set in one global pool; the greedy pass then ranks the whole pool
/// by ratio, not line by line. This is a heuristic 0/1 knapsack by ratio and
/// is knowingly not globally optimal; its observable behavior is part of the
/// contract. Unresolvable ids and non-positive quantities are skipped
/// silently, and an empty cart or pool yields an empty result with zero
/// totals.
pub fn optimize_cart(
    lines: &[CartLine],
    budget: f64,
    mode: OptimizeMode,
    catalog: &[Item],
) -> OptimizeOutcome {
    let weights = mode.preset().normalized();

    // Catalog-global normalizers: optimizer scores are comparable across all
    // cart lines, unlike the per-call scope of the single-item recommender.
    let norms = build_category_norms(catalog.iter());
    let by_id: BTreeMap<&str, &Item> =
        catalog.iter().map(|item| (item.id.as_str(), item)).collect();

    let mut pool: Vec<(&Item, ItemScore)> = Vec::new();

    for line in lines {
        let Some(original) = by_id.get(line.id.as_str()).copied() else {
            continue;
        };
        if line.qty <= 0 {
            continue;
        }

        let mut substitutes: Vec<(&Item, ItemScore)> = catalog
            .iter()
            .filter(|candidate| candidate.id != line.id)
            .filter(|candidate| is_similar(original, candidate, STRICT_PACK_TOLERANCE))
            .map(|candidate| {
                (candidate, score_item(candidate, &weights, norms.get(&candidate.category_key())))
            })
            .collect();
        substitutes.sort_by(|a, b| a.1.ratio.total_cmp(&b.1.ratio));
        substitutes.truncate(SUBSTITUTES_PER_LINE);

        let original_score = score_item(original, &weights, norms.get(&original.category_key()));

        let mut option_set = Vec::with_capacity(1 + substitutes.len());
        option_set.push((original, original_score));
        option_set.extend(substitutes);

        // Each unit is optimized independently, never bulk-substituted.
        for _ in 0..line.qty {
            pool.extend(option_set.iter().copied());
        }
    }

    if pool.is_empty() {
        return OptimizeOutcome::empty(mode, budget);
    }

    pool.sort_by(|a, b| a.1.ratio.total_cmp(&b.1.ratio));

    let mut spent = 0.0;
    let mut chosen: Vec<&Item> = Vec::new();
    for (item, _) in pool {
        let price = item.price_or_zero();
        if price <= 0.0 {
            continue;
        }
        if spent + price > budget {
            continue;
        }
        chosen.push(item);
        spent += price;
    }

    // Consolidate by item id, preserving first-acceptance order.
    let mut order: Vec<&str> = Vec::new();
    let mut quantities: BTreeMap<&str, (&Item, i64)> = BTreeMap::new();
    for item in chosen {
        let entry = quantities.entry(item.id.as_str()).or_insert_with(|| {
            order.push(item.id.as_str());
            (item, 0)
        });
        entry.1 += 1;
    }

    let mut totals = CartTotals::default();
    let optimized_items = order
        .into_iter()
        .map(|id| {
            let (item, qty) = quantities[id];
            totals.add_item(item, qty);
            OptimizedItem {
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
                qty,
            }
        })
        .collect();

    OptimizeOutcome { optimized_items, totals, mode, budget }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, category: &str, price: f64, co2: f64) -> Item {
        Item {
            id: id.to_string(),
            barcode: None,
            name: format!("Item {id}"),
            brand: "Brand".to_string(),
            category: category.to_string(),
            unit: "L".to_string(),
            pack_size: Some(1.0),
            price: Some(price),
            co2_kg: Some(co2),
            health_score: Some(50.0),
            social_score: Some(50.0),
        }
    }

    fn line(id: &str, qty: i64) -> CartLine {
        CartLine { id: id.to_string(), qty }
    }

    #[test]
    fn total_spend_never_exceeds_budget() {
        let catalog = vec![
            item("a", "leche", 1000.0, 2.0),
            item("b", "leche", 900.0, 1.5),
            item("c", "leche", 800.0, 1.8),
        ];
        let outcome =
            optimize_cart(&[line("a", 3)], 2500.0, OptimizeMode::Balanceado, &catalog);

        assert!(outcome.totals.price <= 2500.0);
        assert!(!outcome.optimized_items.is_empty());
    }

    #[test]
    fn empty_cart_yields_empty_result_with_zero_totals() {
        let catalog = vec![item("a", "leche", 1000.0, 2.0)];
        let outcome = optimize_cart(&[], 5000.0, OptimizeMode::Ambiente, &catalog);

        assert!(outcome.optimized_items.is_empty());
        assert_eq!(outcome.totals, CartTotals::default());
        assert_eq!(outcome.mode, OptimizeMode::Ambiente);
        assert_eq!(outcome.budget, 5000.0);
    }

    #[test]
    fn nothing_affordable_yields_empty_result() {
        let catalog = vec![item("a", "leche", 1000.0, 2.0), item("b", "leche", 900.0, 1.5)];
        let outcome = optimize_cart(&[line("a", 2)], 1.0, OptimizeMode::Balanceado, &catalog);

        assert!(outcome.optimized_items.is_empty());
        assert_eq!(outcome.totals, CartTotals::default());
    }

    #[test]
    fn unknown_ids_and_non_positive_quantities_are_skipped() {
        let catalog = vec![item("a", "leche", 1000.0, 2.0)];
        let outcome = optimize_cart(
            &[line("missing", 2), line("a", 0), line("a", -3)],
            10_000.0,
            OptimizeMode::Balanceado,
            &catalog,
        );

        assert!(outcome.optimized_items.is_empty());
    }

    #[test]
    fn free_entries_never_distort_the_budget() {
        let mut free = item("free", "leche", 0.0, 0.0);
        free.health_score = Some(99.0);
        let catalog = vec![item("a", "leche", 1000.0, 2.0), free];

        let outcome = optimize_cart(&[line("a", 1)], 5000.0, OptimizeMode::Balanceado, &catalog);
        assert!(outcome.optimized_items.iter().all(|picked| picked.id != "free"));
    }

    #[test]
    fn quantity_replication_consolidates_back_by_id() {
        // Only one affordable choice per unit: both units pick the same item.
        let catalog = vec![item("a", "leche", 100.0, 2.0)];
        let outcome = optimize_cart(&[line("a", 2)], 1000.0, OptimizeMode::Balanceado, &catalog);

        assert_eq!(outcome.optimized_items.len(), 1);
        assert_eq!(outcome.optimized_items[0].qty, 2);
        assert_eq!(outcome.totals.price, 200.0);
    }

    #[test]
    fn substitutes_with_better_ratio_win_over_the_original() {
        let catalog = vec![
            item("orig", "leche", 1000.0, 2.0),
            item("better", "leche", 500.0, 0.5),
        ];
        // One unit, budget covers either; the cheaper, greener substitute
        // has the lower ratio and is picked first.
        let outcome = optimize_cart(&[line("orig", 1)], 600.0, OptimizeMode::Balanceado, &catalog);

        assert_eq!(outcome.optimized_items.len(), 1);
        assert_eq!(outcome.optimized_items[0].id, "better");
    }

    #[test]
    fn option_sets_are_bounded_per_line() {
        let mut catalog = vec![item("orig", "leche", 1000.0, 2.0)];
        for i in 0..20 {
            catalog.push(item(&format!("s{i}"), "leche", 100.0 + i as f64, 1.0));
        }

        // Budget large enough to accept every pool entry: one unit yields at
        // most 1 + SUBSTITUTES_PER_LINE accepted entries.
        let outcome =
            optimize_cart(&[line("orig", 1)], 1_000_000.0, OptimizeMode::Balanceado, &catalog);
        let accepted: i64 = outcome.optimized_items.iter().map(|p| p.qty).sum();
        assert_eq!(accepted as usize, 1 + SUBSTITUTES_PER_LINE);
    }

    #[test]
    fn greedy_is_global_across_lines_not_per_line() {
        let catalog = vec![
            item("milk", "leche", 900.0, 1.0),
            item("bread", "pan", 100.0, 0.2),
        ];
        // Budget fits only the bread unit; the milk line must not reserve
        // budget just because it appears first in the cart.
        let outcome = optimize_cart(
            &[line("milk", 1), line("bread", 1)],
            150.0,
            OptimizeMode::Balanceado,
            &catalog,
        );

        assert_eq!(outcome.optimized_items.len(), 1);
        assert_eq!(outcome.optimized_items[0].id, "bread");
    }

    #[test]
    fn duplicate_cart_lines_are_treated_independently() {
        let catalog = vec![item("a", "leche", 100.0, 2.0)];
        let outcome = optimize_cart(
            &[line("a", 1), line("a", 1)],
            1000.0,
            OptimizeMode::Balanceado,
            &catalog,
        );

        assert_eq!(outcome.optimized_items.len(), 1);
        assert_eq!(outcome.optimized_items[0].qty, 2);
    }

    #[test]
    fn identical_inputs_yield_identical_outcomes() {
        let catalog = vec![
            item("a", "leche", 1000.0, 2.0),
            item("b", "leche", 900.0, 1.5),
            item("c", "leche", 950.0, 1.2),
        ];
        let lines = vec![line("a", 2), line("b", 1)];

        let first = optimize_cart(&lines, 4000.0, OptimizeMode::Ahorro, &catalog);
        let second = optimize_cart(&lines, 4000.0, OptimizeMode::Ahorro, &catalog);
        assert_eq!(first, second);
    }

    #[test]
    fn mode_round_trips_through_strings() {
        for mode in [OptimizeMode::Ahorro, OptimizeMode::Ambiente, OptimizeMode::Balanceado] {
            assert_eq!(OptimizeMode::parse(mode.as_str()), Some(mode));
        }
        assert_eq!(OptimizeMode::parse("  AMBIENTE "), Some(OptimizeMode::Ambiente));
        assert_eq!(OptimizeMode::parse("turbo"), None);
    }

    #[test]
    fn presets_normalize_to_unit_sum() {
        for mode in [OptimizeMode::Ahorro, OptimizeMode::Ambiente, OptimizeMode::Balanceado] {
            let weights = mode.preset().normalized();
            let sum = weights.price + weights.co2 + weights.health + weights.social;
            assert!((sum - 1.0).abs() < 1e-12);
        }
    }
}
