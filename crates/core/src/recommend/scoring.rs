//! Composite sustainability scoring.

use crate::domain::item::Item;

use super::normalize::{CategoryNorms, Weights};

/// Derived score pair for one item under one weight vector.
///
/// `score` is a weighted composite where lower means more sustainable: price
/// and emissions are minimized directly, health and social are inverted into
/// the same minimizing direction. `ratio` is score per currency unit, the
/// figure used for ranking and greedy selection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ItemScore {
    pub score: f64,
    pub ratio: f64,
}

/// Score an item against its category normalizer.
///
/// `norms: None` falls back to raw-value scoring (`min 0, range 1` per
/// attribute). Scores are finite for any item whose attributes lie within
/// the normalizer's observed min/max; items scored against a different
/// comparison set may fall outside [0, 1], which is expected.
pub fn score_item(item: &Item, weights: &Weights, norms: Option<&CategoryNorms>) -> ItemScore {
    let norms = norms.copied().unwrap_or(CategoryNorms::RAW);

    let price_norm = (item.price_or_zero() - norms.price.min) / norms.price.range;
    let co2_norm = (item.co2_or_zero() - norms.co2.min) / norms.co2.range;
    let health_norm = 1.0 - (item.health_or_zero() - norms.health.min) / norms.health.range;
    let social_norm = 1.0 - (item.social_or_zero() - norms.social.min) / norms.social.range;

    let score = weights.price * price_norm
        + weights.co2 * co2_norm
        + weights.health * health_norm
        + weights.social * social_norm;

    // Price floor of 1 keeps the ratio bounded for free or near-free items.
    let ratio = score / item.price.unwrap_or(1.0).max(1.0);

    ItemScore { score, ratio }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommend::{build_category_norms, DEFAULT_WEIGHTS};

    fn item(id: &str, price: f64, co2: f64, health: f64, social: f64) -> Item {
        Item {
            id: id.to_string(),
            barcode: None,
            name: id.to_string(),
            brand: String::new(),
            category: "leche".to_string(),
            unit: "L".to_string(),
            pack_size: Some(1.0),
            price: Some(price),
            co2_kg: Some(co2),
            health_score: Some(health),
            social_score: Some(social),
        }
    }

    #[test]
    fn lower_score_means_more_sustainable() {
        let worse = item("a", 1000.0, 2.0, 50.0, 50.0);
        let better = item("b", 900.0, 1.5, 60.0, 55.0);
        let norms = build_category_norms([worse.clone(), better.clone()].iter());
        let leche = norms.get("leche");

        let weights = DEFAULT_WEIGHTS.normalized();
        let sa = score_item(&worse, &weights, leche);
        let sb = score_item(&better, &weights, leche);

        assert!(sb.score < sa.score);
        assert!(sb.ratio < sa.ratio);
    }

    #[test]
    fn in_range_scores_stay_within_unit_interval() {
        let a = item("a", 1000.0, 2.0, 50.0, 50.0);
        let b = item("b", 900.0, 1.5, 60.0, 55.0);
        let norms = build_category_norms([a.clone(), b.clone()].iter());
        let leche = norms.get("leche");
        let weights = DEFAULT_WEIGHTS.normalized();

        for it in [&a, &b] {
            let s = score_item(it, &weights, leche);
            assert!(s.score.is_finite());
            assert!((-1e-12..=1.0 + 1e-12).contains(&s.score));
        }
    }

    #[test]
    fn absent_norms_fall_back_to_raw_scoring() {
        let it = item("a", 2.0, 1.0, 0.0, 0.0);
        let weights = Weights { price: 1.0, co2: 0.0, health: 0.0, social: 0.0 };

        let s = score_item(&it, &weights, None);
        // Raw price of 2 under a unit range, weight 1.
        assert_eq!(s.score, 2.0);
        assert_eq!(s.ratio, 1.0);
    }

    #[test]
    fn ratio_floors_price_at_one() {
        let mut it = item("a", 0.5, 1.0, 0.0, 0.0);
        let weights = DEFAULT_WEIGHTS.normalized();

        let cheap = score_item(&it, &weights, None);
        assert_eq!(cheap.ratio, cheap.score);

        it.price = None;
        let missing = score_item(&it, &weights, None);
        assert_eq!(missing.ratio, missing.score);
    }

    #[test]
    fn missing_attributes_score_as_zero() {
        let mut it = item("a", 100.0, 1.0, 50.0, 50.0);
        it.co2_kg = None;
        it.health_score = None;
        it.social_score = None;

        let weights = Weights { price: 0.0, co2: 1.0, health: 0.0, social: 0.0 };
        let s = score_item(&it, &weights, None);
        assert_eq!(s.score, 0.0);
    }
}
