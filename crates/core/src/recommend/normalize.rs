//! Weight normalization and per-category min/range builders.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::item::Item;

/// Relative importance of the four scoring attributes.
///
/// Callers may pass any non-negative components; `normalized` rescales them
/// to sum to 1 before scoring.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub price: f64,
    pub co2: f64,
    pub health: f64,
    pub social: f64,
}

impl Weights {
    /// Rescale so the components sum to 1. An all-zero input normalizes
    /// against a sum of 1 instead of dividing by zero, yielding all zeros.
    pub fn normalized(&self) -> Weights {
        let mut sum = self.price + self.co2 + self.health + self.social;
        if sum == 0.0 {
            sum = 1.0;
        }

        Weights {
            price: self.price / sum,
            co2: self.co2 / sum,
            health: self.health / sum,
            social: self.social / sum,
        }
    }
}

impl Default for Weights {
    fn default() -> Self {
        super::DEFAULT_WEIGHTS
    }
}

/// Observed min and span of one attribute within one category bucket.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AttributeRange {
    pub min: f64,
    pub range: f64,
}

impl AttributeRange {
    /// Fallback used when no normalizer exists for an item's category:
    /// raw-value scoring.
    pub const RAW: AttributeRange = AttributeRange { min: 0.0, range: 1.0 };

    fn from_values(values: &[f64]) -> AttributeRange {
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        // A single-value range floors to 1 so the lone item normalizes to 0
        // along that axis rather than dividing by zero.
        let span = max - min;
        let range = if span == 0.0 { 1.0 } else { span };
        AttributeRange { min, range }
    }
}

/// Per-category normalizers for the four scored attributes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CategoryNorms {
    pub price: AttributeRange,
    pub co2: AttributeRange,
    pub health: AttributeRange,
    pub social: AttributeRange,
}

impl CategoryNorms {
    pub const RAW: CategoryNorms = CategoryNorms {
        price: AttributeRange::RAW,
        co2: AttributeRange::RAW,
        health: AttributeRange::RAW,
        social: AttributeRange::RAW,
    };
}

#[derive(Default)]
struct CategoryBucket {
    price: Vec<f64>,
    co2: Vec<f64>,
    health: Vec<f64>,
    social: Vec<f64>,
}

/// Build category normalizers over exactly the comparison set supplied.
///
/// The result is scoped to this invocation: scores computed against one
/// comparison set are not comparable to scores computed against another.
/// Missing attributes participate as 0, the same default the scorer applies.
pub fn build_category_norms<'a>(
    items: impl IntoIterator<Item = &'a Item>,
) -> BTreeMap<String, CategoryNorms> {
    let mut buckets: BTreeMap<String, CategoryBucket> = BTreeMap::new();

    for item in items {
        let bucket = buckets.entry(item.category_key()).or_default();
        bucket.price.push(item.price_or_zero());
        bucket.co2.push(item.co2_or_zero());
        bucket.health.push(item.health_or_zero());
        bucket.social.push(item.social_or_zero());
    }

    buckets
        .into_iter()
        .map(|(category, bucket)| {
            let norms = CategoryNorms {
                price: AttributeRange::from_values(&bucket.price),
                co2: AttributeRange::from_values(&bucket.co2),
                health: AttributeRange::from_values(&bucket.health),
                social: AttributeRange::from_values(&bucket.social),
            };
            (category, norms)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, category: &str, price: Option<f64>, co2: Option<f64>) -> Item {
        Item {
            id: id.to_string(),
            barcode: None,
            name: id.to_string(),
            brand: String::new(),
            category: category.to_string(),
            unit: "L".to_string(),
            pack_size: None,
            price,
            co2_kg: co2,
            health_score: Some(50.0),
            social_score: Some(50.0),
        }
    }

    #[test]
    fn normalized_weights_sum_to_one() {
        let weights = Weights { price: 2.0, co2: 1.0, health: 1.0, social: 0.0 }.normalized();
        let sum = weights.price + weights.co2 + weights.health + weights.social;
        assert!((sum - 1.0).abs() < 1e-12);
        assert!((weights.price - 0.5).abs() < 1e-12);
    }

    #[test]
    fn zero_weight_vector_normalizes_without_dividing_by_zero() {
        let weights = Weights { price: 0.0, co2: 0.0, health: 0.0, social: 0.0 }.normalized();
        assert_eq!(weights, Weights { price: 0.0, co2: 0.0, health: 0.0, social: 0.0 });
    }

    #[test]
    fn degenerate_range_floors_to_one() {
        let norms = build_category_norms([item("a", "leche", Some(1000.0), Some(2.0))].iter());
        let leche = norms.get("leche").expect("bucket exists");
        assert_eq!(leche.price.min, 1000.0);
        assert_eq!(leche.price.range, 1.0);
        assert_eq!(leche.co2.range, 1.0);
    }

    #[test]
    fn range_preserves_sub_unit_spans() {
        let norms = build_category_norms(
            [
                item("a", "leche", Some(1000.0), Some(2.0)),
                item("b", "leche", Some(1000.0), Some(2.3)),
            ]
            .iter(),
        );
        let leche = norms.get("leche").expect("bucket exists");
        // Spans below 1 are kept, only an exactly-degenerate span floors.
        assert!((leche.co2.range - 0.3).abs() < 1e-12);
    }

    #[test]
    fn categories_bucket_independently_and_blank_goes_to_underscore() {
        let norms = build_category_norms(
            [
                item("a", "leche", Some(1000.0), Some(2.0)),
                item("b", "Pan", Some(500.0), Some(1.0)),
                item("c", "", Some(100.0), Some(0.5)),
            ]
            .iter(),
        );

        assert_eq!(norms.len(), 3);
        assert!(norms.contains_key("leche"));
        assert!(norms.contains_key("pan"));
        assert!(norms.contains_key("_"));
    }

    #[test]
    fn missing_attributes_aggregate_as_zero() {
        let norms = build_category_norms(
            [item("a", "leche", None, Some(2.0)), item("b", "leche", Some(800.0), Some(1.0))]
                .iter(),
        );
        let leche = norms.get("leche").expect("bucket exists");
        assert_eq!(leche.price.min, 0.0);
        assert_eq!(leche.price.range, 800.0);
    }
}
