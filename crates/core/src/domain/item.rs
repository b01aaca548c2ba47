use serde::{Deserialize, Serialize};

/// A catalog item as supplied by the external catalog store.
///
/// The engine never mutates an `Item`; every derived value is a new record.
/// Numeric attributes are optional on the wire: a missing value scores as 0
/// and compares as +infinity in the improvement filter, which is why they are
/// kept as `Option<f64>` instead of being defaulted at deserialization time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub unit: String,
    #[serde(rename = "packSize", default)]
    pub pack_size: Option<f64>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub co2_kg: Option<f64>,
    #[serde(default)]
    pub health_score: Option<f64>,
    #[serde(default)]
    pub social_score: Option<f64>,
}

impl Item {
    pub fn price_or_zero(&self) -> f64 {
        self.price.unwrap_or(0.0)
    }

    pub fn co2_or_zero(&self) -> f64 {
        self.co2_kg.unwrap_or(0.0)
    }

    pub fn health_or_zero(&self) -> f64 {
        self.health_score.unwrap_or(0.0)
    }

    pub fn social_or_zero(&self) -> f64 {
        self.social_score.unwrap_or(0.0)
    }

    /// Normalization bucket key for this item's category.
    ///
    /// Blank categories share the `"_"` bucket so uncategorized items are
    /// still normalized against each other.
    pub fn category_key(&self) -> String {
        let folded = self.category.trim().to_ascii_lowercase();
        if folded.is_empty() {
            "_".to_string()
        } else {
            folded
        }
    }
}
