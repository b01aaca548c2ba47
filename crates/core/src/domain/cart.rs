use serde::{Deserialize, Serialize};

use crate::domain::item::Item;

/// One line of a shopping cart. Quantities are validated by the consumers:
/// lines with `qty <= 0` are skipped silently, matching the optimizer's
/// tolerance for malformed carts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: String,
    pub qty: i64,
}

/// Quantity-weighted aggregate over a set of cart lines or optimized picks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CartTotals {
    pub price: f64,
    pub co2: f64,
    pub health: f64,
    pub social: f64,
}

impl CartTotals {
    pub fn add_item(&mut self, item: &Item, qty: i64) {
        let qty = qty as f64;
        self.price += item.price_or_zero() * qty;
        self.co2 += item.co2_or_zero() * qty;
        self.health += item.health_or_zero() * qty;
        self.social += item.social_or_zero() * qty;
    }
}

/// Totals for a cart as it currently stands, before any substitution.
///
/// Lines whose id is not present in `catalog` and lines with a non-positive
/// quantity contribute nothing.
pub fn cart_totals(lines: &[CartLine], catalog: &[Item]) -> CartTotals {
    let mut totals = CartTotals::default();

    for line in lines {
        if line.qty <= 0 {
            continue;
        }
        if let Some(item) = catalog.iter().find(|item| item.id == line.id) {
            totals.add_item(item, line.qty);
        }
    }

    totals
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, price: f64, co2: f64) -> Item {
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
            health_score: Some(50.0),
            social_score: Some(40.0),
        }
    }

    #[test]
    fn totals_are_quantity_weighted() {
        let catalog = vec![item("a", 1000.0, 2.0), item("b", 500.0, 1.0)];
        let lines = vec![
            CartLine { id: "a".to_string(), qty: 2 },
            CartLine { id: "b".to_string(), qty: 1 },
        ];

        let totals = cart_totals(&lines, &catalog);
        assert_eq!(totals.price, 2500.0);
        assert_eq!(totals.co2, 5.0);
        assert_eq!(totals.health, 150.0);
        assert_eq!(totals.social, 120.0);
    }

    #[test]
    fn unknown_ids_and_non_positive_quantities_are_skipped() {
        let catalog = vec![item("a", 1000.0, 2.0)];
        let lines = vec![
            CartLine { id: "missing".to_string(), qty: 3 },
            CartLine { id: "a".to_string(), qty: 0 },
            CartLine { id: "a".to_string(), qty: -1 },
        ];

        assert_eq!(cart_totals(&lines, &catalog), CartTotals::default());
    }

    #[test]
    fn empty_cart_yields_zero_totals() {
        assert_eq!(cart_totals(&[], &[]), CartTotals::default());
    }
}
