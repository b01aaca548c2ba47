//! Substitute eligibility: the tiered fallback matcher and the standalone
//! similarity predicate used by the budget optimizer.

use crate::domain::item::Item;

use super::{CANDIDATE_POOL_CAP, RELAXED_PACK_TOLERANCE, STRICT_PACK_TOLERANCE};

/// One rung of the fallback ladder. Tiers are evaluated in order and the
/// first tier with at least one candidate wins; precision is only traded for
/// coverage when a stricter tier comes up empty.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimilarityTier {
    /// Require a case/whitespace-insensitive unit match.
    pub match_unit: bool,
    /// Pack-size tolerance as a fraction of the reference's pack size.
    /// `None` disables the pack-size constraint entirely.
    pub pack_tolerance: Option<f64>,
}

/// Ordered relaxation policy: strict, relaxed, category-only.
pub const FALLBACK_TIERS: [SimilarityTier; 3] = [
    SimilarityTier { match_unit: true, pack_tolerance: Some(STRICT_PACK_TOLERANCE) },
    SimilarityTier { match_unit: false, pack_tolerance: Some(RELAXED_PACK_TOLERANCE) },
    SimilarityTier { match_unit: false, pack_tolerance: None },
];

fn fold(value: &str) -> String {
    value.trim().to_ascii_lowercase()
}

fn same_category(a: &Item, b: &Item) -> bool {
    fold(&a.category) == fold(&b.category)
}

fn same_unit(a: &Item, b: &Item) -> bool {
    fold(&a.unit) == fold(&b.unit)
}

/// Unknown pack size on either side never blocks a match.
fn pack_within(reference: &Item, candidate: &Item, tolerance: f64) -> bool {
    let pa = reference.pack_size.unwrap_or(0.0);
    let pb = candidate.pack_size.unwrap_or(0.0);
    if !(pa > 0.0 && pb > 0.0) {
        return true;
    }

    pb >= pa * (1.0 - tolerance) && pb <= pa * (1.0 + tolerance)
}

fn matches_tier(reference: &Item, candidate: &Item, tier: &SimilarityTier) -> bool {
    if !same_category(reference, candidate) {
        return false;
    }
    if tier.match_unit && !same_unit(reference, candidate) {
        return false;
    }
    match tier.pack_tolerance {
        Some(tolerance) => pack_within(reference, candidate, tolerance),
        None => true,
    }
}

/// Candidate pool for a reference item, applying the fallback ladder.
///
/// Each tier excludes the reference itself and is capped at
/// [`CANDIDATE_POOL_CAP`] entries; catalog order is preserved within a tier.
pub fn similar_candidates<'a>(reference: &Item, catalog: &'a [Item]) -> Vec<&'a Item> {
    for tier in &FALLBACK_TIERS {
        let pool: Vec<&Item> = catalog
            .iter()
            .filter(|candidate| candidate.id != reference.id)
            .filter(|candidate| matches_tier(reference, candidate, tier))
            .take(CANDIDATE_POOL_CAP)
            .collect();

        if !pool.is_empty() {
            return pool;
        }
    }

    Vec::new()
}

/// Standalone interchangeability predicate: same category, same unit, pack
/// size within the given tolerance. Pairs with an unknown pack size on
/// either side are always considered similar.
pub fn is_similar(a: &Item, b: &Item, pack_tolerance: f64) -> bool {
    same_category(a, b) && same_unit(a, b) && pack_within(a, b, pack_tolerance)
}
