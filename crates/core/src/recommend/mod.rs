//! Substitute Recommendation Engine
//!
//! Ranks cheaper and more sustainable substitutes for a reference item and
//! assembles budget-constrained carts. Pure computation over in-memory item
//! records; catalog retrieval belongs to the calling layer.

mod engine;
mod normalize;
mod optimizer;
mod scoring;
mod similarity;
mod suggest;

pub use engine::{recommend, recommend_for_item, SubstituteSummary};
pub use normalize::{build_category_norms, AttributeRange, CategoryNorms, Weights};
pub use optimizer::{optimize_cart, OptimizeMode, OptimizeOutcome, OptimizedItem};
pub use scoring::{score_item, ItemScore};
pub use similarity::{is_similar, similar_candidates, SimilarityTier, FALLBACK_TIERS};
pub use suggest::{suggest_for_cart, CartSuggestions, SuggestMode};

/// Default weighting when the caller supplies none: price-leaning balanced.
pub const DEFAULT_WEIGHTS: Weights =
    Weights { price: 0.4, co2: 0.3, health: 0.2, social: 0.1 };

/// Default number of substitutes returned by a single-item recommendation.
pub const DEFAULT_MAX_RESULTS: usize = 6;

/// Cap on the candidate pool produced by any similarity tier, keeping
/// downstream scoring cheap.
pub const CANDIDATE_POOL_CAP: usize = 200;

/// Substitutes kept per cart line when building the optimizer's option sets.
pub const SUBSTITUTES_PER_LINE: usize = 4;

/// Default length of each per-product list in a cart-wide suggestion run.
pub const SUGGESTIONS_PER_ITEM: usize = 3;

/// Pack-size tolerance for the strict similarity tier and the standalone
/// predicate.
pub const STRICT_PACK_TOLERANCE: f64 = 0.3;

/// Widened pack-size tolerance for the relaxed similarity tier.
pub const RELAXED_PACK_TOLERANCE: f64 = 0.5;
