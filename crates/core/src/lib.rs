pub mod config;
pub mod domain;
pub mod errors;
pub mod recommend;

pub use config::{ConfigError, EngineConfig, LoadOptions};
pub use domain::cart::{cart_totals, CartLine, CartTotals};
pub use domain::item::Item;
pub use errors::{validate_budget, validate_target_id, DomainError};
pub use recommend::{
    build_category_norms, is_similar, optimize_cart, recommend, recommend_for_item, score_item,
    similar_candidates, suggest_for_cart, AttributeRange, CartSuggestions, CategoryNorms,
    ItemScore, OptimizeMode, OptimizeOutcome, OptimizedItem, SubstituteSummary, SuggestMode,
    Weights, DEFAULT_MAX_RESULTS, DEFAULT_WEIGHTS, SUGGESTIONS_PER_ITEM,
};
