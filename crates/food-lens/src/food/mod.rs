//! Food health scoring, dietary-profile ranking, and healthier-alternative suggestions.
//!
//! Scoring and filtering are pure functions over [`FoodRecord`]s. The catalog and the
//! session store sit behind traits so the HTTP router can be exercised with in-memory
//! implementations.

pub mod catalog;
pub mod domain;
pub mod profile;
pub mod router;
pub mod scoring;
pub mod service;
pub mod session;
pub mod suggestions;

#[cfg(test)]
mod tests;

pub use catalog::{
    CandidateSet, CatalogError, CatalogImportError, InMemoryCatalog, ProductCatalog,
};
pub use domain::{
    AlternativeSuggestion, Barcode, FoodRecord, HealthScore, Nutrition, ScoreGrade,
};
pub use profile::{
    apply, apply_with, DietaryProfile, LabelFilter, ProductFilter, ProfileFlag, RankingMode,
    UnknownLabelFilter, UnknownProfileFlag,
};
pub use router::food_router;
pub use scoring::{
    compute, HealthAssessment, HealthScorer, ScoreAdjustment, ScoreDimension, ScoringRubric,
};
pub use service::{
    CandidateGroup, FoodLensService, FoodServiceError, ProductView, ScoredFood, SearchResults,
};
pub use session::{ProfileSession, ProfileStore, SessionError, SessionId};
pub use suggestions::{
    suggest, AlternativeStrategy, CategoryPeers, OrganicVariant, SuggestionGenerator,
};
