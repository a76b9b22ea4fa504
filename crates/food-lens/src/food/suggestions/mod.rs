mod strategies;

pub use strategies::{CategoryPeers, OrganicVariant};

use super::domain::{AlternativeSuggestion, FoodRecord};
use super::scoring::HealthScorer;

/// Source of substitutes for a product. Every suggestion's score must come from
/// the scorer handed in, computed on the record the suggestion describes.
pub trait AlternativeStrategy: Send + Sync {
    fn name(&self) -> &'static str;
    fn alternatives(&self, food: &FoodRecord, scorer: &HealthScorer) -> Vec<AlternativeSuggestion>;
}

/// Runs registered strategies in order and concatenates their suggestions.
pub struct SuggestionGenerator {
    scorer: HealthScorer,
    strategies: Vec<Box<dyn AlternativeStrategy>>,
}

impl SuggestionGenerator {
    pub fn new(scorer: HealthScorer) -> Self {
        Self {
            scorer,
            strategies: Vec::new(),
        }
    }

    /// One organic variant per product, scored with the standard rubric.
    pub fn standard() -> Self {
        Self::new(HealthScorer::standard()).with_strategy(OrganicVariant)
    }

    pub fn with_strategy<S>(mut self, strategy: S) -> Self
    where
        S: AlternativeStrategy + 'static,
    {
        self.strategies.push(Box::new(strategy));
        self
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|strategy| strategy.name()).collect()
    }

    pub fn suggest(&self, food: &FoodRecord) -> Vec<AlternativeSuggestion> {
        self.strategies
            .iter()
            .flat_map(|strategy| strategy.alternatives(food, &self.scorer))
            .collect()
    }
}

impl Default for SuggestionGenerator {
    fn default() -> Self {
        Self::standard()
    }
}

/// Suggestions from the standard generator.
pub fn suggest(food: &FoodRecord) -> Vec<AlternativeSuggestion> {
    SuggestionGenerator::standard().suggest(food)
}
