use std::sync::Arc;

use super::super::domain::{AlternativeSuggestion, FoodRecord};
use super::super::scoring::HealthScorer;
use super::AlternativeStrategy;

const ORGANIC_REASON: &str = "Organic version with fewer additives";

/// Proposes the same product as an organic, additive-free variant.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrganicVariant;

impl OrganicVariant {
    pub fn derive(food: &FoodRecord) -> FoodRecord {
        let mut variant = food.clone();
        variant.name = format!("Organic {}", food.name);
        variant.additives.clear();
        // Only the first occurrence per ingredient is rewritten.
        variant.ingredients = food
            .ingredients
            .iter()
            .map(|ingredient| ingredient.replacen("conventional", "organic", 1))
            .collect();
        variant
    }
}

impl AlternativeStrategy for OrganicVariant {
    fn name(&self) -> &'static str {
        "organic_variant"
    }

    fn alternatives(&self, food: &FoodRecord, scorer: &HealthScorer) -> Vec<AlternativeSuggestion> {
        let variant = Self::derive(food);
        vec![AlternativeSuggestion {
            health_score: scorer.score(&variant),
            name: variant.name,
            reason: ORGANIC_REASON.to_string(),
        }]
    }
}

/// Recommends better-scoring products from the same category of a catalog snapshot.
#[derive(Debug, Clone)]
pub struct CategoryPeers {
    products: Arc<Vec<FoodRecord>>,
    limit: usize,
}

impl CategoryPeers {
    pub fn new(products: Arc<Vec<FoodRecord>>, limit: usize) -> Self {
        Self { products, limit }
    }
}

impl AlternativeStrategy for CategoryPeers {
    fn name(&self) -> &'static str {
        "category_peers"
    }

    fn alternatives(&self, food: &FoodRecord, scorer: &HealthScorer) -> Vec<AlternativeSuggestion> {
        let category = food.category.trim();
        if category.is_empty() || self.limit == 0 {
            return Vec::new();
        }

        let baseline = scorer.score(food).overall;
        let mut peers: Vec<_> = self
            .products
            .iter()
            .filter(|peer| peer.barcode != food.barcode)
            .filter(|peer| peer.category.trim().eq_ignore_ascii_case(category))
            .map(|peer| (peer, scorer.score(peer)))
            .filter(|(_, score)| score.overall > baseline)
            .collect();

        peers.sort_by(|(_, left), (_, right)| right.overall.cmp(&left.overall));

        peers
            .into_iter()
            .take(self.limit)
            .map(|(peer, score)| AlternativeSuggestion {
                name: peer.name.clone(),
                health_score: score,
                reason: format!("Higher scoring {} option", category.to_lowercase()),
            })
            .collect()
    }
}
