use std::sync::Arc;

use super::common::*;
use crate::food::domain::FoodRecord;
use crate::food::scoring::{compute, HealthScorer};
use crate::food::suggestions::{
    suggest, AlternativeStrategy, CategoryPeers, OrganicVariant, SuggestionGenerator,
};

#[test]
fn organic_variant_drops_additives_and_renames() {
    let suggestions = suggest(&chips());

    assert_eq!(suggestions.len(), 1);
    let organic = &suggestions[0];
    assert_eq!(organic.name, "Organic Processed Snack Chips");
    assert_eq!(organic.reason, "Organic version with fewer additives");
    // Additive penalties vanish; the vegetable oil deduction remains.
    assert_eq!(organic.health_score.gut_health, 100);
    assert_eq!(organic.health_score.processing, 100);
    assert_eq!(organic.health_score.inflammation, 80);
}

#[test]
fn organic_variant_score_is_computed_on_the_variant() {
    let mut record = chips();
    record.ingredients = strings(&["conventional corn", "conventional conventional oats"]);

    let variant = OrganicVariant::derive(&record);
    assert_eq!(variant.ingredients, vec!["organic corn", "organic conventional oats"]);
    assert!(variant.additives.is_empty());

    let suggestion = &suggest(&record)[0];
    assert_eq!(suggestion.health_score, compute(&variant));
}

#[test]
fn generator_runs_strategies_in_order() {
    let peers = Arc::new(sample_catalog().records().to_vec());
    let generator = SuggestionGenerator::standard().with_strategy(CategoryPeers::new(peers, 2));

    assert_eq!(generator.strategy_names(), vec!["organic_variant", "category_peers"]);

    let honey = sample_catalog()
        .records()
        .iter()
        .find(|food| food.name == "Honey Clusters")
        .cloned()
        .expect("sample has honey clusters");
    let suggestions = generator.suggest(&honey);

    assert_eq!(suggestions[0].name, "Organic Honey Clusters");
    assert_eq!(suggestions.len(), 3);
    assert!(suggestions[1..]
        .iter()
        .all(|suggestion| suggestion.reason == "Higher scoring breakfast cereals option"));
}

#[test]
fn category_peers_only_offer_better_scores() {
    let catalog = sample_catalog();
    let strategy = CategoryPeers::new(catalog.snapshot(), 5);
    let scorer = HealthScorer::standard();

    let oats = catalog
        .records()
        .iter()
        .find(|food| food.name == "Plain Oats")
        .cloned()
        .expect("sample has oats");
    let baseline = scorer.score(&oats).overall;

    let peers = strategy.alternatives(&oats, &scorer);
    assert!(peers
        .iter()
        .all(|peer| peer.health_score.overall > baseline && peer.name != oats.name));
    assert!(peers
        .windows(2)
        .all(|pair| pair[0].health_score.overall >= pair[1].health_score.overall));
}

#[test]
fn category_peers_skip_uncategorized_products() {
    let strategy = CategoryPeers::new(Arc::new(vec![quinoa()]), 3);
    let uncategorized = FoodRecord::new("9", "Loose Item");

    assert!(strategy
        .alternatives(&uncategorized, &HealthScorer::standard())
        .is_empty());
}

#[test]
fn empty_generator_suggests_nothing() {
    let generator = SuggestionGenerator::new(HealthScorer::standard());
    assert!(generator.suggest(&chips()).is_empty());
}
