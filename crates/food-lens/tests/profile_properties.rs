//! Property-based checks for the dietary profile pipeline.

use food_lens::food::profile::{apply, apply_with, DietaryProfile};
use food_lens::food::FoodRecord;
use proptest::prelude::*;

const DIET_TAGS: &[&str] = &["en:vegan", "en:vegetarian", "en:non-vegan", "en:palm-oil-free"];
const ALLERGENS: &[&str] = &["en:gluten", "en:milk", "en:nuts", "en:soybeans"];
const LABELS: &[&str] = &["en:organic", "en:gluten-free", "en:fair-trade"];

fn tags(pool: &'static [&'static str]) -> impl Strategy<Value = Vec<String>> {
    prop::sample::subsequence(pool, 0..=pool.len())
        .prop_map(|picked| picked.into_iter().map(str::to_string).collect())
}

fn product(index: usize) -> impl Strategy<Value = FoodRecord> {
    (
        tags(DIET_TAGS),
        tags(ALLERGENS),
        tags(LABELS),
        prop::option::weighted(0.8, 0.0f64..40.0),
        prop::option::weighted(0.8, 0.0f64..20.0),
    )
        .prop_map(move |(diet, allergens, labels, sugar, fiber)| {
            let mut record = FoodRecord::new(format!("{index:013}"), format!("Product {index}"));
            record.diet_tags.extend(diet);
            record.allergen_tags.extend(allergens);
            record.label_tags.extend(labels);
            // Whole grams keep sugar ties frequent.
            record.nutrition.sugar = sugar.map(f64::floor);
            record.nutrition.fiber = fiber;
            record
        })
}

fn products() -> impl Strategy<Value = Vec<FoodRecord>> {
    (0usize..24).prop_flat_map(|count| (0..count).map(product).collect::<Vec<_>>())
}

fn profile() -> impl Strategy<Value = DietaryProfile> {
    any::<[bool; 6]>().prop_map(
        |[vegetarian, vegan, gluten_free, high_fiber, low_sugar, omega3_focus]| DietaryProfile {
            vegetarian,
            vegan,
            gluten_free,
            high_fiber,
            low_sugar,
            omega3_focus,
        },
    )
}

fn sugar_key(food: &FoodRecord) -> f64 {
    food.nutrition.sugar.unwrap_or(f64::INFINITY)
}

fn fiber_key(food: &FoodRecord) -> f64 {
    food.nutrition.fiber.unwrap_or(0.0)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn vegan_profiles_only_return_vegan_products(products in products(), profile in profile()) {
        let profile = DietaryProfile { vegan: true, ..profile };
        for food in apply(&products, &profile) {
            prop_assert!(food.is_vegan(), "{} slipped through", food.name);
        }
    }

    #[test]
    fn gluten_free_profiles_drop_gluten_allergens(products in products(), profile in profile()) {
        let profile = DietaryProfile { gluten_free: true, ..profile };
        for food in apply(&products, &profile) {
            prop_assert!(!food.has_gluten_allergen(), "{} slipped through", food.name);
        }
    }

    #[test]
    fn combined_goals_order_by_sugar_then_fiber(products in products(), profile in profile()) {
        let profile = DietaryProfile { low_sugar: true, high_fiber: true, ..profile };
        let ranked = apply(&products, &profile);
        for pair in ranked.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            prop_assert!(
                sugar_key(a) < sugar_key(b)
                    || (sugar_key(a) == sugar_key(b) && fiber_key(a) >= fiber_key(b)),
                "{} before {}", a.name, b.name
            );
        }
    }

    #[test]
    fn no_ranking_goal_keeps_input_order(products in products(), profile in profile()) {
        let profile = DietaryProfile {
            low_sugar: false,
            high_fiber: false,
            vegetarian: false,
            vegan: false,
            gluten_free: false,
            ..profile
        };
        prop_assert_eq!(apply_with(&products, &profile, |_| true), products);
    }

    #[test]
    fn output_is_a_subset_of_input(products in products(), profile in profile()) {
        let kept = apply(&products, &profile);
        prop_assert!(kept.len() <= products.len());
        for food in &kept {
            prop_assert!(products.contains(food));
        }
    }
}
