use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::super::domain::FoodRecord;
use super::DietaryProfile;

/// Ordering applied after filtering, chosen by the profile's health goals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingMode {
    /// Ascending sugar, ties broken by descending fiber.
    SugarThenFiber,
    /// Ascending sugar.
    Sugar,
    /// Descending fiber.
    Fiber,
    /// Input order.
    Preserve,
}

impl RankingMode {
    pub fn for_profile(profile: &DietaryProfile) -> Self {
        match (profile.low_sugar, profile.high_fiber) {
            (true, true) => RankingMode::SugarThenFiber,
            (true, false) => RankingMode::Sugar,
            (false, true) => RankingMode::Fiber,
            (false, false) => RankingMode::Preserve,
        }
    }

    /// Stable in-place sort; equal keys keep their relative input order.
    pub fn rank(&self, products: &mut [FoodRecord]) {
        match self {
            RankingMode::SugarThenFiber => products.sort_by(|a, b| {
                by_sugar_ascending(a, b).then_with(|| by_fiber_descending(a, b))
            }),
            RankingMode::Sugar => products.sort_by(by_sugar_ascending),
            RankingMode::Fiber => products.sort_by(by_fiber_descending),
            RankingMode::Preserve => {}
        }
    }
}

/// Missing sugar sorts last.
fn sugar_key(food: &FoodRecord) -> f64 {
    food.nutrition.reported_sugar().unwrap_or(f64::INFINITY)
}

/// Missing fiber counts as none.
fn fiber_key(food: &FoodRecord) -> f64 {
    food.nutrition.reported_fiber().unwrap_or(0.0)
}

fn by_sugar_ascending(a: &FoodRecord, b: &FoodRecord) -> Ordering {
    compare(sugar_key(a), sugar_key(b))
}

fn by_fiber_descending(a: &FoodRecord, b: &FoodRecord) -> Ordering {
    compare(fiber_key(b), fiber_key(a))
}

// Keys are finite or +inf after sanitizing, so partial_cmp always answers.
fn compare(left: f64, right: f64) -> Ordering {
    left.partial_cmp(&right).unwrap_or(Ordering::Equal)
}
