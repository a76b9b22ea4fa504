use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::super::domain::FoodRecord;
use super::DietaryProfile;

/// Named admission rule applied to a single product.
pub trait ProductFilter {
    fn name(&self) -> &'static str;
    fn admits(&self, food: &FoodRecord) -> bool;
}

impl ProductFilter for DietaryProfile {
    fn name(&self) -> &'static str {
        "dietary_profile"
    }

    fn admits(&self, food: &FoodRecord) -> bool {
        if self.vegan {
            if !food.is_vegan() {
                return false;
            }
        } else if self.vegetarian && !food.is_vegetarian() {
            return false;
        }

        // Allergen tags win over any gluten-free label claim.
        if self.gluten_free && food.has_gluten_allergen() {
            return false;
        }

        true
    }
}

/// Single-select narrowing used by ad-hoc searches, independent of the profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LabelFilter {
    #[default]
    All,
    Vegan,
    Vegetarian,
    Organic,
    GlutenFree,
}

impl LabelFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            LabelFilter::All => "all",
            LabelFilter::Vegan => "vegan",
            LabelFilter::Vegetarian => "vegetarian",
            LabelFilter::Organic => "organic",
            LabelFilter::GlutenFree => "gluten-free",
        }
    }
}

impl ProductFilter for LabelFilter {
    fn name(&self) -> &'static str {
        match self {
            LabelFilter::All => "label_all",
            LabelFilter::Vegan => "label_vegan",
            LabelFilter::Vegetarian => "label_vegetarian",
            LabelFilter::Organic => "label_organic",
            LabelFilter::GlutenFree => "label_gluten_free",
        }
    }

    fn admits(&self, food: &FoodRecord) -> bool {
        match self {
            LabelFilter::All => true,
            LabelFilter::Vegan => food.is_vegan(),
            LabelFilter::Vegetarian => food.is_vegetarian(),
            LabelFilter::Organic => food.is_organic(),
            // Permissive by absence: no gluten allergen tag is enough on its own.
            LabelFilter::GlutenFree => food.is_labeled_gluten_free() || !food.has_gluten_allergen(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown label filter '{0}' (expected all, vegan, vegetarian, organic or gluten-free)")]
pub struct UnknownLabelFilter(pub String);

impl FromStr for LabelFilter {
    type Err = UnknownLabelFilter;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "" | "all" => Ok(LabelFilter::All),
            "vegan" => Ok(LabelFilter::Vegan),
            "vegetarian" => Ok(LabelFilter::Vegetarian),
            "organic" => Ok(LabelFilter::Organic),
            "gluten-free" | "glutenfree" => Ok(LabelFilter::GlutenFree),
            _ => Err(UnknownLabelFilter(value.to_string())),
        }
    }
}
