//! Dietary profiles and the filter/rank pipeline applied to candidate lists.
//!
//! The profile is always passed in explicitly; nothing here reads shared state.
//! Two gluten rules exist side by side as separate strategies: the profile veto excludes
//! any product with a gluten allergen tag even when it is labeled gluten-free,
//! while [`LabelFilter::GlutenFree`] admits a product that is either labeled
//! gluten-free or simply carries no gluten allergen tag. The two disagree for a
//! labeled product with a conflicting allergen tag; both behaviors are kept.

mod filters;
mod ranking;

pub use filters::{LabelFilter, ProductFilter, UnknownLabelFilter};
pub use ranking::RankingMode;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::catalog::CandidateSet;
use super::domain::FoodRecord;

/// Boolean preference set for one user session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct DietaryProfile {
    pub vegetarian: bool,
    pub vegan: bool,
    pub gluten_free: bool,
    pub high_fiber: bool,
    pub low_sugar: bool,
    pub omega3_focus: bool,
}

impl DietaryProfile {
    pub fn is_set(&self, flag: ProfileFlag) -> bool {
        match flag {
            ProfileFlag::Vegetarian => self.vegetarian,
            ProfileFlag::Vegan => self.vegan,
            ProfileFlag::GlutenFree => self.gluten_free,
            ProfileFlag::HighFiber => self.high_fiber,
            ProfileFlag::LowSugar => self.low_sugar,
            ProfileFlag::Omega3Focus => self.omega3_focus,
        }
    }

    /// Flips a single flag, leaving the others untouched.
    pub fn toggle(&mut self, flag: ProfileFlag) {
        let slot = match flag {
            ProfileFlag::Vegetarian => &mut self.vegetarian,
            ProfileFlag::Vegan => &mut self.vegan,
            ProfileFlag::GlutenFree => &mut self.gluten_free,
            ProfileFlag::HighFiber => &mut self.high_fiber,
            ProfileFlag::LowSugar => &mut self.low_sugar,
            ProfileFlag::Omega3Focus => &mut self.omega3_focus,
        };
        *slot = !*slot;
    }

    /// Toggles by flag name. Names the engine does not know are ignored.
    pub fn toggle_named(&mut self, name: &str) -> Option<ProfileFlag> {
        let flag = name.parse::<ProfileFlag>().ok()?;
        self.toggle(flag);
        Some(flag)
    }

    pub fn with(mut self, flag: ProfileFlag) -> Self {
        if !self.is_set(flag) {
            self.toggle(flag);
        }
        self
    }

    pub fn active_flags(&self) -> Vec<ProfileFlag> {
        ProfileFlag::ALL
            .into_iter()
            .filter(|flag| self.is_set(*flag))
            .collect()
    }

    pub fn ranking_mode(&self) -> RankingMode {
        RankingMode::for_profile(self)
    }

    /// Curated candidate sets worth requesting upstream for the active health goals.
    pub fn candidate_sets(&self) -> Vec<CandidateSet> {
        let mut sets = Vec::new();
        if self.high_fiber {
            sets.push(CandidateSet::HighFiber);
        }
        if self.low_sugar {
            sets.push(CandidateSet::LowSugar);
        }
        if self.omega3_focus {
            sets.push(CandidateSet::Omega3);
        }
        sets
    }
}

/// Individual profile switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProfileFlag {
    Vegetarian,
    Vegan,
    #[serde(alias = "gluten_free", alias = "gluten-free")]
    GlutenFree,
    #[serde(alias = "high_fiber", alias = "high-fiber")]
    HighFiber,
    #[serde(alias = "low_sugar", alias = "low-sugar")]
    LowSugar,
    #[serde(alias = "omega3_focus", alias = "omega3-focus", alias = "omega3")]
    Omega3Focus,
}

impl ProfileFlag {
    pub const ALL: [ProfileFlag; 6] = [
        ProfileFlag::Vegetarian,
        ProfileFlag::Vegan,
        ProfileFlag::GlutenFree,
        ProfileFlag::HighFiber,
        ProfileFlag::LowSugar,
        ProfileFlag::Omega3Focus,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ProfileFlag::Vegetarian => "Vegetarian",
            ProfileFlag::Vegan => "Vegan",
            ProfileFlag::GlutenFree => "Gluten-Free",
            ProfileFlag::HighFiber => "Increase Fiber",
            ProfileFlag::LowSugar => "Reduce Sugar",
            ProfileFlag::Omega3Focus => "Omega-3 Focus",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown profile flag '{0}'")]
pub struct UnknownProfileFlag(pub String);

impl FromStr for ProfileFlag {
    type Err = UnknownProfileFlag;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let key: String = value
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();

        match key.as_str() {
            "vegetarian" => Ok(ProfileFlag::Vegetarian),
            "vegan" => Ok(ProfileFlag::Vegan),
            "glutenfree" => Ok(ProfileFlag::GlutenFree),
            "highfiber" => Ok(ProfileFlag::HighFiber),
            "lowsugar" => Ok(ProfileFlag::LowSugar),
            "omega3" | "omega3focus" => Ok(ProfileFlag::Omega3Focus),
            _ => Err(UnknownProfileFlag(value.to_string())),
        }
    }
}

impl fmt::Display for ProfileFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Filters and orders `products` for `profile`, returning a new list.
pub fn apply(products: &[FoodRecord], profile: &DietaryProfile) -> Vec<FoodRecord> {
    apply_with(products, profile, |_| true)
}

/// Same pipeline as [`apply`] with an additional caller predicate that must also admit
/// each product. Filtering happens before ranking.
pub fn apply_with<F>(products: &[FoodRecord], profile: &DietaryProfile, predicate: F) -> Vec<FoodRecord>
where
    F: Fn(&FoodRecord) -> bool,
{
    let snapshot = *profile;
    let mut kept: Vec<FoodRecord> = products
        .iter()
        .filter(|food| snapshot.admits(food) && predicate(food))
        .cloned()
        .collect();

    snapshot.ranking_mode().rank(&mut kept);
    kept
}
