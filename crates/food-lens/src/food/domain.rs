use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

pub const VEGAN_TAG: &str = "en:vegan";
pub const VEGETARIAN_TAG: &str = "en:vegetarian";
pub const ORGANIC_LABEL: &str = "en:organic";
pub const GLUTEN_FREE_LABEL: &str = "en:gluten-free";

/// Any allergen tag containing this fragment marks the product as carrying gluten.
pub const GLUTEN_ALLERGEN_FRAGMENT: &str = "gluten";

/// Identifier wrapper for catalog products. The barcode doubles as the record id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Barcode(pub String);

impl Barcode {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Barcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Per-100g nutrition facts. Sodium is expressed in milligrams, every other
/// quantity in grams (calories in kcal). `None` means the catalog did not report
/// the value, which is not the same thing as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Nutrition {
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
    pub fiber: Option<f64>,
    pub sugar: Option<f64>,
    pub sodium: Option<f64>,
}

impl Nutrition {
    /// Drops negative and non-finite readings so every present value is a usable quantity.
    pub fn sanitized(self) -> Self {
        Self {
            calories: sanitize(self.calories),
            protein: sanitize(self.protein),
            carbs: sanitize(self.carbs),
            fat: sanitize(self.fat),
            fiber: sanitize(self.fiber),
            sugar: sanitize(self.sugar),
            sodium: sanitize(self.sodium),
        }
    }

    pub fn reported_sugar(&self) -> Option<f64> {
        sanitize(self.sugar)
    }

    pub fn reported_fiber(&self) -> Option<f64> {
        sanitize(self.fiber)
    }

    pub fn protein_or_zero(&self) -> f64 {
        sanitize(self.protein).unwrap_or(0.0)
    }

    pub fn fiber_or_zero(&self) -> f64 {
        sanitize(self.fiber).unwrap_or(0.0)
    }

    pub fn sugar_or_zero(&self) -> f64 {
        sanitize(self.sugar).unwrap_or(0.0)
    }

    pub fn sodium_or_zero(&self) -> f64 {
        sanitize(self.sodium).unwrap_or(0.0)
    }
}

fn sanitize(value: Option<f64>) -> Option<f64> {
    value.filter(|amount| amount.is_finite() && *amount >= 0.0)
}

/// Canonical, catalog-independent view of a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodRecord {
    pub barcode: Barcode,
    pub name: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub additives: Vec<String>,
    #[serde(default)]
    pub allergen_tags: BTreeSet<String>,
    #[serde(default)]
    pub diet_tags: BTreeSet<String>,
    #[serde(default)]
    pub label_tags: BTreeSet<String>,
    #[serde(default)]
    pub nutrition: Nutrition,
}

impl FoodRecord {
    /// Bare record with display strings only; collections empty, nutrition unknown.
    pub fn new(barcode: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            barcode: Barcode::new(barcode),
            name: name.into(),
            brand: String::new(),
            category: String::new(),
            ingredients: Vec::new(),
            additives: Vec::new(),
            allergen_tags: BTreeSet::new(),
            diet_tags: BTreeSet::new(),
            label_tags: BTreeSet::new(),
            nutrition: Nutrition::default(),
        }
    }

    pub fn is_vegan(&self) -> bool {
        self.diet_tags.contains(VEGAN_TAG)
    }

    /// A vegan tag satisfies the vegetarian requirement.
    pub fn is_vegetarian(&self) -> bool {
        self.diet_tags.contains(VEGETARIAN_TAG) || self.is_vegan()
    }

    pub fn is_organic(&self) -> bool {
        self.label_tags.contains(ORGANIC_LABEL)
    }

    pub fn is_labeled_gluten_free(&self) -> bool {
        self.label_tags.contains(GLUTEN_FREE_LABEL)
    }

    pub fn has_gluten_allergen(&self) -> bool {
        self.allergen_tags
            .iter()
            .any(|tag| tag.contains(GLUTEN_ALLERGEN_FRAGMENT))
    }
}

/// Five-dimension health assessment, each value within `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthScore {
    pub overall: u8,
    pub inflammation: u8,
    pub gut_health: u8,
    pub nutrient_density: u8,
    pub processing: u8,
}

impl HealthScore {
    /// Builds a score whose overall value is the rounded mean of the four sub-scores.
    pub fn from_components(
        inflammation: u8,
        gut_health: u8,
        nutrient_density: u8,
        processing: u8,
    ) -> Self {
        let sum = u32::from(inflammation)
            + u32::from(gut_health)
            + u32::from(nutrient_density)
            + u32::from(processing);
        let overall = (f64::from(sum) / 4.0).round() as u8;

        Self {
            overall,
            inflammation,
            gut_health,
            nutrient_density,
            processing,
        }
    }

    pub fn grade(&self) -> ScoreGrade {
        match self.overall {
            80..=u8::MAX => ScoreGrade::A,
            60..=79 => ScoreGrade::B,
            40..=59 => ScoreGrade::C,
            20..=39 => ScoreGrade::D,
            _ => ScoreGrade::E,
        }
    }
}

/// Letter band derived from the overall score for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreGrade {
    A,
    B,
    C,
    D,
    E,
}

impl ScoreGrade {
    pub fn label(&self) -> &'static str {
        match self {
            ScoreGrade::A => "A",
            ScoreGrade::B => "B",
            ScoreGrade::C => "C",
            ScoreGrade::D => "D",
            ScoreGrade::E => "E",
        }
    }
}

/// Substitute proposed for a product; the score belongs to the alternative itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternativeSuggestion {
    pub name: String,
    pub health_score: HealthScore,
    pub reason: String,
}
