use serde::{Deserialize, Serialize};

/// Constants driving the sub-score arithmetic. Thresholds are exclusive: a value
/// must be strictly greater than the threshold for the rule to fire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringRubric {
    pub base_score: i32,
    pub inflammatory_keywords: Vec<String>,
    pub inflammatory_ingredient_penalty: i32,
    pub high_sugar_threshold_g: f64,
    pub high_sugar_penalty: i32,
    pub fiber_bonus_threshold_g: f64,
    pub fiber_bonus: i32,
    pub additive_gut_penalty: i32,
    pub additive_processing_penalty: i32,
    pub protein_points_per_gram: f64,
    pub fiber_points_per_gram: f64,
    pub high_sodium_threshold_mg: f64,
    pub high_sodium_penalty: i32,
}

impl ScoringRubric {
    pub fn standard() -> Self {
        Self {
            base_score: 100,
            inflammatory_keywords: vec![
                "sugar".to_string(),
                "high fructose corn syrup".to_string(),
                "vegetable oil".to_string(),
                "soybean oil".to_string(),
            ],
            inflammatory_ingredient_penalty: 20,
            high_sugar_threshold_g: 10.0,
            high_sugar_penalty: 15,
            fiber_bonus_threshold_g: 5.0,
            fiber_bonus: 20,
            additive_gut_penalty: 10,
            additive_processing_penalty: 10,
            protein_points_per_gram: 10.0,
            fiber_points_per_gram: 20.0,
            high_sodium_threshold_mg: 500.0,
            high_sodium_penalty: 20,
        }
    }
}

impl Default for ScoringRubric {
    fn default() -> Self {
        Self::standard()
    }
}
