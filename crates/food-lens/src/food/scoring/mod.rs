mod rubric;
mod rules;

pub use rubric::ScoringRubric;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::domain::{FoodRecord, HealthScore};

/// Stateless scorer that applies a rubric to food records.
#[derive(Debug, Clone, Default)]
pub struct HealthScorer {
    rubric: ScoringRubric,
}

impl HealthScorer {
    pub fn new(rubric: ScoringRubric) -> Self {
        Self { rubric }
    }

    pub fn standard() -> Self {
        Self::new(ScoringRubric::standard())
    }

    pub fn rubric(&self) -> &ScoringRubric {
        &self.rubric
    }

    pub fn score(&self, food: &FoodRecord) -> HealthScore {
        self.assess(food).score
    }

    /// Scores the record and keeps every rule that moved a sub-score.
    pub fn assess(&self, food: &FoodRecord) -> HealthAssessment {
        let (inflammation, mut adjustments) = rules::inflammation(food, &self.rubric);
        let (gut_health, gut_adjustments) = rules::gut_health(food, &self.rubric);
        let (nutrient_density, density_adjustments) = rules::nutrient_density(food, &self.rubric);
        let (processing, processing_adjustments) = rules::processing(food, &self.rubric);

        adjustments.extend(gut_adjustments);
        adjustments.extend(density_adjustments);
        adjustments.extend(processing_adjustments);

        HealthAssessment {
            score: HealthScore::from_components(
                inflammation,
                gut_health,
                nutrient_density,
                processing,
            ),
            adjustments,
        }
    }

    /// Scores a page of records in parallel. Output order matches input order.
    pub fn score_batch(&self, foods: &[FoodRecord]) -> Vec<HealthScore> {
        foods.par_iter().map(|food| self.score(food)).collect()
    }
}

/// Scores a record with the standard rubric.
pub fn compute(food: &FoodRecord) -> HealthScore {
    HealthScorer::standard().score(food)
}

/// Sub-score a rule contributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreDimension {
    Inflammation,
    GutHealth,
    NutrientDensity,
    Processing,
}

/// Discrete contribution to a sub-score, kept for audits and display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreAdjustment {
    pub dimension: ScoreDimension,
    pub delta: i32,
    pub notes: String,
}

/// Score together with the adjustments that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthAssessment {
    pub score: HealthScore,
    pub adjustments: Vec<ScoreAdjustment>,
}

impl HealthAssessment {
    pub fn adjustments_for(&self, dimension: ScoreDimension) -> impl Iterator<Item = &ScoreAdjustment> {
        self.adjustments
            .iter()
            .filter(move |adjustment| adjustment.dimension == dimension)
    }
}
