use super::super::domain::FoodRecord;
use super::rubric::ScoringRubric;
use super::{ScoreAdjustment, ScoreDimension};

const SCORE_CEILING: i32 = 100;
const SCORE_CEILING_F64: f64 = 100.0;

fn clamp_score(score: i32) -> u8 {
    score.clamp(0, SCORE_CEILING) as u8
}

pub(crate) fn inflammation(food: &FoodRecord, rubric: &ScoringRubric) -> (u8, Vec<ScoreAdjustment>) {
    let mut adjustments = Vec::new();
    let mut score = rubric.base_score;

    for ingredient in &food.ingredients {
        let lowered = ingredient.to_lowercase();
        let matched = rubric
            .inflammatory_keywords
            .iter()
            .find(|keyword| lowered.contains(keyword.to_lowercase().as_str()));

        // One deduction per ingredient entry, however many keywords it contains.
        if let Some(keyword) = matched {
            score = score.saturating_sub(rubric.inflammatory_ingredient_penalty);
            adjustments.push(ScoreAdjustment {
                dimension: ScoreDimension::Inflammation,
                delta: -rubric.inflammatory_ingredient_penalty,
                notes: format!("ingredient '{ingredient}' matches inflammatory keyword '{keyword}'"),
            });
        }
    }

    let sugar = food.nutrition.sugar_or_zero();
    if sugar > rubric.high_sugar_threshold_g {
        score = score.saturating_sub(rubric.high_sugar_penalty);
        adjustments.push(ScoreAdjustment {
            dimension: ScoreDimension::Inflammation,
            delta: -rubric.high_sugar_penalty,
            notes: format!(
                "sugar {sugar:.1}g exceeds {:.1}g per 100g",
                rubric.high_sugar_threshold_g
            ),
        });
    }

    (clamp_score(score), adjustments)
}

pub(crate) fn gut_health(food: &FoodRecord, rubric: &ScoringRubric) -> (u8, Vec<ScoreAdjustment>) {
    let mut adjustments = Vec::new();
    let mut score = rubric.base_score;

    let fiber = food.nutrition.fiber_or_zero();
    if fiber > rubric.fiber_bonus_threshold_g {
        score = score.saturating_add(rubric.fiber_bonus);
        adjustments.push(ScoreAdjustment {
            dimension: ScoreDimension::GutHealth,
            delta: rubric.fiber_bonus,
            notes: format!(
                "fiber {fiber:.1}g exceeds {:.1}g per 100g",
                rubric.fiber_bonus_threshold_g
            ),
        });
    }

    if !food.additives.is_empty() {
        let penalty = additive_penalty(food.additives.len(), rubric.additive_gut_penalty);
        score = score.saturating_sub(penalty);
        adjustments.push(ScoreAdjustment {
            dimension: ScoreDimension::GutHealth,
            delta: -penalty,
            notes: format!("{} additive(s)", food.additives.len()),
        });
    }

    (clamp_score(score), adjustments)
}

pub(crate) fn nutrient_density(
    food: &FoodRecord,
    rubric: &ScoringRubric,
) -> (u8, Vec<ScoreAdjustment>) {
    let protein = food.nutrition.protein_or_zero();
    let fiber = food.nutrition.fiber_or_zero();

    let protein_score = (protein * rubric.protein_points_per_gram).min(SCORE_CEILING_F64);
    let fiber_score = (fiber * rubric.fiber_points_per_gram).min(SCORE_CEILING_F64);
    let density = ((protein_score + fiber_score) / 2.0).clamp(0.0, SCORE_CEILING_F64);

    let mut adjustments = Vec::new();
    if protein_score > 0.0 {
        adjustments.push(ScoreAdjustment {
            dimension: ScoreDimension::NutrientDensity,
            delta: (protein_score / 2.0).round() as i32,
            notes: format!("protein {protein:.1}g scores {protein_score:.0} of 100"),
        });
    }
    if fiber_score > 0.0 {
        adjustments.push(ScoreAdjustment {
            dimension: ScoreDimension::NutrientDensity,
            delta: (fiber_score / 2.0).round() as i32,
            notes: format!("fiber {fiber:.1}g scores {fiber_score:.0} of 100"),
        });
    }

    (density.round() as u8, adjustments)
}

pub(crate) fn processing(food: &FoodRecord, rubric: &ScoringRubric) -> (u8, Vec<ScoreAdjustment>) {
    let mut adjustments = Vec::new();
    let mut score = rubric.base_score;

    if !food.additives.is_empty() {
        let penalty = additive_penalty(food.additives.len(), rubric.additive_processing_penalty);
        score = score.saturating_sub(penalty);
        adjustments.push(ScoreAdjustment {
            dimension: ScoreDimension::Processing,
            delta: -penalty,
            notes: format!("{} additive(s)", food.additives.len()),
        });
    }

    let sodium = food.nutrition.sodium_or_zero();
    if sodium > rubric.high_sodium_threshold_mg {
        score = score.saturating_sub(rubric.high_sodium_penalty);
        adjustments.push(ScoreAdjustment {
            dimension: ScoreDimension::Processing,
            delta: -rubric.high_sodium_penalty,
            notes: format!(
                "sodium {sodium:.0}mg exceeds {:.0}mg per 100g",
                rubric.high_sodium_threshold_mg
            ),
        });
    }

    (clamp_score(score), adjustments)
}

fn additive_penalty(count: usize, per_additive: i32) -> i32 {
    i32::try_from(count)
        .unwrap_or(i32::MAX)
        .saturating_mul(per_additive)
}
