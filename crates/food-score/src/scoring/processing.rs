use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, error, warn};

use super::classifier::classify_ingredients;
use super::domain::{
    ClassifiedIngredient, Confidence, ProcessingLevel, ProcessingReason, ProcessingResult,
};
use super::normalizer::{contains_any_keyword, extract_best_ingredients_text};
use super::rules::RuleTables;
use super::seed_oil::estimate_seed_oil_calorie_ratio;

/// Seed-oil calorie share at which a product is graded L4 outright.
pub const SEED_OIL_DOMINANCE_RATIO: f64 = 0.10;
/// Seed-oil calorie share at which a product is graded at least L3.
pub const SEED_OIL_PRESENCE_RATIO: f64 = 0.02;

/// Grade processing intensity. Never fails: a panic anywhere in the cascade
/// is reported as `processing_error` with LOW confidence.
pub fn score_processing(
    ingredients: Option<&str>,
    name: &str,
    rules: &RuleTables,
) -> ProcessingResult {
    guarded(name, || evaluate_cascade(ingredients, name, rules))
}

pub(crate) fn guarded<F>(name: &str, cascade: F) -> ProcessingResult
where
    F: FnOnce() -> ProcessingResult,
{
    match panic::catch_unwind(AssertUnwindSafe(cascade)) {
        Ok(result) => result,
        Err(_) => {
            error!(product = name, "processing cascade panicked");
            ProcessingResult::processing_error()
        }
    }
}

/// First matching rule wins; the order of the checks below is the contract.
pub(crate) fn evaluate_cascade(
    ingredients: Option<&str>,
    name: &str,
    rules: &RuleTables,
) -> ProcessingResult {
    let Some(raw) = ingredients.filter(|text| !text.trim().is_empty()) else {
        return ProcessingResult::missing_ingredients();
    };

    let text = extract_best_ingredients_text(raw);
    let name = name.to_lowercase();

    // Calorie dominance is read before any keyword counting and skips
    // classification entirely when it fires.
    let seed_oil_ratio = estimate_seed_oil_calorie_ratio(&text);
    if seed_oil_ratio >= SEED_OIL_DOMINANCE_RATIO {
        debug!(seed_oil_ratio, "seed oil dominates calories");
        return ProcessingResult::graded(
            ProcessingLevel::L4,
            Confidence::High,
            ProcessingReason::IndustrialSeedOilCalorieDominance,
            Vec::new(),
            1.0,
        );
    }
    if seed_oil_ratio >= SEED_OIL_PRESENCE_RATIO {
        debug!(seed_oil_ratio, "seed oil present");
        return ProcessingResult::graded(
            ProcessingLevel::L3,
            Confidence::Medium,
            ProcessingReason::IndustrialSeedOilPresent,
            Vec::new(),
            0.5,
        );
    }

    let classified = classify_or_degrade(&text, rules);

    if contains_any_keyword(&text, &rules.processing.deep_fry_keywords) {
        return ProcessingResult::graded(
            ProcessingLevel::L4,
            Confidence::High,
            ProcessingReason::DeepFryRule,
            classified,
            1.0,
        );
    }

    if contains_any_keyword(&name, &rules.processing.identity_l2) {
        return ProcessingResult::graded(
            ProcessingLevel::L2,
            Confidence::Medium,
            ProcessingReason::IdentityRule,
            classified,
            0.0,
        );
    }

    let industrial_count = classified.iter().filter(|item| item.industrial).count();
    let ratio = if classified.is_empty() {
        0.0
    } else {
        industrial_count as f64 / classified.len() as f64
    };

    if classified.first().is_some_and(|first| first.industrial) {
        return ProcessingResult::graded(
            ProcessingLevel::L4,
            Confidence::High,
            ProcessingReason::FirstIngredientIndustrial,
            classified,
            ratio,
        );
    }

    if industrial_count > 0 || ratio >= rules.processing.threshold_dominant {
        return ProcessingResult::graded(
            ProcessingLevel::L4,
            Confidence::Medium,
            ProcessingReason::DominantIndustrial,
            classified,
            ratio,
        );
    }

    if ratio > 0.0 {
        return ProcessingResult::graded(
            ProcessingLevel::L3,
            Confidence::Medium,
            ProcessingReason::MinorIndustrial,
            classified,
            ratio,
        );
    }

    ProcessingResult::graded(
        ProcessingLevel::L2,
        Confidence::High,
        ProcessingReason::NaturalProcessing,
        classified,
        0.0,
    )
}

fn classify_or_degrade(text: &str, rules: &RuleTables) -> Vec<ClassifiedIngredient> {
    match classify_ingredients(text, &rules.ingredients) {
        Ok(classified) => classified,
        Err(err) => {
            warn!(error = %err, "ingredient classification degraded to empty");
            Vec::new()
        }
    }
}
