//! Processing, diet, and macro scoring for a single product record.

pub mod batch;
mod classifier;
mod diet;
pub mod domain;
mod macro_profile;
mod normalizer;
pub mod off;
mod processing;
pub mod router;
pub mod rules;
mod seed_oil;

#[cfg(test)]
mod tests;

pub use batch::{score_csv, BatchEntry, BatchError};
pub use classifier::{classify_ingredients, split_ingredients, ClassificationError};
pub use diet::{assess_diet, score_diet};
pub use domain::{
    ClassifiedIngredient, Confidence, DietAssessment, DietReason, DietResult, MacroDetails,
    MacroResult, Nutrition, PercentageEntry, ProcessingLevel, ProcessingReason, ProcessingResult,
    ProductRecord, ScoringResult,
};
pub use macro_profile::score_macros;
pub use normalizer::extract_best_ingredients_text;
pub use off::{normalize_barcode, OpenFoodFactsProduct};
pub use processing::{score_processing, SEED_OIL_DOMINANCE_RATIO, SEED_OIL_PRESENCE_RATIO};
pub use router::scan_router;
pub use rules::{DietRules, IngredientRule, ProcessingRules, RuleTableError, RuleTables};
pub use seed_oil::{estimate_seed_oil_calorie_ratio, parse_declared_percentages, INDUSTRIAL_SEED_OILS};

use std::sync::Arc;

/// Stateless scorer over a shared, read-only rule set. Cloning is cheap and
/// clones may score concurrently.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    rules: Arc<RuleTables>,
}

impl ScoringEngine {
    pub fn new(rules: RuleTables) -> Self {
        Self {
            rules: Arc::new(rules),
        }
    }

    pub fn rules(&self) -> &RuleTables {
        &self.rules
    }

    /// Score a product. Total: any record, however incomplete, yields a full
    /// result. The final score is the diet score.
    pub fn score(&self, product: &ProductRecord) -> ScoringResult {
        let ingredients = product.ingredient_text();
        let name = product.name.as_str();

        let processing = score_processing(ingredients, name, &self.rules);
        let diet = assess_diet(ingredients, product.diet_flags.as_ref(), &self.rules.diet);
        let macros = score_macros(&product.nutrition);

        ScoringResult {
            final_score: diet.result.score,
            processing,
            diet,
            macros,
        }
    }
}
