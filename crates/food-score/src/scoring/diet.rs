use std::collections::BTreeMap;

use super::domain::{DietAssessment, DietReason, DietResult};
use super::normalizer::{contains_any_keyword, extract_best_ingredients_text};
use super::rules::DietRules;

/// Keys owned by the diet result itself; flags may not shadow them.
const RESERVED_KEYS: [&str; 2] = ["score", "reason"];

/// Prohibited keywords are checked before discouraged ones; the first hit
/// decides the score.
pub fn score_diet(ingredients: Option<&str>, rules: &DietRules) -> DietResult {
    let Some(raw) = ingredients.filter(|text| !text.trim().is_empty()) else {
        return DietResult::new(DietReason::NoIngredients);
    };

    let text = extract_best_ingredients_text(raw);

    if contains_any_keyword(&text, &rules.prohibited) {
        return DietResult::new(DietReason::Prohibited);
    }

    if contains_any_keyword(&text, &rules.discouraged) {
        return DietResult::new(DietReason::Discouraged);
    }

    DietResult::new(DietReason::Allowed)
}

/// Lay the per-diet flags next to the result: table defaults first, then any
/// explicit flags carried by the product.
pub fn assess_diet(
    ingredients: Option<&str>,
    product_flags: Option<&BTreeMap<String, bool>>,
    rules: &DietRules,
) -> DietAssessment {
    let result = score_diet(ingredients, rules);

    let mut flags = rules.defaults.clone();
    if let Some(overrides) = product_flags {
        flags.extend(
            overrides
                .iter()
                .map(|(diet, compatible)| (diet.to_lowercase(), *compatible)),
        );
    }
    flags.retain(|diet, _| !RESERVED_KEYS.contains(&diet.as_str()));

    DietAssessment { result, flags }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::rules::default_diet_flags;

    fn rules() -> DietRules {
        DietRules {
            prohibited: vec!["sugar".to_string(), "wheat".to_string()],
            discouraged: vec!["rice".to_string()],
            defaults: default_diet_flags(),
        }
    }

    #[test]
    fn missing_ingredients_score_zero() {
        assert_eq!(
            score_diet(None, &rules()),
            DietResult {
                score: 0,
                reason: DietReason::NoIngredients
            }
        );
        assert_eq!(score_diet(Some("  "), &rules()).reason, DietReason::NoIngredients);
    }

    #[test]
    fn prohibited_short_circuits_discouraged() {
        let result = score_diet(Some("Brown Rice, Cane SUGAR"), &rules());
        assert_eq!(result.score, 0);
        assert_eq!(result.reason, DietReason::Prohibited);
    }

    #[test]
    fn discouraged_scores_half() {
        let result = score_diet(Some("rice, water"), &rules());
        assert_eq!(result.score, 50);
        assert_eq!(result.reason, DietReason::Discouraged);
    }

    #[test]
    fn clean_list_is_allowed() {
        let result = score_diet(Some("beef, salt"), &rules());
        assert_eq!(result.score, 100);
        assert_eq!(result.reason, DietReason::Allowed);
    }

    #[test]
    fn reads_english_record_of_structured_text() {
        let raw = "[{'lang': 'fr', 'text': 'Riz'}, {'lang': 'en', 'text': 'Wheat flour'}]";
        assert_eq!(score_diet(Some(raw), &rules()).reason, DietReason::Prohibited);
    }

    #[test]
    fn product_flags_override_defaults() {
        let overrides = BTreeMap::from([
            ("Vegan".to_string(), true),
            ("keto".to_string(), false),
            ("score".to_string(), true),
        ]);
        let assessment = assess_diet(Some("beef"), Some(&overrides), &rules());

        assert_eq!(assessment.flags.get("vegan"), Some(&true));
        assert_eq!(assessment.flags.get("keto"), Some(&false));
        assert_eq!(assessment.flags.get("paleo"), Some(&true));
        assert!(!assessment.flags.contains_key("score"));
        assert_eq!(assessment.result.score, 100);
    }

    #[test]
    fn assessment_serializes_flat() {
        let assessment = assess_diet(Some("rice"), None, &rules());
        let value = serde_json::to_value(&assessment).expect("serializes");
        assert_eq!(value["score"], 50);
        assert_eq!(value["reason"], "discouraged");
        assert_eq!(value["keto"], true);
        assert_eq!(value["carnivore"], false);
    }
}
