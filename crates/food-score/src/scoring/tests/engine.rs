use std::collections::BTreeMap;

use super::common::*;
use crate::scoring::{
    DietReason, Nutrition, ProcessingLevel, ProcessingReason, ProductRecord, ScoringEngine,
};

#[test]
fn scoring_is_idempotent() {
    let engine = engine();
    let record = product("granola", "oats, honey, corn syrup, emulsifier");

    assert_eq!(engine.score(&record), engine.score(&record));
}

#[test]
fn prohibited_ingredient_zeroes_score_whatever_the_processing() {
    let record = product("Sourdough Sweet Loaf", "flour, water, sugar, yeast");
    let result = engine().score(&record);

    assert_eq!(result.processing.reason, ProcessingReason::IdentityRule);
    assert_eq!(result.processing.level, Some(ProcessingLevel::L2));
    assert_eq!(result.diet.result.reason, DietReason::Prohibited);
    assert_eq!(result.final_score, 0);
}

#[test]
fn final_score_tracks_diet_not_macros() {
    let mut record = product("protein bar", "whey, rice crisps, honey");
    record.nutrition = Nutrition {
        protein: Some(40.0),
        sugar: Some(0.0),
        carbs: Some(5.0),
    };

    let result = engine().score(&record);
    assert_eq!(result.macros.score, 20);
    assert_eq!(result.diet.result.reason, DietReason::Discouraged);
    assert_eq!(result.final_score, 50);
}

#[test]
fn empty_record_still_yields_a_complete_result() {
    let result = engine().score(&ProductRecord::default());

    assert_eq!(result.processing.level, None);
    assert_eq!(result.processing.reason, ProcessingReason::MissingIngredients);
    assert_eq!(result.diet.result.reason, DietReason::NoIngredients);
    assert_eq!(result.final_score, 0);
    assert_eq!(result.macros.score, 0);
    assert_eq!(result.diet.flags.get("keto"), Some(&true));
    assert_eq!(result.diet.flags.get("vegan"), Some(&false));
}

#[test]
fn whitespace_ingredients_are_scored_as_missing() {
    let result = engine().score(&product("mystery", "  \n\t "));

    assert_eq!(result.processing.level, None);
    assert_eq!(result.processing.reason, ProcessingReason::MissingIngredients);
    assert_eq!(result.diet.result.reason, DietReason::NoIngredients);
    assert_eq!(result.final_score, 0);
}

#[test]
fn product_flags_override_table_defaults() {
    let mut record = product("tofu", "soybeans, water");
    record.diet_flags = Some(BTreeMap::from([
        ("Vegan".to_string(), true),
        ("score".to_string(), false),
    ]));

    let result = engine().score(&record);
    assert_eq!(result.diet.flags.get("vegan"), Some(&true));
    assert_eq!(result.diet.flags.get("paleo"), Some(&true));
    assert!(!result.diet.flags.contains_key("score"));
}

#[test]
fn clones_score_concurrently() {
    let engine = engine();
    let records = vec![
        product("bread", "flour, water, salt, yeast"),
        product("cola", "corn syrup, water"),
        product("crisps", "potatoes 70%, sunflower oil"),
        product("mystery", ""),
    ];
    let expected: Vec<_> = records.iter().map(|record| engine.score(record)).collect();

    std::thread::scope(|scope| {
        let handles: Vec<_> = records
            .iter()
            .map(|record| {
                let engine: ScoringEngine = engine.clone();
                scope.spawn(move || engine.score(record))
            })
            .collect();

        for (handle, expected) in handles.into_iter().zip(&expected) {
            assert_eq!(&handle.join().expect("scoring thread"), expected);
        }
    });
}

#[test]
fn serialized_result_uses_flat_diet_and_final_score_keys() {
    let result = engine().score(&product("bread", "flour, water, salt, yeast"));
    let value = serde_json::to_value(&result).expect("result serializes");

    assert_eq!(value["score"], 100);
    assert_eq!(value["diet"]["score"], 100);
    assert_eq!(value["diet"]["reason"], "allowed");
    assert_eq!(value["diet"]["keto"], true);
    assert_eq!(value["processing"]["level"], "L2");
    assert_eq!(value["processing"]["confidence"], "HIGH");
    assert_eq!(value["processing"]["reason"], "natural_processing");
    assert_eq!(value["processing"]["classified"][0]["name"], "flour");
    assert_eq!(value["macros"]["details"]["protein"], 0.0);
}
