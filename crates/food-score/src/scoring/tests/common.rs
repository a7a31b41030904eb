use axum::response::Response;
use serde_json::Value;

use crate::scoring::rules::default_diet_flags;
use crate::scoring::{
    DietRules, IngredientRule, Nutrition, ProcessingRules, ProductRecord, RuleTables,
    ScoringEngine,
};

pub(super) fn ingredient_rules() -> Vec<IngredientRule> {
    vec![
        IngredientRule::new("corn syrup", true, "sweetener"),
        IngredientRule::new("palm oil", true, "fat"),
        IngredientRule::new("emulsifier", true, "additive"),
        IngredientRule::new("flour", false, "grain"),
        IngredientRule::new("sugar", false, "sweetener"),
        IngredientRule::new("water", false, "water"),
        IngredientRule::new("salt", false, "seasoning"),
        IngredientRule::new("yeast", false, "leavening"),
    ]
}

pub(super) fn diet_rules() -> DietRules {
    DietRules {
        prohibited: vec!["sugar".to_string(), "corn syrup".to_string()],
        discouraged: vec!["rice".to_string(), "honey".to_string()],
        defaults: default_diet_flags(),
    }
}

pub(super) fn processing_rules() -> ProcessingRules {
    ProcessingRules {
        deep_fry_keywords: vec!["fried".to_string()],
        identity_l2: vec!["sourdough".to_string(), "kimchi".to_string()],
        threshold_dominant: 0.3,
    }
}

pub(super) fn rule_tables() -> RuleTables {
    RuleTables::new(ingredient_rules(), diet_rules(), processing_rules())
        .expect("synthetic rule tables are valid")
}

pub(super) fn engine() -> ScoringEngine {
    ScoringEngine::new(rule_tables())
}

pub(super) fn product(name: &str, ingredients: &str) -> ProductRecord {
    ProductRecord {
        barcode: "4006381333931".to_string(),
        name: name.to_string(),
        ingredients: Some(ingredients.to_string()),
        nutrition: Nutrition::default(),
        diet_flags: None,
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
