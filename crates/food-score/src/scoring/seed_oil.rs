//! Calorie-weighted share of industrial seed oils.
//!
//! The estimate is a heuristic, not label arithmetic: declared percentages are
//! read as mass shares, fat is counted at 9 kcal/g and everything else at an
//! average 4 kcal/g. When the oil carries no declared percentage it is assumed
//! to make up the whole undeclared remainder, which overestimates products
//! with several unlabeled ingredients.

use regex::Regex;
use std::sync::OnceLock;

use super::domain::{clamp_unit, PercentageEntry};

pub const INDUSTRIAL_SEED_OILS: &[&str] = &[
    "sunflower oil",
    "soybean oil",
    "soy oil",
    "canola oil",
    "rapeseed oil",
    "corn oil",
    "maize oil",
    "cottonseed oil",
    "safflower oil",
    "grapeseed oil",
    "rice bran oil",
    "vegetable oil",
];

const FAT_KCAL_PER_GRAM: f64 = 9.0;
const OTHER_KCAL_PER_GRAM: f64 = 4.0;

static DECLARED_PERCENTAGE: OnceLock<Regex> = OnceLock::new();

fn declared_percentage_pattern() -> &'static Regex {
    DECLARED_PERCENTAGE.get_or_init(|| {
        Regex::new(r"([a-z0-9\s\-]+)\s(\d+(?:\.\d+)?)\s?%")
            .expect("declared percentage pattern is valid")
    })
}

pub fn mentions_seed_oil(text: &str) -> bool {
    INDUSTRIAL_SEED_OILS.iter().any(|oil| text.contains(oil))
}

/// Declared `<name> NN[.N]%` tokens in lowercase ingredient text.
pub fn parse_declared_percentages(text: &str) -> Vec<PercentageEntry> {
    declared_percentage_pattern()
        .captures_iter(text)
        .filter_map(|captures| {
            let name = captures.get(1)?.as_str().trim();
            let pct = captures.get(2)?.as_str().parse::<f64>().ok()?;
            if name.is_empty() || !(0.0..=100.0).contains(&pct) {
                return None;
            }
            Some(PercentageEntry {
                name: name.to_string(),
                pct,
            })
        })
        .collect()
}

/// Fraction of estimated product calories attributable to seed oils, in [0, 1].
pub fn estimate_seed_oil_calorie_ratio(text: &str) -> f64 {
    let text = text.to_lowercase();
    if !mentions_seed_oil(&text) {
        return 0.0;
    }

    let declared = parse_declared_percentages(&text);
    let declared_total: f64 = declared.iter().map(|entry| entry.pct).sum();
    let remainder = (100.0 - declared_total).max(0.0);

    let oil_share = declared
        .iter()
        .find(|entry| mentions_seed_oil(&entry.name))
        .map(|entry| entry.pct)
        .unwrap_or(remainder);

    if !oil_share.is_finite() || oil_share <= 0.0 {
        return 0.0;
    }

    let oil_calories = oil_share * FAT_KCAL_PER_GRAM;
    let other_calories = (100.0 - oil_share) * OTHER_KCAL_PER_GRAM;
    clamp_unit(oil_calories / (oil_calories + other_calories))
}
