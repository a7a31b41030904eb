use super::domain::{MacroDetails, MacroResult, Nutrition};

const MAX_SCORE: i32 = 100;

/// Informational macro score. Missing values count as zero.
pub fn score_macros(nutrition: &Nutrition) -> MacroResult {
    let details = MacroDetails {
        protein: grams(nutrition.protein),
        sugar: grams(nutrition.sugar),
        carbs: grams(nutrition.carbs),
    };

    let mut score: i32 = 0;

    if details.protein >= 15.0 {
        score += 20;
    } else if details.protein >= 10.0 {
        score += 10;
    }

    if details.sugar > 10.0 {
        score -= 30;
    } else if details.sugar > 5.0 {
        score -= 10;
    }

    if details.carbs > 25.0 {
        score -= 20;
    } else if details.carbs > 10.0 {
        score -= 5;
    }

    MacroResult {
        score: score.clamp(0, MAX_SCORE) as u8,
        details,
    }
}

fn grams(value: Option<f64>) -> f64 {
    value.filter(|grams| grams.is_finite()).unwrap_or(0.0)
}
