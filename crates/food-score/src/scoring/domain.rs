use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Product as supplied by the lookup layer. Every field is optional on the
/// wire; missing or mistyped values deserialize to their empty form instead
/// of rejecting the record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    #[serde(default, deserialize_with = "barcode_or_empty")]
    pub barcode: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub name: String,
    /// Raw ingredient text, possibly a serialized multi-language list.
    #[serde(
        default,
        alias = "ingredients_text",
        deserialize_with = "lenient_string"
    )]
    pub ingredients: Option<String>,
    #[serde(default)]
    pub nutrition: Nutrition,
    /// Explicit per-product diet flags; these win over the rule-table defaults.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diet_flags: Option<BTreeMap<String, bool>>,
}

impl ProductRecord {
    /// Ingredient text with blank values collapsed to `None`.
    pub fn ingredient_text(&self) -> Option<&str> {
        self.ingredients
            .as_deref()
            .filter(|text| !text.trim().is_empty())
    }
}

/// Grams per 100 g.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Nutrition {
    #[serde(default, deserialize_with = "lenient_number")]
    pub protein: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub sugar: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub carbs: Option<f64>,
}

/// Declared `<name> NN%` token pulled out of ingredient text.
#[derive(Debug, Clone, PartialEq)]
pub struct PercentageEntry {
    pub name: String,
    pub pct: f64,
}

pub const UNKNOWN_CATEGORY: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedIngredient {
    pub name: String,
    pub industrial: bool,
    pub category: String,
}

impl ClassifiedIngredient {
    pub fn unmatched(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            industrial: false,
            category: UNKNOWN_CATEGORY.to_string(),
        }
    }
}

/// Processing intensity. L1 (unprocessed) is never produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProcessingLevel {
    L2,
    L3,
    L4,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

/// Which cascade rule produced a processing result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingReason {
    MissingIngredients,
    IndustrialSeedOilCalorieDominance,
    IndustrialSeedOilPresent,
    DeepFryRule,
    IdentityRule,
    FirstIngredientIndustrial,
    DominantIndustrial,
    MinorIndustrial,
    NaturalProcessing,
    ProcessingError,
}

impl ProcessingReason {
    pub const fn code(self) -> &'static str {
        match self {
            Self::MissingIngredients => "missing_ingredients",
            Self::IndustrialSeedOilCalorieDominance => "industrial_seed_oil_calorie_dominance",
            Self::IndustrialSeedOilPresent => "industrial_seed_oil_present",
            Self::DeepFryRule => "deep_fry_rule",
            Self::IdentityRule => "identity_rule",
            Self::FirstIngredientIndustrial => "first_ingredient_industrial",
            Self::DominantIndustrial => "dominant_industrial",
            Self::MinorIndustrial => "minor_industrial",
            Self::NaturalProcessing => "natural_processing",
            Self::ProcessingError => "processing_error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingResult {
    pub level: Option<ProcessingLevel>,
    pub confidence: Confidence,
    pub reason: ProcessingReason,
    pub classified: Vec<ClassifiedIngredient>,
    pub ratio: f64,
}

impl ProcessingResult {
    pub fn graded(
        level: ProcessingLevel,
        confidence: Confidence,
        reason: ProcessingReason,
        classified: Vec<ClassifiedIngredient>,
        ratio: f64,
    ) -> Self {
        Self {
            level: Some(level),
            confidence,
            reason,
            classified,
            ratio: clamp_unit(ratio),
        }
    }

    pub fn missing_ingredients() -> Self {
        Self::ungraded(ProcessingReason::MissingIngredients)
    }

    pub fn processing_error() -> Self {
        Self::ungraded(ProcessingReason::ProcessingError)
    }

    fn ungraded(reason: ProcessingReason) -> Self {
        Self {
            level: None,
            confidence: Confidence::Low,
            reason,
            classified: Vec::new(),
            ratio: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DietReason {
    NoIngredients,
    Prohibited,
    Discouraged,
    Allowed,
}

impl DietReason {
    pub const fn code(self) -> &'static str {
        match self {
            Self::NoIngredients => "no-ingredients",
            Self::Prohibited => "prohibited",
            Self::Discouraged => "discouraged",
            Self::Allowed => "allowed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DietResult {
    pub score: u8,
    pub reason: DietReason,
}

impl DietResult {
    pub const fn new(reason: DietReason) -> Self {
        let score = match reason {
            DietReason::NoIngredients | DietReason::Prohibited => 0,
            DietReason::Discouraged => 50,
            DietReason::Allowed => 100,
        };
        Self { score, reason }
    }
}

/// Diet result with the per-diet compatibility flags laid alongside it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DietAssessment {
    #[serde(flatten)]
    pub result: DietResult,
    #[serde(flatten)]
    pub flags: BTreeMap<String, bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroDetails {
    pub protein: f64,
    pub sugar: f64,
    pub carbs: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroResult {
    pub score: u8,
    pub details: MacroDetails,
}

/// Aggregate handed to the response layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoringResult {
    pub processing: ProcessingResult,
    pub diet: DietAssessment,
    pub macros: MacroResult,
    /// Always the diet score; processing and macros are explanatory only.
    #[serde(rename = "score")]
    pub final_score: u8,
}

pub(crate) fn clamp_unit(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Accepts numbers and numeric strings; everything else, including
/// non-finite values, is treated as absent.
pub(crate) fn parse_lenient_number(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

pub(crate) fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(number)) => number.as_f64().filter(|value| value.is_finite()),
        Some(Value::String(raw)) => parse_lenient_number(&raw),
        _ => None,
    })
}

pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(raw)) => Some(raw),
        _ => None,
    })
}

/// Barcodes arrive as strings or bare JSON numbers; numbers keep their digits.
pub(crate) fn lenient_barcode<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(raw)) => Some(raw),
        Some(Value::Number(number)) => Some(number.to_string()),
        _ => None,
    })
}

fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_string(deserializer)?.unwrap_or_default())
}

fn barcode_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_barcode(deserializer)?.unwrap_or_default())
}
