use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::RulesConfig;

use super::domain::UNKNOWN_CATEGORY;

pub const INGREDIENT_RULES_FILE: &str = "ingredient_rules.json";
pub const DIET_RULES_FILE: &str = "diet_rules.json";
pub const PROCESSING_RULES_FILE: &str = "processing_rules.json";

const BUILTIN_INGREDIENT_RULES: &str = include_str!("../../rules/ingredient_rules.json");
const BUILTIN_DIET_RULES: &str = include_str!("../../rules/diet_rules.json");
const BUILTIN_PROCESSING_RULES: &str = include_str!("../../rules/processing_rules.json");

/// Keyword mapping for a single ingredient family. Table order is part of the
/// contract: the classifier takes the first rule whose keyword the token
/// contains, so more specific keywords must be listed before broader ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientRule {
    pub keyword: String,
    #[serde(default)]
    pub industrial: bool,
    #[serde(default = "unknown_category")]
    pub category: String,
}

impl IngredientRule {
    pub fn new(keyword: impl Into<String>, industrial: bool, category: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            industrial,
            category: category.into(),
        }
    }
}

fn unknown_category() -> String {
    UNKNOWN_CATEGORY.to_string()
}

/// The ingredient table ships either as a bare list or wrapped in `{ "rules": [...] }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum IngredientRulesDocument {
    List(Vec<IngredientRule>),
    Wrapped { rules: Vec<IngredientRule> },
}

impl IngredientRulesDocument {
    fn into_rules(self) -> Vec<IngredientRule> {
        match self {
            Self::List(rules) | Self::Wrapped { rules } => rules,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DietRules {
    #[serde(default)]
    pub prohibited: Vec<String>,
    #[serde(default)]
    pub discouraged: Vec<String>,
    /// Compatibility flags reported for every product unless it carries its own.
    #[serde(default = "default_diet_flags")]
    pub defaults: BTreeMap<String, bool>,
}

pub fn default_diet_flags() -> BTreeMap<String, bool> {
    [
        ("keto", true),
        ("paleo", true),
        ("vegan", false),
        ("carnivore", false),
    ]
    .into_iter()
    .map(|(diet, compatible)| (diet.to_string(), compatible))
    .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingRules {
    #[serde(rename = "deepFryKeywords", default)]
    pub deep_fry_keywords: Vec<String>,
    #[serde(rename = "identityL2", default)]
    pub identity_l2: Vec<String>,
    #[serde(rename = "thresholdDominant")]
    pub threshold_dominant: f64,
}

/// Immutable rule set injected into the scoring engine.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleTables {
    pub ingredients: Vec<IngredientRule>,
    pub diet: DietRules,
    pub processing: ProcessingRules,
}

#[derive(Debug, thiserror::Error)]
pub enum RuleTableError {
    #[error("failed to read rule table {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("rule table {table} is not valid JSON: {source}")]
    Parse {
        table: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("rule table {table} entry {index} has a blank keyword")]
    BlankKeyword { table: &'static str, index: usize },
    #[error("thresholdDominant must be within (0, 1], got {0}")]
    InvalidThreshold(f64),
}

impl RuleTables {
    /// Validate and normalize the tables. Keywords are trimmed and lowercased
    /// so that matching can assume lowercase haystacks.
    pub fn new(
        ingredients: Vec<IngredientRule>,
        diet: DietRules,
        processing: ProcessingRules,
    ) -> Result<Self, RuleTableError> {
        let threshold = processing.threshold_dominant;
        if !threshold.is_finite() || threshold <= 0.0 || threshold > 1.0 {
            return Err(RuleTableError::InvalidThreshold(threshold));
        }

        let ingredients = ingredients
            .into_iter()
            .enumerate()
            .map(|(index, rule)| {
                let keyword = normalize_keyword(&rule.keyword, INGREDIENT_RULES_FILE, index)?;
                Ok(IngredientRule {
                    keyword,
                    industrial: rule.industrial,
                    category: rule.category,
                })
            })
            .collect::<Result<Vec<_>, RuleTableError>>()?;

        let diet = DietRules {
            prohibited: normalize_keywords(diet.prohibited, DIET_RULES_FILE)?,
            discouraged: normalize_keywords(diet.discouraged, DIET_RULES_FILE)?,
            defaults: diet.defaults,
        };

        let processing = ProcessingRules {
            deep_fry_keywords: normalize_keywords(
                processing.deep_fry_keywords,
                PROCESSING_RULES_FILE,
            )?,
            identity_l2: normalize_keywords(processing.identity_l2, PROCESSING_RULES_FILE)?,
            threshold_dominant: threshold,
        };

        Ok(Self {
            ingredients,
            diet,
            processing,
        })
    }

    /// Tables compiled into the crate from `rules/`.
    pub fn builtin() -> Result<Self, RuleTableError> {
        Self::from_json(
            BUILTIN_INGREDIENT_RULES,
            BUILTIN_DIET_RULES,
            BUILTIN_PROCESSING_RULES,
        )
    }

    pub fn from_json(ingredients: &str, diet: &str, processing: &str) -> Result<Self, RuleTableError> {
        let ingredients = serde_json::from_str::<IngredientRulesDocument>(ingredients)
            .map_err(|source| RuleTableError::Parse {
                table: INGREDIENT_RULES_FILE,
                source,
            })?
            .into_rules();
        let diet = serde_json::from_str::<DietRules>(diet).map_err(|source| {
            RuleTableError::Parse {
                table: DIET_RULES_FILE,
                source,
            }
        })?;
        let processing = serde_json::from_str::<ProcessingRules>(processing).map_err(|source| {
            RuleTableError::Parse {
                table: PROCESSING_RULES_FILE,
                source,
            }
        })?;

        Self::new(ingredients, diet, processing)
    }

    /// Load the three table files from a directory.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self, RuleTableError> {
        let dir = dir.as_ref();
        let ingredients = read_table(&dir.join(INGREDIENT_RULES_FILE))?;
        let diet = read_table(&dir.join(DIET_RULES_FILE))?;
        let processing = read_table(&dir.join(PROCESSING_RULES_FILE))?;
        Self::from_json(&ingredients, &diet, &processing)
    }

    pub fn load(config: &RulesConfig) -> Result<Self, RuleTableError> {
        match &config.dir {
            Some(dir) => Self::from_dir(dir),
            None => Self::builtin(),
        }
    }
}

fn read_table(path: &Path) -> Result<String, RuleTableError> {
    fs::read_to_string(path).map_err(|source| RuleTableError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn normalize_keyword(raw: &str, table: &'static str, index: usize) -> Result<String, RuleTableError> {
    let keyword = raw.trim().to_lowercase();
    if keyword.is_empty() {
        return Err(RuleTableError::BlankKeyword { table, index });
    }
    Ok(keyword)
}

fn normalize_keywords(
    keywords: Vec<String>,
    table: &'static str,
) -> Result<Vec<String>, RuleTableError> {
    keywords
        .iter()
        .enumerate()
        .map(|(index, keyword)| normalize_keyword(keyword, table, index))
        .collect()
}
