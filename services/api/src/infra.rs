use food_score::config::RulesConfig;
use food_score::error::AppError;
use food_score::scoring::{RuleTables, ScoringEngine};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Load the rule tables once; any failure here is fatal for the caller.
pub(crate) fn load_engine(config: &RulesConfig) -> Result<ScoringEngine, AppError> {
    let rules = RuleTables::load(config)?;
    info!(
        source = %rules_source(config),
        ingredient_rules = rules.ingredients.len(),
        prohibited = rules.diet.prohibited.len(),
        discouraged = rules.diet.discouraged.len(),
        "rule tables loaded"
    );
    Ok(ScoringEngine::new(rules))
}

pub(crate) fn rules_source(config: &RulesConfig) -> String {
    match &config.dir {
        Some(dir) => dir.display().to_string(),
        None => "builtin".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn builtin_rules_back_the_engine_without_a_directory() {
        let engine = load_engine(&RulesConfig::default()).expect("builtin engine");
        assert!(!engine.rules().ingredients.is_empty());
        assert_eq!(rules_source(&RulesConfig::default()), "builtin");
    }

    #[test]
    fn missing_rules_directory_is_fatal() {
        let config = RulesConfig {
            dir: Some(PathBuf::from("/nonexistent/food-score-rules")),
        };
        let err = load_engine(&config).expect_err("missing tables fail");
        assert!(matches!(err, AppError::Rules(_)));
    }
}
