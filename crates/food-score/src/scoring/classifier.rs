use super::domain::ClassifiedIngredient;
use super::rules::IngredientRule;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClassificationError {
    #[error("ingredient rule table is empty")]
    EmptyRuleTable,
    #[error("ingredient rule {index} has a blank keyword")]
    BlankKeyword { index: usize },
}

/// Comma-separated tokens, trimmed and lowercased, empty tokens dropped.
pub fn split_ingredients(text: &str) -> Vec<String> {
    text.split(',')
        .map(|token| token.trim().to_lowercase())
        .filter(|token| !token.is_empty())
        .collect()
}

/// Tag every ingredient token with the first rule whose keyword it contains.
///
/// Rules are scanned linearly in table order, so an earlier, broader keyword
/// shadows a later, more specific one.
pub fn classify_ingredients(
    text: &str,
    rules: &[IngredientRule],
) -> Result<Vec<ClassifiedIngredient>, ClassificationError> {
    if rules.is_empty() {
        return Err(ClassificationError::EmptyRuleTable);
    }
    if let Some(index) = rules.iter().position(|rule| rule.keyword.trim().is_empty()) {
        return Err(ClassificationError::BlankKeyword { index });
    }

    Ok(split_ingredients(text)
        .into_iter()
        .map(|token| classify_token(token, rules))
        .collect())
}

fn classify_token(token: String, rules: &[IngredientRule]) -> ClassifiedIngredient {
    match rules
        .iter()
        .find(|rule| token.contains(rule.keyword.to_lowercase().as_str()))
    {
        Some(rule) => ClassifiedIngredient {
            name: token,
            industrial: rule.industrial,
            category: rule.category.clone(),
        },
        None => ClassifiedIngredient::unmatched(token),
    }
}
