use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

const STRUCTURED_MARKER: &str = "[{";
const PREFERRED_LANGUAGE: &str = "en";

static BARE_KEY: OnceLock<Regex> = OnceLock::new();

fn bare_key_pattern() -> &'static Regex {
    BARE_KEY.get_or_init(|| Regex::new(r"([{,]\s*)(\w+)\s*:").expect("bare key pattern is valid"))
}

/// Best-effort lowercase ingredient text.
///
/// Plain strings are lowercased as-is. Text that looks like a rendered list of
/// language-tagged records (`[{'lang': 'en', 'text': '...'}, ...]`) is
/// rewritten into JSON and the English entry is preferred, then the first
/// entry. Anything that fails to parse is treated as plain text.
pub fn extract_best_ingredients_text(raw: &str) -> String {
    if !raw.starts_with(STRUCTURED_MARKER) {
        return raw.to_lowercase();
    }

    match parse_language_records(raw) {
        Some(text) => text.to_lowercase(),
        None => raw.to_lowercase(),
    }
}

/// Substring check against a keyword list; blank keywords never match.
pub fn contains_any_keyword(text: &str, keywords: &[String]) -> bool {
    keywords
        .iter()
        .filter(|keyword| !keyword.trim().is_empty())
        .any(|keyword| text.contains(keyword.to_lowercase().as_str()))
}

fn parse_language_records(raw: &str) -> Option<String> {
    let quoted = raw.replace('\'', "\"");
    let json = bare_key_pattern().replace_all(&quoted, "$1\"$2\":");
    let records = serde_json::from_str::<Vec<Value>>(&json).ok()?;

    let text_of = |record: &Value| {
        record
            .get("text")
            .and_then(Value::as_str)
            .filter(|text| !text.is_empty())
            .map(str::to_string)
    };

    let english = records
        .iter()
        .find(|record| record.get("lang").and_then(Value::as_str) == Some(PREFERRED_LANGUAGE))
        .and_then(text_of);

    Some(
        english
            .or_else(|| records.first().and_then(text_of))
            .unwrap_or_default(),
    )
}
