use crate::infra::{load_engine, rules_source};
use chrono::Utc;
use clap::Args;
use food_score::config::AppConfig;
use food_score::error::AppError;
use food_score::scoring::router::{ScanMeta, ScanResponse};
use food_score::scoring::{
    normalize_barcode, score_csv, BatchEntry, OpenFoodFactsProduct, ProductRecord, RuleTables,
    ScoringResult,
};
use serde_json::Value;
use std::fs::{self, File};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Product JSON file to score
    pub(crate) path: PathBuf,
    /// Read the file as an Open Food Facts product document
    #[arg(long)]
    pub(crate) off: bool,
}

#[derive(Args, Debug)]
pub(crate) struct BatchArgs {
    /// CSV with headers barcode,name,ingredients,protein,sugar,carbs
    pub(crate) csv: PathBuf,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let engine = load_engine(&config.rules)?;

    let raw = fs::read_to_string(&args.path)?;
    let mut product = parse_product(&raw, args.off)?;
    product.barcode = normalize_barcode(&product.barcode);

    let started = Instant::now();
    let result = engine.score(&product);
    let response = ScanResponse {
        found: true,
        product,
        result,
        meta: ScanMeta {
            duration_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            scored_at: Utc::now(),
        },
    };

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

pub(crate) fn run_batch(args: BatchArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let engine = load_engine(&config.rules)?;

    let file = File::open(&args.csv)?;
    let entries = score_csv(file, &engine)?;

    let mut scored = 0usize;
    let mut rejected = 0usize;
    for entry in &entries {
        match entry {
            BatchEntry::Scored {
                line,
                barcode,
                result,
            } => {
                scored += 1;
                println!("line {line}: {}", describe(barcode, result));
            }
            BatchEntry::Rejected { line, reason } => {
                rejected += 1;
                println!("line {line}: rejected ({reason})");
            }
        }
    }

    println!("\n{scored} scored, {rejected} rejected");
    Ok(())
}

pub(crate) fn run_rules_check() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let rules = RuleTables::load(&config.rules)?;

    println!("Rule tables: {}", rules_source(&config.rules));
    println!("- ingredient rules: {}", rules.ingredients.len());
    println!(
        "- diet keywords: {} prohibited, {} discouraged",
        rules.diet.prohibited.len(),
        rules.diet.discouraged.len()
    );
    println!(
        "- processing keywords: {} deep fry, {} identity",
        rules.processing.deep_fry_keywords.len(),
        rules.processing.identity_l2.len()
    );
    println!(
        "- dominance threshold: {}",
        rules.processing.threshold_dominant
    );
    Ok(())
}

/// Open Food Facts API responses wrap the document in `product`; bare
/// documents are accepted too.
fn parse_product(raw: &str, off: bool) -> Result<ProductRecord, AppError> {
    if !off {
        return Ok(serde_json::from_str(raw)?);
    }

    let mut document: Value = serde_json::from_str(raw)?;
    let product = if document.get("product").is_some() {
        document["product"].take()
    } else {
        document
    };
    let product: OpenFoodFactsProduct = serde_json::from_value(product)?;
    Ok(ProductRecord::from(product))
}

fn describe(barcode: &str, result: &ScoringResult) -> String {
    let level = result
        .processing
        .level
        .map(|level| format!("{level:?}"))
        .unwrap_or_else(|| "-".to_string());
    let barcode = if barcode.is_empty() { "(no barcode)" } else { barcode };
    format!(
        "{barcode} score {} [{level} {}, diet {}]",
        result.final_score,
        result.processing.reason.code(),
        result.diet.result.reason.code()
    )
}
