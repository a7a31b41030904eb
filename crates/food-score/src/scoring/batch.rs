use serde::Deserialize;
use std::io::Read;
use tracing::warn;

use super::domain::{parse_lenient_number, Nutrition, ProductRecord, ScoringResult};
use super::off::normalize_barcode;
use super::ScoringEngine;

/// One line of a batch run. A rejected row never stops the rows after it.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchEntry {
    Scored {
        line: u64,
        barcode: String,
        result: ScoringResult,
    },
    Rejected {
        line: u64,
        reason: String,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("failed to read batch file: {0}")]
    Io(#[from] std::io::Error),
    #[error("batch file header is unreadable: {0}")]
    Header(#[source] csv::Error),
}

#[derive(Debug, Deserialize)]
struct BatchRow {
    #[serde(default)]
    barcode: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    ingredients: String,
    #[serde(default)]
    protein: String,
    #[serde(default)]
    sugar: String,
    #[serde(default)]
    carbs: String,
}

impl BatchRow {
    fn into_record(self) -> ProductRecord {
        ProductRecord {
            barcode: normalize_barcode(&self.barcode),
            name: self.name,
            ingredients: Some(self.ingredients).filter(|text| !text.trim().is_empty()),
            nutrition: Nutrition {
                protein: parse_lenient_number(&self.protein),
                sugar: parse_lenient_number(&self.sugar),
                carbs: parse_lenient_number(&self.carbs),
            },
            diet_flags: None,
        }
    }
}

/// Score every row of a CSV with headers
/// `barcode,name,ingredients,protein,sugar,carbs`.
pub fn score_csv<R: Read>(
    reader: R,
    engine: &ScoringEngine,
) -> Result<Vec<BatchEntry>, BatchError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    csv_reader.headers().map_err(BatchError::Header)?;

    let mut entries = Vec::new();
    for (index, row) in csv_reader.deserialize::<BatchRow>().enumerate() {
        // Header is line 1.
        let line = index as u64 + 2;
        match row {
            Ok(row) => {
                let record = row.into_record();
                let result = engine.score(&record);
                entries.push(BatchEntry::Scored {
                    line,
                    barcode: record.barcode,
                    result,
                });
            }
            Err(err) => {
                warn!(line, error = %err, "skipping malformed batch row");
                entries.push(BatchEntry::Rejected {
                    line,
                    reason: err.to_string(),
                });
            }
        }
    }

    Ok(entries)
}
