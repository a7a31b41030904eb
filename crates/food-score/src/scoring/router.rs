use std::time::Instant;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use tracing::info;

use super::domain::{ProductRecord, ScoringResult};
use super::off::{normalize_barcode, OpenFoodFactsProduct};
use super::ScoringEngine;

/// Response body for a scored scan.
#[derive(Debug, Serialize)]
pub struct ScanResponse {
    pub found: bool,
    pub product: ProductRecord,
    #[serde(flatten)]
    pub result: ScoringResult,
    #[serde(rename = "_meta")]
    pub meta: ScanMeta,
}

#[derive(Debug, Serialize)]
pub struct ScanMeta {
    pub duration_ms: u64,
    pub scored_at: DateTime<Utc>,
}

/// Router exposing the scoring endpoints. Product lookup happens upstream;
/// callers post the record they already hold.
pub fn scan_router(engine: ScoringEngine) -> Router {
    Router::new()
        .route("/api/v1/scan/score", post(score_handler))
        .route("/api/v1/scan/score/off", post(score_off_handler))
        .with_state(engine)
}

pub(crate) async fn score_handler(
    State(engine): State<ScoringEngine>,
    Json(product): Json<ProductRecord>,
) -> Response {
    score_product(&engine, product)
}

pub(crate) async fn score_off_handler(
    State(engine): State<ScoringEngine>,
    Json(product): Json<OpenFoodFactsProduct>,
) -> Response {
    score_product(&engine, ProductRecord::from(product))
}

fn score_product(engine: &ScoringEngine, mut product: ProductRecord) -> Response {
    let started = Instant::now();

    product.barcode = normalize_barcode(&product.barcode);
    if product.barcode.is_empty() {
        let payload = json!({ "error": "missing barcode" });
        return (StatusCode::BAD_REQUEST, Json(payload)).into_response();
    }

    let result = engine.score(&product);
    let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    info!(
        barcode = %product.barcode,
        level = ?result.processing.level,
        confidence = ?result.processing.confidence,
        reason = result.processing.reason.code(),
        score = result.final_score,
        duration_ms,
        "scan scored"
    );

    let body = ScanResponse {
        found: true,
        product,
        result,
        meta: ScanMeta {
            duration_ms,
            scored_at: Utc::now(),
        },
    };
    (StatusCode::OK, Json(body)).into_response()
}
