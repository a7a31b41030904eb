use axum::body::Body;
use axum::http::{header::CONTENT_TYPE, Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use super::common::*;
use crate::scoring::scan_router;

fn post_json(uri: &str, body: String) -> Request<Body> {
    Request::post(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn scores_posted_product_record() {
    let router = scan_router(engine());
    let payload = json!({
        "barcode": "4006-3813-33931",
        "name": "Cola",
        "ingredients": "Corn Syrup, Water",
        "nutrition": { "protein": 0, "sugar": "10.6", "carbs": 10.6 }
    });

    let response = router
        .oneshot(post_json("/api/v1/scan/score", payload.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["found"], true);
    assert_eq!(body["product"]["barcode"], "4006381333931");
    assert_eq!(body["processing"]["reason"], "first_ingredient_industrial");
    assert_eq!(body["diet"]["reason"], "prohibited");
    assert_eq!(body["score"], 0);
    assert_eq!(body["macros"]["score"], 0);
    assert!(body["_meta"]["duration_ms"].is_u64());
    assert!(body["_meta"]["scored_at"].is_string());
}

#[tokio::test]
async fn numeric_barcode_is_accepted() {
    let router = scan_router(engine());
    let payload = json!({ "barcode": 4006381333931u64, "name": "Bread", "ingredients": "flour, water" });

    let response = router
        .oneshot(post_json("/api/v1/scan/score", payload.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["product"]["barcode"], "4006381333931");
    assert_eq!(body["processing"]["reason"], "natural_processing");
}

#[tokio::test]
async fn blank_barcode_is_rejected() {
    let router = scan_router(engine());
    let payload = json!({ "barcode": " - ", "name": "Bread", "ingredients": "flour" });

    let response = router
        .oneshot(post_json("/api/v1/scan/score", payload.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json_body(response).await;
    assert_eq!(body["error"], "missing barcode");
}

#[tokio::test]
async fn scores_open_food_facts_product() {
    let router = scan_router(engine());
    let payload = json!({
        "code": "3017620422003",
        "product_name": "Sourdough Loaf",
        "ingredients_text": "flour, water, salt",
        "nutriments": { "proteins_100g": 9, "sugars_100g": 1, "carbohydrates_100g": 48 }
    });

    let response = router
        .oneshot(post_json("/api/v1/scan/score/off", payload.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["product"]["name"], "Sourdough Loaf");
    assert_eq!(body["processing"]["level"], "L2");
    assert_eq!(body["processing"]["reason"], "identity_rule");
    assert_eq!(body["score"], 100);
}

#[tokio::test]
async fn malformed_json_is_a_client_error() {
    let router = scan_router(engine());

    let response = router
        .oneshot(post_json("/api/v1/scan/score", "{".to_string()))
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}
