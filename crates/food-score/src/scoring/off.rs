//! Adapter from Open Food Facts product documents.

use serde::Deserialize;

use super::domain::{lenient_barcode, lenient_number, lenient_string, Nutrition, ProductRecord};

/// Subset of an Open Food Facts `product` object the engine reads.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OpenFoodFactsProduct {
    #[serde(default, deserialize_with = "lenient_barcode")]
    pub code: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub product_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub ingredients_text: Option<String>,
    #[serde(default)]
    pub nutriments: Option<Nutriments>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Nutriments {
    #[serde(default, deserialize_with = "lenient_number")]
    pub proteins_100g: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub sugars_100g: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub carbohydrates_100g: Option<f64>,
}

impl From<OpenFoodFactsProduct> for ProductRecord {
    fn from(product: OpenFoodFactsProduct) -> Self {
        let nutriments = product.nutriments.unwrap_or_default();
        ProductRecord {
            barcode: normalize_barcode(product.code.as_deref().unwrap_or_default()),
            name: product.product_name.unwrap_or_default(),
            ingredients: product.ingredients_text,
            nutrition: Nutrition {
                protein: nutriments.proteins_100g,
                sugar: nutriments.sugars_100g,
                carbs: nutriments.carbohydrates_100g,
            },
            diet_flags: None,
        }
    }
}

/// Keep only the digits of a scanned barcode.
pub fn normalize_barcode(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strips_non_digits_from_barcodes() {
        assert_eq!(normalize_barcode(" 30-17620 422003\n"), "3017620422003");
        assert_eq!(normalize_barcode("n/a"), "");
    }

    #[test]
    fn maps_off_product_fields() {
        let product: OpenFoodFactsProduct = serde_json::from_value(json!({
            "code": "5000159407236",
            "product_name": "Crisps",
            "ingredients_text": "Potatoes, Sunflower Oil, Salt",
            "nutriments": {
                "proteins_100g": 6.1,
                "sugars_100g": "0.5",
                "carbohydrates_100g": 53,
                "energy-kcal_100g": 531
            },
            "brands": "Example"
        }))
        .expect("off product parses");

        let record = ProductRecord::from(product);
        assert_eq!(record.barcode, "5000159407236");
        assert_eq!(record.name, "Crisps");
        assert_eq!(
            record.ingredient_text(),
            Some("Potatoes, Sunflower Oil, Salt")
        );
        assert_eq!(record.nutrition.protein, Some(6.1));
        assert_eq!(record.nutrition.sugar, Some(0.5));
        assert_eq!(record.nutrition.carbs, Some(53.0));
    }

    #[test]
    fn sparse_off_product_keeps_numeric_code() {
        let product: OpenFoodFactsProduct =
            serde_json::from_value(json!({ "code": 42, "nutriments": {} }))
                .expect("sparse product parses");
        let record = ProductRecord::from(product);
        assert_eq!(record.barcode, "42");
        assert_eq!(record.name, "");
        assert!(record.ingredients.is_none());
        assert_eq!(record.nutrition, Nutrition::default());
    }
}
