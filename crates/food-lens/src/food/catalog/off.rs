//! Normalization of Open Food Facts product payloads into [`FoodRecord`]s.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::super::domain::{Barcode, FoodRecord, Nutrition};
use super::normalizer::{clean_display, display_or, normalize_tag, split_list};
use super::CatalogError;

pub const UNKNOWN_PRODUCT: &str = "Unknown Product";
pub const UNKNOWN_BRAND: &str = "Unknown Brand";
pub const UNCATEGORIZED: &str = "Uncategorized";

const MILLIGRAMS_PER_GRAM: f64 = 1000.0;

#[derive(Debug, Deserialize)]
struct ProductResponse {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    status: Option<i64>,
    #[serde(default)]
    product: Option<OffProduct>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    products: Vec<OffProduct>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct OffProduct {
    code: Option<String>,
    product_name: Option<String>,
    brands: Option<String>,
    categories: Option<String>,
    ingredients_text: Option<String>,
    ingredients: Vec<OffIngredient>,
    additives_tags: Vec<String>,
    allergens_tags: Vec<String>,
    ingredients_analysis_tags: Vec<String>,
    labels_tags: Vec<String>,
    nutriments: Option<OffNutriments>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OffIngredient {
    text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OffNutriments {
    #[serde(rename = "energy-kcal_100g", deserialize_with = "lenient_number")]
    energy_kcal_100g: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    proteins_100g: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    carbohydrates_100g: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    fat_100g: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    fiber_100g: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    sugars_100g: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    sodium_100g: Option<f64>,
}

/// The catalog reports some nutriments as numeric strings.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(raw)) => raw.trim().parse::<f64>().ok(),
        _ => None,
    })
}

impl OffNutriments {
    fn to_nutrition(&self) -> Nutrition {
        Nutrition {
            calories: self.energy_kcal_100g,
            protein: self.proteins_100g,
            carbs: self.carbohydrates_100g,
            fat: self.fat_100g,
            fiber: self.fiber_100g,
            sugar: self.sugars_100g,
            sodium: self.sodium_100g.map(|grams| grams * MILLIGRAMS_PER_GRAM),
        }
        .sanitized()
    }
}

impl OffProduct {
    fn ingredient_list(&self) -> Vec<String> {
        let listed: Vec<String> = self
            .ingredients
            .iter()
            .filter_map(|ingredient| ingredient.text.as_deref().and_then(clean_display))
            .collect();

        if !listed.is_empty() {
            return listed;
        }

        self.ingredients_text
            .as_deref()
            .map(|text| split_list(text, ','))
            .unwrap_or_default()
    }

    /// `None` when the payload carries no usable barcode.
    pub(crate) fn into_record(self, fallback_code: Option<&str>) -> Option<FoodRecord> {
        let code = self
            .code
            .as_deref()
            .and_then(clean_display)
            .or_else(|| fallback_code.and_then(clean_display))?;

        let category = self
            .categories
            .as_deref()
            .and_then(|categories| split_list(categories, ',').into_iter().next());

        Some(FoodRecord {
            barcode: Barcode::new(code),
            name: display_or(self.product_name.as_deref(), UNKNOWN_PRODUCT),
            brand: display_or(self.brands.as_deref(), UNKNOWN_BRAND),
            category: category.unwrap_or_else(|| UNCATEGORIZED.to_string()),
            ingredients: self.ingredient_list(),
            additives: self.additives_tags.iter().filter_map(|tag| normalize_tag(tag)).collect(),
            allergen_tags: self.allergens_tags.iter().filter_map(|tag| normalize_tag(tag)).collect(),
            diet_tags: self
                .ingredients_analysis_tags
                .iter()
                .filter_map(|tag| normalize_tag(tag))
                .collect(),
            label_tags: self.labels_tags.iter().filter_map(|tag| normalize_tag(tag)).collect(),
            nutrition: self
                .nutriments
                .as_ref()
                .map(OffNutriments::to_nutrition)
                .unwrap_or_default(),
        })
    }
}

/// Normalizes a single-product lookup response (`/api/v0/product/<code>.json`).
pub fn parse_product_response(body: &[u8]) -> Result<FoodRecord, CatalogError> {
    let response: ProductResponse = serde_json::from_slice(body)
        .map_err(|err| CatalogError::FetchFailed(format!("invalid product payload: {err}")))?;

    let code = response.code.clone().unwrap_or_default();
    if response.status == Some(0) {
        return Err(CatalogError::NotFound(code));
    }

    response
        .product
        .and_then(|product| product.into_record(response.code.as_deref()))
        .ok_or(CatalogError::NotFound(code))
}

/// Normalizes a search response, skipping products without a barcode.
pub fn parse_search_response(body: &[u8]) -> Result<Vec<FoodRecord>, CatalogError> {
    let response: SearchResponse = serde_json::from_slice(body)
        .map_err(|err| CatalogError::FetchFailed(format!("invalid search payload: {err}")))?;

    Ok(response
        .products
        .into_iter()
        .filter_map(|product| product.into_record(None))
        .collect())
}
