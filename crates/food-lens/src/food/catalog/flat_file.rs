use std::io::Read;

use serde::{Deserialize, Deserializer};
use tracing::warn;

use super::super::domain::{Barcode, FoodRecord, Nutrition};
use super::normalizer::{clean_display, display_or, normalize_tag, split_list};
use super::off::{UNCATEGORIZED, UNKNOWN_BRAND, UNKNOWN_PRODUCT};

const LIST_SEPARATOR: char = ';';

/// Reads a flat catalog export. List columns hold `;`-separated entries and
/// blank cells mean the value is unknown.
pub(crate) fn parse_records<R: Read>(reader: R) -> Result<Vec<FoodRecord>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for (line, row) in csv_reader.deserialize::<CatalogRow>().enumerate() {
        let row = row?;
        match row.into_record() {
            Some(record) => records.push(record),
            None => warn!(row = line + 1, "skipping catalog row without barcode"),
        }
    }

    Ok(records)
}

#[derive(Debug, Deserialize)]
struct CatalogRow {
    #[serde(default)]
    barcode: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    name: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    brand: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    category: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    ingredients: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    additives: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    allergens: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    diet_tags: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    labels: Option<String>,
    #[serde(default)]
    calories: Option<f64>,
    #[serde(default)]
    protein: Option<f64>,
    #[serde(default)]
    carbs: Option<f64>,
    #[serde(default)]
    fat: Option<f64>,
    #[serde(default)]
    fiber: Option<f64>,
    #[serde(default)]
    sugar: Option<f64>,
    #[serde(default)]
    sodium_mg: Option<f64>,
}

impl CatalogRow {
    fn into_record(self) -> Option<FoodRecord> {
        let barcode = clean_display(&self.barcode)?;

        Some(FoodRecord {
            barcode: Barcode::new(barcode),
            name: display_or(self.name.as_deref(), UNKNOWN_PRODUCT),
            brand: display_or(self.brand.as_deref(), UNKNOWN_BRAND),
            category: display_or(self.category.as_deref(), UNCATEGORIZED),
            ingredients: list(self.ingredients.as_deref()),
            additives: list(self.additives.as_deref()),
            allergen_tags: tags(self.allergens.as_deref()),
            diet_tags: tags(self.diet_tags.as_deref()),
            label_tags: tags(self.labels.as_deref()),
            nutrition: Nutrition {
                calories: self.calories,
                protein: self.protein,
                carbs: self.carbs,
                fat: self.fat,
                fiber: self.fiber,
                sugar: self.sugar,
                sodium: self.sodium_mg,
            }
            .sanitized(),
        })
    }
}

fn list(value: Option<&str>) -> Vec<String> {
    value
        .map(|raw| split_list(raw, LIST_SEPARATOR))
        .unwrap_or_default()
}

fn tags<C: FromIterator<String>>(value: Option<&str>) -> C {
    list(value)
        .iter()
        .filter_map(|tag| normalize_tag(tag))
        .collect()
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
