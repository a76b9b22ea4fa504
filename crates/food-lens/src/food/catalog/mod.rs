//! Boundary to the product catalog. Fetching lives outside the engine; this module
//! owns the normalized shapes that cross the boundary and an in-memory catalog
//! seeded from exports.

mod flat_file;
mod normalizer;
pub mod off;

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::domain::{Barcode, FoodRecord};

pub const DEFAULT_SEARCH_LIMIT: usize = 20;
pub const CANDIDATE_SET_LIMIT: usize = 10;

const HIGH_FIBER_MIN_G: f64 = 5.0;
const LOW_SUGAR_MAX_G: f64 = 5.0;
const OMEGA_FRAGMENT: &str = "omega";

/// Failures surfaced by a catalog. The scoring engine itself never produces these.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("no product matched '{0}'")]
    NotFound(String),
    #[error("catalog fetch failed: {0}")]
    FetchFailed(String),
}

/// Curated product groups requested for a health goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateSet {
    HighFiber,
    LowSugar,
    Omega3,
}

impl CandidateSet {
    pub fn label(&self) -> &'static str {
        match self {
            CandidateSet::HighFiber => "High Fiber Picks",
            CandidateSet::LowSugar => "Low Sugar Options",
            CandidateSet::Omega3 => "Omega-3 Rich Foods",
        }
    }

    pub fn matches(&self, food: &FoodRecord) -> bool {
        match self {
            CandidateSet::HighFiber => food
                .nutrition
                .reported_fiber()
                .map(|fiber| fiber >= HIGH_FIBER_MIN_G)
                .unwrap_or(false),
            CandidateSet::LowSugar => food
                .nutrition
                .reported_sugar()
                .map(|sugar| sugar <= LOW_SUGAR_MAX_G)
                .unwrap_or(false),
            CandidateSet::Omega3 => {
                food.name.to_lowercase().contains(OMEGA_FRAGMENT)
                    || food.diet_tags.iter().any(|tag| tag.contains(OMEGA_FRAGMENT))
            }
        }
    }
}

/// Read access to product records keyed by barcode.
pub trait ProductCatalog: Send + Sync {
    fn lookup(&self, barcode: &Barcode) -> Result<FoodRecord, CatalogError>;
    fn search(&self, query: &str, limit: usize) -> Result<Vec<FoodRecord>, CatalogError>;
    fn candidates(&self, set: CandidateSet) -> Result<Vec<FoodRecord>, CatalogError>;
}

/// Catalog held entirely in memory, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    products: Arc<Vec<FoodRecord>>,
    index: HashMap<Barcode, usize>,
}

impl InMemoryCatalog {
    /// Builds a catalog; the first record wins when a barcode repeats.
    pub fn from_records(records: Vec<FoodRecord>) -> Self {
        let mut products = Vec::with_capacity(records.len());
        let mut index = HashMap::with_capacity(records.len());

        for record in records {
            if index.contains_key(&record.barcode) {
                warn!(barcode = %record.barcode, "duplicate barcode in catalog seed ignored");
                continue;
            }
            index.insert(record.barcode.clone(), products.len());
            products.push(record);
        }

        Self {
            products: Arc::new(products),
            index,
        }
    }

    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, CatalogImportError> {
        Ok(Self::from_records(flat_file::parse_records(reader)?))
    }

    /// Loads an Open Food Facts search dump (`{"products": [...]}`).
    pub fn from_off_json_reader<R: Read>(mut reader: R) -> Result<Self, CatalogImportError> {
        let mut body = Vec::new();
        reader.read_to_end(&mut body)?;
        Ok(Self::from_records(off::parse_search_response(&body)?))
    }

    /// Picks the format from the extension: `.json` is an Open Food Facts dump,
    /// anything else is read as CSV.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogImportError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let is_json = path
            .extension()
            .map(|extension| extension.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let catalog = if is_json {
            Self::from_off_json_reader(file)?
        } else {
            Self::from_csv_reader(file)?
        };
        debug!(path = %path.display(), products = catalog.len(), "catalog loaded");
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn records(&self) -> &[FoodRecord] {
        &self.products
    }

    /// Shared handle to the records, for strategies that scan the whole catalog.
    pub fn snapshot(&self) -> Arc<Vec<FoodRecord>> {
        Arc::clone(&self.products)
    }
}

impl ProductCatalog for InMemoryCatalog {
    fn lookup(&self, barcode: &Barcode) -> Result<FoodRecord, CatalogError> {
        self.index
            .get(barcode)
            .and_then(|position| self.products.get(*position))
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(barcode.to_string()))
    }

    fn search(&self, query: &str, limit: usize) -> Result<Vec<FoodRecord>, CatalogError> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Err(CatalogError::NotFound(query.to_string()));
        }

        let matches: Vec<FoodRecord> = self
            .products
            .iter()
            .filter(|food| {
                food.name.to_lowercase().contains(&needle)
                    || food.brand.to_lowercase().contains(&needle)
                    || food.category.to_lowercase().contains(&needle)
            })
            .take(limit)
            .cloned()
            .collect();

        if matches.is_empty() {
            return Err(CatalogError::NotFound(query.to_string()));
        }
        Ok(matches)
    }

    fn candidates(&self, set: CandidateSet) -> Result<Vec<FoodRecord>, CatalogError> {
        Ok(self
            .products
            .iter()
            .filter(|food| set.matches(food))
            .take(CANDIDATE_SET_LIMIT)
            .cloned()
            .collect())
    }
}

#[derive(Debug)]
pub enum CatalogImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Payload(CatalogError),
}

impl std::fmt::Display for CatalogImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogImportError::Io(err) => write!(f, "failed to read catalog export: {}", err),
            CatalogImportError::Csv(err) => write!(f, "invalid catalog CSV data: {}", err),
            CatalogImportError::Payload(err) => {
                write!(f, "invalid catalog JSON data: {}", err)
            }
        }
    }
}

impl std::error::Error for CatalogImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogImportError::Io(err) => Some(err),
            CatalogImportError::Csv(err) => Some(err),
            CatalogImportError::Payload(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for CatalogImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for CatalogImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<CatalogError> for CatalogImportError {
    fn from(err: CatalogError) -> Self {
        Self::Payload(err)
    }
}
