use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use axum::Router;
use chrono::Utc;
use serde_json::Value;

use crate::food::catalog::InMemoryCatalog;
use crate::food::domain::{FoodRecord, Nutrition};
use crate::food::profile::ProfileFlag;
use crate::food::session::{ProfileSession, ProfileStore, SessionError, SessionId};
use crate::food::{food_router, FoodLensService};

/// Mock product with one inflammatory ingredient and two additives.
pub(super) fn chips() -> FoodRecord {
    let mut record = FoodRecord::new("011110038364", "Processed Snack Chips");
    record.brand = "Crunchy Co".to_string();
    record.category = "Snacks".to_string();
    record.ingredients = strings(&["corn", "vegetable oil", "salt"]);
    record.additives = strings(&["MSG", "artificial color"]);
    record.diet_tags.insert("en:vegan".to_string());
    record.nutrition = Nutrition {
        calories: Some(160.0),
        protein: Some(2.0),
        carbs: Some(15.0),
        fat: Some(10.0),
        fiber: Some(0.0),
        sugar: Some(1.0),
        sodium: Some(180.0),
    };
    record
}

pub(super) fn quinoa() -> FoodRecord {
    let mut record = FoodRecord::new("737628064502", "Organic Quinoa");
    record.brand = "Ancient Harvest".to_string();
    record.category = "Grains".to_string();
    record.ingredients = strings(&["organic quinoa"]);
    record.diet_tags.insert("en:vegan".to_string());
    record.label_tags.insert("en:organic".to_string());
    record.label_tags.insert("en:gluten-free".to_string());
    record.nutrition = Nutrition {
        protein: Some(4.0),
        fiber: Some(0.0),
        sugar: Some(0.0),
        sodium: Some(10.0),
        ..Nutrition::default()
    };
    record
}

/// Cereal-style record with only sugar and fiber reported.
pub(super) fn cereal(barcode: &str, name: &str, sugar: Option<f64>, fiber: Option<f64>) -> FoodRecord {
    let mut record = FoodRecord::new(barcode, name);
    record.category = "Breakfast cereals".to_string();
    record.nutrition.sugar = sugar;
    record.nutrition.fiber = fiber;
    record
}

pub(super) fn with_tags(
    mut record: FoodRecord,
    diet: &[&str],
    labels: &[&str],
    allergens: &[&str],
) -> FoodRecord {
    record.diet_tags.extend(strings(diet));
    record.label_tags.extend(strings(labels));
    record.allergen_tags.extend(strings(allergens));
    record
}

pub(super) fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

pub(super) fn names(records: &[FoodRecord]) -> Vec<&str> {
    records.iter().map(|record| record.name.as_str()).collect()
}

pub(super) fn sample_catalog() -> InMemoryCatalog {
    InMemoryCatalog::from_records(vec![
        chips(),
        quinoa(),
        with_tags(
            cereal("100", "Bran Flakes", Some(14.0), Some(12.0)),
            &["en:vegan"],
            &[],
            &["en:gluten"],
        ),
        with_tags(
            cereal("101", "Plain Oats", Some(1.0), Some(10.0)),
            &["en:vegetarian"],
            &["en:gluten-free"],
            &[],
        ),
        with_tags(
            cereal("102", "Honey Clusters", Some(24.0), Some(6.0)),
            &["en:vegetarian"],
            &[],
            &["en:gluten"],
        ),
        with_tags(
            cereal("103", "Omega Seed Granola", Some(4.0), Some(8.0)),
            &["en:vegan"],
            &["en:organic"],
            &[],
        ),
    ])
}

pub(super) fn build_service() -> (
    FoodLensService<InMemoryCatalog, MemorySessions>,
    Arc<MemorySessions>,
) {
    let sessions = Arc::new(MemorySessions::default());
    let service = FoodLensService::new(Arc::new(sample_catalog()), sessions.clone());
    (service, sessions)
}

pub(super) fn food_router_with_service<S>(service: FoodLensService<InMemoryCatalog, S>) -> Router
where
    S: ProfileStore + 'static,
{
    food_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

#[derive(Default, Clone)]
pub(super) struct MemorySessions {
    pub(super) sessions: Arc<Mutex<HashMap<SessionId, ProfileSession>>>,
}

impl ProfileStore for MemorySessions {
    fn insert(&self, session: ProfileSession) -> Result<ProfileSession, SessionError> {
        let mut guard = self.sessions.lock().expect("session mutex poisoned");
        if guard.contains_key(&session.session_id) {
            return Err(SessionError::Conflict);
        }
        guard.insert(session.session_id.clone(), session.clone());
        Ok(session)
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<ProfileSession>, SessionError> {
        let guard = self.sessions.lock().expect("session mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn toggle(&self, id: &SessionId, flag: ProfileFlag) -> Result<ProfileSession, SessionError> {
        let mut guard = self.sessions.lock().expect("session mutex poisoned");
        let current = guard.remove(id).ok_or(SessionError::NotFound)?;
        let updated = current.toggled(flag, Utc::now());
        guard.insert(id.clone(), updated.clone());
        Ok(updated)
    }

    fn remove(&self, id: &SessionId) -> Result<(), SessionError> {
        let mut guard = self.sessions.lock().expect("session mutex poisoned");
        guard.remove(id).map(|_| ()).ok_or(SessionError::NotFound)
    }
}

pub(super) struct ConflictSessions;

impl ProfileStore for ConflictSessions {
    fn insert(&self, _session: ProfileSession) -> Result<ProfileSession, SessionError> {
        Err(SessionError::Conflict)
    }

    fn fetch(&self, _id: &SessionId) -> Result<Option<ProfileSession>, SessionError> {
        Ok(None)
    }

    fn toggle(&self, _id: &SessionId, _flag: ProfileFlag) -> Result<ProfileSession, SessionError> {
        Err(SessionError::NotFound)
    }

    fn remove(&self, _id: &SessionId) -> Result<(), SessionError> {
        Err(SessionError::NotFound)
    }
}

pub(super) struct UnavailableSessions;

impl ProfileStore for UnavailableSessions {
    fn insert(&self, _session: ProfileSession) -> Result<ProfileSession, SessionError> {
        Err(SessionError::Unavailable("session store offline".to_string()))
    }

    fn fetch(&self, _id: &SessionId) -> Result<Option<ProfileSession>, SessionError> {
        Err(SessionError::Unavailable("session store offline".to_string()))
    }

    fn toggle(&self, _id: &SessionId, _flag: ProfileFlag) -> Result<ProfileSession, SessionError> {
        Err(SessionError::Unavailable("session store offline".to_string()))
    }

    fn remove(&self, _id: &SessionId) -> Result<(), SessionError> {
        Err(SessionError::Unavailable("session store offline".to_string()))
    }
}
