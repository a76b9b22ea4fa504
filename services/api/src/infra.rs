use chrono::Utc;
use food_lens::config::CatalogConfig;
use food_lens::error::AppError;
use food_lens::food::catalog::InMemoryCatalog;
use food_lens::food::{
    CategoryPeers, FoodLensService, HealthScorer, ProfileFlag, ProfileSession, ProfileStore,
    SessionError, SessionId, SuggestionGenerator,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::info;

/// Peers offered per product on top of the organic variant.
const CATEGORY_PEER_LIMIT: usize = 3;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type FoodService = FoodLensService<InMemoryCatalog, InMemoryProfileStore>;

#[derive(Default, Clone)]
pub(crate) struct InMemoryProfileStore {
    sessions: Arc<Mutex<HashMap<SessionId, ProfileSession>>>,
}

impl InMemoryProfileStore {
    fn lock(&self) -> Result<MutexGuard<'_, HashMap<SessionId, ProfileSession>>, SessionError> {
        self.sessions
            .lock()
            .map_err(|_| SessionError::Unavailable("profile store lock poisoned".to_string()))
    }
}

impl ProfileStore for InMemoryProfileStore {
    fn insert(&self, session: ProfileSession) -> Result<ProfileSession, SessionError> {
        let mut guard = self.lock()?;
        if guard.contains_key(&session.session_id) {
            return Err(SessionError::Conflict);
        }
        guard.insert(session.session_id.clone(), session.clone());
        Ok(session)
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<ProfileSession>, SessionError> {
        let guard = self.lock()?;
        Ok(guard.get(id).cloned())
    }

    fn toggle(&self, id: &SessionId, flag: ProfileFlag) -> Result<ProfileSession, SessionError> {
        let mut guard = self.lock()?;
        let session = guard.get_mut(id).ok_or(SessionError::NotFound)?;
        *session = session.clone().toggled(flag, Utc::now());
        Ok(session.clone())
    }

    fn remove(&self, id: &SessionId) -> Result<(), SessionError> {
        let mut guard = self.lock()?;
        guard.remove(id).map(|_| ()).ok_or(SessionError::NotFound)
    }
}

/// Loads the configured catalog export, or the bundled sample products when none is set.
pub(crate) fn load_catalog(config: &CatalogConfig) -> Result<InMemoryCatalog, AppError> {
    let catalog = match &config.path {
        Some(path) => InMemoryCatalog::from_path(path)?,
        None => InMemoryCatalog::from_records(crate::demo::sample_products()),
    };
    info!(
        products = catalog.len(),
        source = config
            .path
            .as_ref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "bundled sample".to_string()),
        "product catalog loaded"
    );
    Ok(catalog)
}

/// Organic variants plus better-scoring peers from the same catalog.
pub(crate) fn suggestion_generator(catalog: &InMemoryCatalog) -> SuggestionGenerator {
    SuggestionGenerator::standard()
        .with_strategy(CategoryPeers::new(catalog.snapshot(), CATEGORY_PEER_LIMIT))
}

pub(crate) fn build_service(config: &CatalogConfig) -> Result<FoodService, AppError> {
    let catalog = load_catalog(config)?;
    let suggestions = suggestion_generator(&catalog);
    Ok(FoodLensService::with_components(
        Arc::new(catalog),
        Arc::new(InMemoryProfileStore::default()),
        HealthScorer::standard(),
        suggestions,
        config.search_limit,
    ))
}
