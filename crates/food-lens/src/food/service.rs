use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::catalog::{CandidateSet, CatalogError, ProductCatalog, DEFAULT_SEARCH_LIMIT};
use super::domain::{AlternativeSuggestion, Barcode, FoodRecord, HealthScore, ScoreGrade};
use super::profile::{
    apply_with, DietaryProfile, LabelFilter, ProductFilter, ProfileFlag, RankingMode,
    UnknownLabelFilter,
};
use super::scoring::{HealthAssessment, HealthScorer};
use super::session::{ProfileSession, ProfileStore, SessionError, SessionId};
use super::suggestions::SuggestionGenerator;

/// Record paired with its score, as shown in result lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredFood {
    pub food: FoodRecord,
    pub health_score: HealthScore,
    pub grade: ScoreGrade,
}

/// Full detail for a single product lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductView {
    pub food: FoodRecord,
    pub assessment: HealthAssessment,
    pub grade: ScoreGrade,
    pub alternatives: Vec<AlternativeSuggestion>,
}

/// Filtered and ranked search output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    pub query: String,
    pub label: LabelFilter,
    pub profile: DietaryProfile,
    pub ranking: RankingMode,
    pub results: Vec<ScoredFood>,
}

/// Candidate set after the profile pipeline ran over it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateGroup {
    pub set: CandidateSet,
    pub title: String,
    pub products: Vec<ScoredFood>,
}

/// Service composing the catalog, session store, scorer, and suggestion strategies.
pub struct FoodLensService<C, S> {
    catalog: Arc<C>,
    sessions: Arc<S>,
    scorer: Arc<HealthScorer>,
    suggestions: Arc<SuggestionGenerator>,
    search_limit: usize,
}

static SESSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_session_id() -> SessionId {
    let id = SESSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SessionId(format!("session-{id:06}"))
}

impl<C, S> FoodLensService<C, S>
where
    C: ProductCatalog + 'static,
    S: ProfileStore + 'static,
{
    pub fn new(catalog: Arc<C>, sessions: Arc<S>) -> Self {
        Self::with_components(
            catalog,
            sessions,
            HealthScorer::standard(),
            SuggestionGenerator::standard(),
            DEFAULT_SEARCH_LIMIT,
        )
    }

    pub fn with_components(
        catalog: Arc<C>,
        sessions: Arc<S>,
        scorer: HealthScorer,
        suggestions: SuggestionGenerator,
        search_limit: usize,
    ) -> Self {
        Self {
            catalog,
            sessions,
            scorer: Arc::new(scorer),
            suggestions: Arc::new(suggestions),
            search_limit: search_limit.max(1),
        }
    }

    pub fn scorer(&self) -> &HealthScorer {
        &self.scorer
    }

    pub fn assess(&self, food: &FoodRecord) -> HealthAssessment {
        self.scorer.assess(food)
    }

    pub fn alternatives(&self, food: &FoodRecord) -> Vec<AlternativeSuggestion> {
        self.suggestions.suggest(food)
    }

    /// Runs the profile pipeline plus the label filter, then scores the survivors.
    pub fn rank(
        &self,
        products: &[FoodRecord],
        profile: &DietaryProfile,
        label: LabelFilter,
    ) -> Vec<ScoredFood> {
        let ranked = apply_with(products, profile, |food| label.admits(food));
        self.scored(ranked)
    }

    pub fn product(&self, barcode: &Barcode) -> Result<ProductView, FoodServiceError> {
        let food = self.catalog.lookup(barcode)?;
        let assessment = self.scorer.assess(&food);
        let alternatives = self.suggestions.suggest(&food);
        debug!(%barcode, overall = assessment.score.overall, "product scored");

        Ok(ProductView {
            grade: assessment.score.grade(),
            food,
            assessment,
            alternatives,
        })
    }

    /// Searches the catalog and narrows the hits with the session profile (or an
    /// empty profile when no session is given) and the label filter.
    pub fn search(
        &self,
        query: &str,
        label: Option<&str>,
        session: Option<&SessionId>,
    ) -> Result<SearchResults, FoodServiceError> {
        let label = match label {
            Some(raw) => raw.parse::<LabelFilter>()?,
            None => LabelFilter::All,
        };
        let profile = match session {
            Some(id) => self.session(id)?.profile,
            None => DietaryProfile::default(),
        };

        let hits = self.catalog.search(query, self.search_limit)?;
        let results = self.rank(&hits, &profile, label);
        debug!(query, hits = hits.len(), kept = results.len(), "search ranked");

        Ok(SearchResults {
            query: query.to_string(),
            label,
            profile,
            ranking: profile.ranking_mode(),
            results,
        })
    }

    pub fn start_session(&self) -> Result<ProfileSession, FoodServiceError> {
        let session = ProfileSession::start(next_session_id(), Utc::now());
        let stored = self.sessions.insert(session)?;
        info!(session = %stored.session_id.0, "profile session started");
        Ok(stored)
    }

    pub fn session(&self, id: &SessionId) -> Result<ProfileSession, FoodServiceError> {
        let session = self.sessions.fetch(id)?.ok_or(SessionError::NotFound)?;
        Ok(session)
    }

    /// Toggles a flag by name. Unknown names leave the profile as it was.
    pub fn toggle(&self, id: &SessionId, flag: &str) -> Result<ProfileSession, FoodServiceError> {
        match flag.parse::<ProfileFlag>() {
            Ok(flag) => Ok(self.sessions.toggle(id, flag)?),
            Err(err) => {
                debug!(session = %id.0, %err, "ignoring unknown profile flag");
                self.session(id)
            }
        }
    }

    pub fn end_session(&self, id: &SessionId) -> Result<(), FoodServiceError> {
        self.sessions.remove(id)?;
        info!(session = %id.0, "profile session ended");
        Ok(())
    }

    /// Candidate groups for the session's health goals, each run through the profile.
    /// Groups left empty by filtering are omitted.
    pub fn recommendations(&self, id: &SessionId) -> Result<Vec<CandidateGroup>, FoodServiceError> {
        let profile = self.session(id)?.profile;
        let mut groups = Vec::new();

        for set in profile.candidate_sets() {
            let candidates = self.catalog.candidates(set)?;
            let products = self.rank(&candidates, &profile, LabelFilter::All);
            if products.is_empty() {
                continue;
            }
            groups.push(CandidateGroup {
                set,
                title: set.label().to_string(),
                products,
            });
        }

        Ok(groups)
    }

    fn scored(&self, foods: Vec<FoodRecord>) -> Vec<ScoredFood> {
        let scores = self.scorer.score_batch(&foods);
        foods
            .into_iter()
            .zip(scores)
            .map(|(food, health_score)| ScoredFood {
                grade: health_score.grade(),
                food,
                health_score,
            })
            .collect()
    }
}

/// Error raised by the food service.
#[derive(Debug, thiserror::Error)]
pub enum FoodServiceError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    InvalidLabel(#[from] UnknownLabelFilter),
}
