use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use super::catalog::{CatalogError, ProductCatalog};
use super::domain::{Barcode, FoodRecord};
use super::profile::{DietaryProfile, LabelFilter};
use super::service::{FoodLensService, FoodServiceError};
use super::session::{ProfileStore, SessionError, SessionId};

/// Router builder exposing scoring, catalog, and session endpoints.
pub fn food_router<C, S>(service: Arc<FoodLensService<C, S>>) -> Router
where
    C: ProductCatalog + 'static,
    S: ProfileStore + 'static,
{
    Router::new()
        .route("/api/v1/foods/score", post(score_handler::<C, S>))
        .route("/api/v1/foods/rank", post(rank_handler::<C, S>))
        .route(
            "/api/v1/foods/alternatives",
            post(alternatives_handler::<C, S>),
        )
        .route("/api/v1/products", get(search_handler::<C, S>))
        .route("/api/v1/products/:barcode", get(product_handler::<C, S>))
        .route("/api/v1/sessions", post(start_session_handler::<C, S>))
        .route(
            "/api/v1/sessions/:session_id",
            get(session_handler::<C, S>).delete(end_session_handler::<C, S>),
        )
        .route(
            "/api/v1/sessions/:session_id/toggle/:flag",
            post(toggle_handler::<C, S>),
        )
        .route(
            "/api/v1/sessions/:session_id/recommendations",
            get(recommendations_handler::<C, S>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct RankRequest {
    pub products: Vec<FoodRecord>,
    #[serde(default)]
    pub profile: DietaryProfile,
    #[serde(default)]
    pub label: LabelFilter,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SearchParams {
    #[serde(default)]
    pub q: String,
    pub label: Option<String>,
    pub session: Option<String>,
}

pub(crate) async fn score_handler<C, S>(
    State(service): State<Arc<FoodLensService<C, S>>>,
    axum::Json(food): axum::Json<FoodRecord>,
) -> Response
where
    C: ProductCatalog + 'static,
    S: ProfileStore + 'static,
{
    let assessment = service.assess(&food);
    (StatusCode::OK, axum::Json(assessment)).into_response()
}

pub(crate) async fn rank_handler<C, S>(
    State(service): State<Arc<FoodLensService<C, S>>>,
    axum::Json(request): axum::Json<RankRequest>,
) -> Response
where
    C: ProductCatalog + 'static,
    S: ProfileStore + 'static,
{
    let ranked = service.rank(&request.products, &request.profile, request.label);
    (StatusCode::OK, axum::Json(ranked)).into_response()
}

pub(crate) async fn alternatives_handler<C, S>(
    State(service): State<Arc<FoodLensService<C, S>>>,
    axum::Json(food): axum::Json<FoodRecord>,
) -> Response
where
    C: ProductCatalog + 'static,
    S: ProfileStore + 'static,
{
    let alternatives = service.alternatives(&food);
    (StatusCode::OK, axum::Json(alternatives)).into_response()
}

pub(crate) async fn product_handler<C, S>(
    State(service): State<Arc<FoodLensService<C, S>>>,
    Path(barcode): Path<String>,
) -> Response
where
    C: ProductCatalog + 'static,
    S: ProfileStore + 'static,
{
    match service.product(&Barcode::new(barcode)) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn search_handler<C, S>(
    State(service): State<Arc<FoodLensService<C, S>>>,
    Query(params): Query<SearchParams>,
) -> Response
where
    C: ProductCatalog + 'static,
    S: ProfileStore + 'static,
{
    let session = params.session.map(SessionId);
    match service.search(&params.q, params.label.as_deref(), session.as_ref()) {
        Ok(results) => (StatusCode::OK, axum::Json(results)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn start_session_handler<C, S>(
    State(service): State<Arc<FoodLensService<C, S>>>,
) -> Response
where
    C: ProductCatalog + 'static,
    S: ProfileStore + 'static,
{
    match service.start_session() {
        Ok(session) => (StatusCode::CREATED, axum::Json(session)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn session_handler<C, S>(
    State(service): State<Arc<FoodLensService<C, S>>>,
    Path(session_id): Path<String>,
) -> Response
where
    C: ProductCatalog + 'static,
    S: ProfileStore + 'static,
{
    match service.session(&SessionId(session_id)) {
        Ok(session) => (StatusCode::OK, axum::Json(session)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn end_session_handler<C, S>(
    State(service): State<Arc<FoodLensService<C, S>>>,
    Path(session_id): Path<String>,
) -> Response
where
    C: ProductCatalog + 'static,
    S: ProfileStore + 'static,
{
    match service.end_session(&SessionId(session_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn toggle_handler<C, S>(
    State(service): State<Arc<FoodLensService<C, S>>>,
    Path((session_id, flag)): Path<(String, String)>,
) -> Response
where
    C: ProductCatalog + 'static,
    S: ProfileStore + 'static,
{
    match service.toggle(&SessionId(session_id), &flag) {
        Ok(session) => (StatusCode::OK, axum::Json(session)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn recommendations_handler<C, S>(
    State(service): State<Arc<FoodLensService<C, S>>>,
    Path(session_id): Path<String>,
) -> Response
where
    C: ProductCatalog + 'static,
    S: ProfileStore + 'static,
{
    match service.recommendations(&SessionId(session_id)) {
        Ok(groups) => (StatusCode::OK, axum::Json(groups)).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: FoodServiceError) -> Response {
    let status = match &err {
        FoodServiceError::Catalog(CatalogError::NotFound(_)) => StatusCode::NOT_FOUND,
        FoodServiceError::Catalog(CatalogError::FetchFailed(_)) => StatusCode::BAD_GATEWAY,
        FoodServiceError::Session(SessionError::NotFound) => StatusCode::NOT_FOUND,
        FoodServiceError::Session(SessionError::Conflict) => StatusCode::CONFLICT,
        FoodServiceError::InvalidLabel(_) => StatusCode::BAD_REQUEST,
        FoodServiceError::Session(SessionError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    if status.is_server_error() {
        warn!(error = %err, "food request failed");
    }

    let payload = json!({
        "error": err.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
