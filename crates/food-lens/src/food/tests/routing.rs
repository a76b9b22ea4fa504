use super::common::*;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::food::catalog::InMemoryCatalog;
use crate::food::router::{product_handler, start_session_handler};
use crate::food::FoodLensService;

fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).expect("serializable body")))
        .expect("valid request")
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("valid request")
}

#[tokio::test]
async fn score_route_returns_assessment() {
    let (service, _) = build_service();
    let router = food_router_with_service(service);
    let body = serde_json::to_value(chips()).expect("record serializes");

    let response = router
        .oneshot(json_request("POST", "/api/v1/foods/score", &body))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["score"]["overall"], 63);
    assert_eq!(payload["score"]["nutrient_density"], 10);
    assert!(payload["adjustments"].as_array().is_some_and(|items| !items.is_empty()));
}

#[tokio::test]
async fn rank_route_filters_by_profile_and_label() {
    let (service, _) = build_service();
    let router = food_router_with_service(service);
    let body = json!({
        "products": sample_catalog().records(),
        "profile": { "low_sugar": true, "gluten_free": true },
        "label": "organic",
    });

    let response = router
        .oneshot(json_request("POST", "/api/v1/foods/rank", &body))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let names: Vec<_> = payload
        .as_array()
        .expect("array payload")
        .iter()
        .map(|entry| entry["food"]["name"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(names, vec!["Organic Quinoa", "Omega Seed Granola"]);
}

#[tokio::test]
async fn alternatives_route_returns_organic_variant() {
    let (service, _) = build_service();
    let router = food_router_with_service(service);
    let body = serde_json::to_value(chips()).expect("record serializes");

    let response = router
        .oneshot(json_request("POST", "/api/v1/foods/alternatives", &body))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload[0]["name"], "Organic Processed Snack Chips");
}

#[tokio::test]
async fn product_route_returns_not_found_for_unknown_barcode() {
    let (service, _) = build_service();
    let router = food_router_with_service(service);

    let response = router
        .oneshot(empty_request("GET", "/api/v1/products/0000"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let payload = read_json_body(response).await;
    assert!(payload["error"].as_str().is_some_and(|error| error.contains("0000")));
}

#[tokio::test]
async fn product_handler_returns_view() {
    let (service, _) = build_service();

    let response = product_handler::<InMemoryCatalog, MemorySessions>(
        State(Arc::new(service)),
        Path("737628064502".to_string()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["food"]["name"], "Organic Quinoa");
    assert_eq!(payload["assessment"]["score"]["overall"], 80);
    assert_eq!(payload["grade"], "A");
}

#[tokio::test]
async fn search_route_rejects_unknown_label() {
    let (service, _) = build_service();
    let router = food_router_with_service(service);

    let response = router
        .oneshot(empty_request("GET", "/api/v1/products?q=cereal&label=keto"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn search_route_returns_not_found_without_matches() {
    let (service, _) = build_service();
    let router = food_router_with_service(service);

    let response = router
        .oneshot(empty_request("GET", "/api/v1/products?q=kombucha"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn session_lifecycle_over_http() {
    let (service, _) = build_service();
    let router = food_router_with_service(service);

    let created = router
        .clone()
        .oneshot(empty_request("POST", "/api/v1/sessions"))
        .await
        .expect("route executes");
    assert_eq!(created.status(), StatusCode::CREATED);
    let session = read_json_body(created).await;
    let id = session["session_id"].as_str().expect("session id").to_string();
    assert_eq!(session["profile"]["vegan"], false);

    let toggled = router
        .clone()
        .oneshot(empty_request(
            "POST",
            &format!("/api/v1/sessions/{id}/toggle/highFiber"),
        ))
        .await
        .expect("route executes");
    assert_eq!(toggled.status(), StatusCode::OK);
    assert_eq!(read_json_body(toggled).await["profile"]["high_fiber"], true);

    let recommendations = router
        .clone()
        .oneshot(empty_request(
            "GET",
            &format!("/api/v1/sessions/{id}/recommendations"),
        ))
        .await
        .expect("route executes");
    assert_eq!(recommendations.status(), StatusCode::OK);
    let groups = read_json_body(recommendations).await;
    assert_eq!(groups[0]["title"], "High Fiber Picks");

    let searched = router
        .clone()
        .oneshot(empty_request(
            "GET",
            &format!("/api/v1/products?q=cereal&session={id}"),
        ))
        .await
        .expect("route executes");
    assert_eq!(searched.status(), StatusCode::OK);
    let results = read_json_body(searched).await;
    assert_eq!(results["ranking"], "fiber");
    assert_eq!(results["results"][0]["food"]["name"], "Bran Flakes");

    let deleted = router
        .clone()
        .oneshot(empty_request("DELETE", &format!("/api/v1/sessions/{id}")))
        .await
        .expect("route executes");
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let missing = router
        .oneshot(empty_request("GET", &format!("/api/v1/sessions/{id}")))
        .await
        .expect("route executes");
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn start_session_handler_returns_conflict() {
    let service = FoodLensService::new(Arc::new(sample_catalog()), Arc::new(ConflictSessions));

    let response =
        start_session_handler::<InMemoryCatalog, ConflictSessions>(State(Arc::new(service))).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn unavailable_store_maps_to_internal_error() {
    let service = FoodLensService::new(Arc::new(sample_catalog()), Arc::new(UnavailableSessions));
    let router = food_router_with_service(service);

    let response = router
        .oneshot(empty_request("GET", "/api/v1/sessions/session-000001"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
