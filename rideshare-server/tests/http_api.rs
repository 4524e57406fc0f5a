//! Route tests against the full router with a mock geocoder.

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use chrono::NaiveDate;
use serde_json::{Value, json};
use tower::ServiceExt;

use rideshare_server::board::TripBoard;
use rideshare_server::geocode::{LocationResolver, MockGeocoder};
use rideshare_server::seed::{guest_driver, sample_geocoder, sample_trips};
use rideshare_server::session::SessionConfig;
use rideshare_server::web::{AppState, create_router};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

fn app_with(geocoder: MockGeocoder) -> (Router, TripBoard) {
    let board = TripBoard::new(sample_trips(today()).unwrap());
    let state = AppState::new(
        LocationResolver::new(geocoder),
        board.clone(),
        guest_driver().unwrap(),
        SessionConfig::default(),
    );
    (create_router(state), board)
}

fn app() -> (Router, TripBoard) {
    app_with(sample_geocoder().unwrap())
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let resp = app.oneshot(request).await.unwrap();
    let status = resp.status();
    let body = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, value)
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

async fn post(app: Router, uri: &str, payload: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap();
    send(app, request).await
}

fn trip_ids(body: &Value) -> Vec<&str> {
    body["trips"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn health() {
    let (app, _) = app();
    let resp = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = to_bytes(resp.into_body(), 1024).await.unwrap();
    assert_eq!(&body[..], b"ok");
}

#[tokio::test]
async fn place_search_returns_candidates() {
    let (app, _) = app();
    let (status, body) = get(app, "/api/places/search?q=curitiba").await;

    assert_eq!(status, StatusCode::OK);
    let places = body["places"].as_array().unwrap();
    assert_eq!(places.len(), 1);
    assert_eq!(places[0]["display_name"], "Curitiba, PR, Brasil");
    assert_eq!(places[0]["lat"], -25.4284);
    assert_eq!(places[0]["lng"], -49.2733);
}

#[tokio::test]
async fn place_search_respects_limit() {
    let (app, _) = app();
    let (_, body) = get(app, "/api/places/search?q=brasil&limit=3").await;
    assert_eq!(body["places"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn short_place_query_skips_provider() {
    let mock = sample_geocoder().unwrap();
    let (app, _) = app_with(mock.clone());
    let (status, body) = get(app, "/api/places/search?q=sp").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"places": []}));
    assert_eq!(mock.search_calls(), 0);
}

#[tokio::test]
async fn place_search_failure_is_empty() {
    let (app, _) = app_with(MockGeocoder::new().failing());
    let (status, body) = get(app, "/api/places/search?q=curitiba").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"places": []}));
}

#[tokio::test]
async fn reverse_names_position() {
    let (app, _) = app();
    let (status, body) = get(app, "/api/places/reverse?lat=-22.91&lng=-47.06").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"name": "Campinas, SP, Brasil", "status": "resolved"})
    );
}

#[tokio::test]
async fn reverse_failure_is_unavailable() {
    let (app, _) = app_with(MockGeocoder::new().failing());
    let (status, body) = get(app, "/api/places/reverse?lat=-22.91&lng=-47.06").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"name": null, "status": "unavailable"}));
}

#[tokio::test]
async fn reverse_rejects_out_of_range() {
    let (app, _) = app();
    let (status, body) = get(app, "/api/places/reverse?lat=91&lng=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("latitude"));
}

#[tokio::test]
async fn lists_sample_trips() {
    let (app, _) = app();
    let (status, body) = get(app, "/api/trips").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        trip_ids(&body),
        vec!["trip-1", "trip-2", "trip-3", "trip-4", "trip-5"]
    );
    let first = &body["trips"][0];
    assert_eq!(first["date"], "2024-06-01");
    assert_eq!(first["time"], "08:00");
    assert_eq!(first["origin"]["name"], "São Paulo, SP, Brasil");
    assert_eq!(first["driver"]["name"], "Ana Silva");
}

#[tokio::test]
async fn trip_search_matches_route_and_date() {
    let (app, _) = app();
    let criteria = json!({
        "origin": {"name": "são paulo", "lat": -23.55, "lng": -46.63},
        "destination": {"name": "RIO", "lat": -22.9, "lng": -43.17},
        "date": "2024-06-01"
    });
    let (status, body) = post(app, "/api/trips/search", criteria).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(trip_ids(&body), vec!["trip-1"]);
}

#[tokio::test]
async fn trip_search_without_date_matches_any_day() {
    let (app, _) = app();
    let criteria = json!({
        "origin": {"name": "Rio", "lat": -22.9, "lng": -43.17},
        "destination": {"name": "São Paulo", "lat": -23.55, "lng": -46.63},
        "date": ""
    });
    let (_, body) = post(app, "/api/trips/search", criteria).await;
    assert_eq!(trip_ids(&body), vec!["trip-5"]);
}

#[tokio::test]
async fn incomplete_or_malformed_criteria_match_nothing() {
    let (app, _) = app();
    let no_destination = json!({
        "origin": {"name": "São Paulo", "lat": -23.55, "lng": -46.63}
    });
    let (status, body) = post(app.clone(), "/api/trips/search", no_destination).await;
    assert_eq!(status, StatusCode::OK);
    assert!(trip_ids(&body).is_empty());

    let bad_date = json!({
        "origin": {"name": "São Paulo", "lat": -23.55, "lng": -46.63},
        "destination": {"name": "Rio", "lat": -22.9, "lng": -43.17},
        "date": "amanhã"
    });
    let (status, body) = post(app, "/api/trips/search", bad_date).await;
    assert_eq!(status, StatusCode::OK);
    assert!(trip_ids(&body).is_empty());
}

#[tokio::test]
async fn offering_a_trip_prepends_it() {
    let (app, board) = app();
    let before = board.len().await;

    let offer = json!({
        "origin": {"name": "Santos, SP, Brasil", "lat": -23.9608, "lng": -46.3336},
        "destination": {"name": "São Paulo, SP, Brasil", "lat": -23.5505, "lng": -46.6333},
        "date": "2024-06-05",
        "time": "06:15",
        "price": 0,
        "seats": 2
    });
    let (status, created) = post(app.clone(), "/api/trips", offer).await;

    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap();
    assert!(id.starts_with("trip-"));
    assert_eq!(created["seats"], 2);
    assert_eq!(created["price"], 0);
    assert_eq!(created["driver"]["id"], "user-0");

    assert_eq!(board.len().await, before + 1);
    let (_, listing) = get(app.clone(), "/api/trips").await;
    assert_eq!(trip_ids(&listing)[0], id);

    let (status, fetched) = get(app, &format!("/api/trips/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["id"], id);
}

#[tokio::test]
async fn offer_without_destination_is_rejected() {
    let (app, board) = app();
    let offer = json!({
        "origin": {"name": "Santos, SP, Brasil", "lat": -23.9608, "lng": -46.3336},
        "date": "2024-06-05",
        "time": "06:15"
    });
    let (status, body) = post(app, "/api/trips", offer).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("destination"));
    assert_eq!(board.len().await, 5);
}

#[tokio::test]
async fn offer_with_too_many_seats_is_rejected() {
    let (app, _) = app();
    let offer = json!({
        "origin": {"name": "Santos, SP, Brasil", "lat": -23.9608, "lng": -46.3336},
        "destination": {"name": "São Paulo, SP, Brasil", "lat": -23.5505, "lng": -46.6333},
        "date": "2024-06-05",
        "time": "06:15",
        "seats": 7
    });
    let (status, _) = post(app, "/api/trips", offer).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_trip_is_not_found() {
    let (app, _) = app();
    let (status, body) = get(app, "/api/trips/trip-404").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "No trip with id trip-404");
}
