//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::domain::{
    Coordinates, InvalidCoordinates, InvalidTrip, TripId, TripOffer, parse_date, parse_time,
};
use crate::geocode::Geocoder;

use super::dto::*;
use super::state::AppState;

/// Upper bound on places returned by one search.
const MAX_PLACE_LIMIT: usize = 20;

/// Create the application router.
pub fn create_router<G: Geocoder>(state: AppState<G>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/places/search", get(search_places::<G>))
        .route("/api/places/reverse", get(reverse_place::<G>))
        .route("/api/trips", get(list_trips::<G>).post(offer_trip::<G>))
        .route("/api/trips/search", post(search_trips::<G>))
        .route("/api/trips/:id", get(get_trip::<G>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Search places by name.
///
/// Provider failures degrade to an empty list.
async fn search_places<G: Geocoder>(
    State(state): State<AppState<G>>,
    Query(req): Query<PlaceSearchRequest>,
) -> Json<PlaceSearchResponse> {
    let config = &state.config;
    let limit = req.limit.unwrap_or(config.result_limit).min(MAX_PLACE_LIMIT);

    let places = state
        .resolver
        .forward_search(req.q.trim(), limit, &config.language, &config.country)
        .await
        .unwrap_or_else(|e| {
            warn!(query = req.q.as_str(), kind = %e.kind(), error = %e, "place search failed");
            Vec::new()
        });

    Json(PlaceSearchResponse { places })
}

/// Name the place at a position.
///
/// Provider failures degrade to an "unavailable" answer rather than an error.
async fn reverse_place<G: Geocoder>(
    State(state): State<AppState<G>>,
    Query(req): Query<ReverseQuery>,
) -> Result<Json<PlaceNameResponse>, AppError> {
    let coordinates = Coordinates::new(req.lat, req.lng)?;

    let response = match state
        .resolver
        .reverse_resolve(coordinates, &state.config.language)
        .await
    {
        Ok(name) => PlaceNameResponse {
            name: Some(name.into_string()),
            status: LookupStatus::Resolved,
        },
        Err(e) => {
            warn!(%coordinates, kind = %e.kind(), error = %e, "reverse lookup failed");
            PlaceNameResponse {
                name: None,
                status: LookupStatus::Unavailable,
            }
        }
    };

    Ok(Json(response))
}

/// Every published trip, newest first.
async fn list_trips<G: Geocoder>(State(state): State<AppState<G>>) -> Json<TripListResponse> {
    Json(TripListResponse {
        trips: state.board.all().await,
    })
}

/// A single trip by id.
async fn get_trip<G: Geocoder>(
    State(state): State<AppState<G>>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let trip = state
        .board
        .get(&TripId::new(&id))
        .await
        .ok_or_else(|| AppError::NotFound {
            message: format!("No trip with id {id}"),
        })?;

    Ok(Json(trip).into_response())
}

/// Search published trips.
///
/// Criteria that cannot match (missing endpoints, malformed date) give an
/// empty list, never an error.
async fn search_trips<G: Geocoder>(
    State(state): State<AppState<G>>,
    Json(req): Json<TripSearchRequest>,
) -> Json<TripListResponse> {
    let trips = match req.to_criteria() {
        Some(criteria) => state.board.search(&criteria).await,
        None => Vec::new(),
    };

    Json(TripListResponse { trips })
}

/// Publish a trip offer.
async fn offer_trip<G: Geocoder>(
    State(state): State<AppState<G>>,
    Json(req): Json<OfferTripRequest>,
) -> Result<Response, AppError> {
    let offer = offer_from_request(&req)?;
    let trip = state.board.add(offer, state.guest.clone()).await;

    Ok((StatusCode::CREATED, Json(trip)).into_response())
}

/// Validate an offer form.
fn offer_from_request(req: &OfferTripRequest) -> Result<TripOffer, AppError> {
    let origin = req
        .origin
        .as_ref()
        .and_then(LocationInput::to_location)
        .ok_or_else(|| missing("origin must be selected from the suggestions"))?;
    let destination = req
        .destination
        .as_ref()
        .and_then(LocationInput::to_location)
        .ok_or_else(|| missing("destination must be selected from the suggestions"))?;

    let date = req
        .date
        .as_deref()
        .filter(|d| !d.is_empty())
        .ok_or_else(|| missing("date is required"))?;
    let time = req
        .time
        .as_deref()
        .filter(|t| !t.is_empty())
        .ok_or_else(|| missing("time is required"))?;

    Ok(TripOffer::new(
        origin,
        destination,
        parse_date(date)?,
        parse_time(time)?,
        req.price,
        req.seats,
    )?)
}

fn missing(message: &str) -> AppError {
    AppError::BadRequest {
        message: message.to_string(),
    }
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
}

impl From<InvalidCoordinates> for AppError {
    fn from(e: InvalidCoordinates) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<InvalidTrip> for AppError {
    fn from(e: InvalidTrip) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
        };

        warn!(%status, reason = message.as_str(), "request rejected");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
