/// Event API Handlers
///
/// `GET /api/v1/events` (map) and `GET /api/v1/events/{eventId}` (details)
use actix_web::{get, web, HttpRequest, HttpResponse};
use error_types::ErrorResponse;
use tracing::debug;
use validator::Validate;

use super::AppState;
use crate::dto::{EventDetailsResponse, EventMapQuery, GeoJsonFeatureCollection};
use crate::error::{ApiError, AppError};

/// Events or event clusters for the map as GeoJSON
///
/// Backend failures yield an empty collection, never an error.
#[utoipa::path(
    get,
    path = "/api/v1/events",
    tag = "events",
    params(EventMapQuery),
    responses(
        (status = 200, description = "GeoJSON feature collection", body = GeoJsonFeatureCollection),
        (status = 400, description = "Invalid query parameters", body = ErrorResponse)
    )
)]
#[get("/api/v1/events")]
pub async fn get_events_for_map(
    req: HttpRequest,
    query: web::Query<EventMapQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let query = query.into_inner();
    query
        .validate()
        .map_err(|e| ApiError::new(AppError::from(e), &req))?;

    let collection = state
        .event_service
        .events_for_map(&query)
        .await
        .map_err(|e| ApiError::new(e, &req))?;
    debug!(features = collection.features.len(), "map response ready");

    Ok(HttpResponse::Ok().json(collection))
}

/// Details of one event with the articles that mentioned it
#[utoipa::path(
    get,
    path = "/api/v1/events/{eventId}",
    tag = "events",
    params(
        ("eventId" = i64, Path, description = "GDELT global event id", example = 1234567890)
    ),
    responses(
        (status = 200, description = "Event details", body = EventDetailsResponse),
        (status = 400, description = "Event id is not a number", body = ErrorResponse),
        (status = 404, description = "Unknown event", body = ErrorResponse),
        (status = 500, description = "Search backend failure", body = ErrorResponse)
    )
)]
#[get("/api/v1/events/{eventId}")]
pub async fn get_event_details(
    req: HttpRequest,
    event_id: web::Path<i64>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let details = state
        .event_service
        .event_details(event_id.into_inner())
        .await
        .map_err(|e| ApiError::new(e, &req))?;

    Ok(HttpResponse::Ok().json(details))
}
