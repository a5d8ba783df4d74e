use utoipa::OpenApi;

use crate::dto::{
    EventDetailsResponse, GeoJsonFeature, GeoJsonFeatureCollection, GeoJsonGeometry,
    GeoJsonProperties, MentionSummary,
};
use crate::handlers::events;
use error_types::ErrorResponse;

pub const OPENAPI_PATH: &str = "/api/v1/openapi.json";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Event Mosaic API",
        version = "1.0.0",
        description = "GDELT events as GeoJSON for the map, and per-event details with mentions."
    ),
    paths(events::get_events_for_map, events::get_event_details),
    components(schemas(
        GeoJsonFeatureCollection,
        GeoJsonFeature,
        GeoJsonGeometry,
        GeoJsonProperties,
        EventDetailsResponse,
        MentionSummary,
        ErrorResponse
    )),
    tags((name = "events", description = "Map and details endpoints"))
)]
pub struct ApiDoc;

pub fn doc() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
