use crate::models::{EventDocument, GeoPoint};

/// GeoType 1 is a country centroid
const COUNTRY_GEO_TYPE: i32 = 1;

/// Pick the most precise location of an event.
///
/// Precise (sub-country) locations win in the order action, actor1, actor2;
/// otherwise the action location is used whatever its precision.
pub fn select_best_coordinates(event: &EventDocument) -> Option<GeoPoint> {
    let precise = [
        (event.action_geo_type, event.action_location),
        (event.actor1_geo_type, event.actor1_location),
        (event.actor2_geo_type, event.actor2_location),
    ]
    .into_iter()
    .find_map(|(geo_type, location)| match geo_type {
        Some(t) if t > COUNTRY_GEO_TYPE => location,
        _ => None,
    });

    precise.or(event.action_location)
}
