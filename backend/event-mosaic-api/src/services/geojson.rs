use tracing::debug;

use super::geolocation::select_best_coordinates;
use crate::dto::{GeoJsonFeature, GeoJsonFeatureCollection, GeoJsonGeometry};
use crate::mapper;
use crate::models::EventDocument;
use crate::repository::ClusterBucket;

/// Point feature for an event, `None` when it has no usable location
pub fn convert_event_to_feature(event: &EventDocument) -> Option<GeoJsonFeature> {
    let Some(point) = select_best_coordinates(event) else {
        debug!(event_id = event.global_event_id, "event skipped, no coordinates");
        return None;
    };

    Some(GeoJsonFeature::new(
        GeoJsonGeometry::point(point.lon, point.lat),
        mapper::event_properties(event),
    ))
}

pub fn convert_to_geojson(events: &[EventDocument]) -> GeoJsonFeatureCollection {
    let features: Vec<GeoJsonFeature> = events.iter().filter_map(convert_event_to_feature).collect();
    debug!(
        converted = features.len(),
        total = events.len(),
        "converted events to GeoJSON"
    );
    GeoJsonFeatureCollection::new(features)
}

/// One point per geotile bucket, placed at the tile centre
pub fn convert_clusters(buckets: &[ClusterBucket]) -> GeoJsonFeatureCollection {
    let features = buckets
        .iter()
        .map(|bucket| {
            GeoJsonFeature::new(
                GeoJsonGeometry::point(bucket.centre.lon, bucket.centre.lat),
                mapper::cluster_properties(
                    bucket.doc_count,
                    bucket.avg_tone,
                    bucket.sample_event_id,
                ),
            )
        })
        .collect();
    GeoJsonFeatureCollection::new(features)
}
