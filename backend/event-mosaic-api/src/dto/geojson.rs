use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

const FEATURE_COLLECTION: &str = "FeatureCollection";
const FEATURE: &str = "Feature";
const POINT: &str = "Point";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GeoJsonFeatureCollection {
    #[serde(rename = "type")]
    #[schema(example = "FeatureCollection")]
    pub kind: String,
    pub features: Vec<GeoJsonFeature>,
}

impl GeoJsonFeatureCollection {
    pub fn new(features: Vec<GeoJsonFeature>) -> Self {
        Self {
            kind: FEATURE_COLLECTION.to_string(),
            features,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GeoJsonFeature {
    #[serde(rename = "type")]
    #[schema(example = "Feature")]
    pub kind: String,
    pub geometry: GeoJsonGeometry,
    pub properties: GeoJsonProperties,
}

impl GeoJsonFeature {
    pub fn new(geometry: GeoJsonGeometry, properties: GeoJsonProperties) -> Self {
        Self {
            kind: FEATURE.to_string(),
            geometry,
            properties,
        }
    }
}

/// Point geometry; coordinates are `[lon, lat]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GeoJsonGeometry {
    #[serde(rename = "type")]
    #[schema(example = "Point")]
    pub kind: String,
    #[schema(example = json!([2.35, 48.85]))]
    pub coordinates: [f64; 2],
}

impl GeoJsonGeometry {
    pub fn point(lon: f64, lat: f64) -> Self {
        Self {
            kind: POINT.to_string(),
            coordinates: [lon, lat],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeoJsonProperties {
    /// Set for single events and single-event clusters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_tone: Option<f64>,
    /// Number of events behind the point, 1 for an individual event
    pub cluster_count: i64,
}
