use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// WGS84 point as stored in an Elasticsearch `geo_point` field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGeoPoint")]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Centre of a `geotile_grid` bucket, keyed `"{zoom}/{x}/{y}"`
    pub fn from_geotile_key(key: &str) -> Option<Self> {
        let mut parts = key.split('/').map(|p| p.parse::<u32>().ok());
        let (zoom, x, y) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(Some(z)), Some(Some(x)), Some(Some(y)), None) => (z, x, y),
            _ => return None,
        };
        if zoom > 29 {
            return None;
        }

        let tiles = f64::from(1u32 << zoom);
        if f64::from(x) >= tiles || f64::from(y) >= tiles {
            return None;
        }

        let lon = (f64::from(x) + 0.5) / tiles * 360.0 - 180.0;
        let n = PI * (1.0 - 2.0 * (f64::from(y) + 0.5) / tiles);
        let lat = n.sinh().atan().to_degrees();
        Some(Self { lat, lon })
    }

    /// GeoJSON coordinate order
    pub fn to_lon_lat(self) -> [f64; 2] {
        [self.lon, self.lat]
    }
}

/// Every `geo_point` encoding Elasticsearch accepts in `_source`, except geohash.
/// `Array` comes first: derived struct visitors also accept sequences.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawGeoPoint {
    Array([f64; 2]),
    Object { lat: f64, lon: f64 },
    GeoJson { coordinates: [f64; 2] },
    Text(String),
}

impl TryFrom<RawGeoPoint> for GeoPoint {
    type Error = String;

    fn try_from(raw: RawGeoPoint) -> Result<Self, Self::Error> {
        match raw {
            RawGeoPoint::Object { lat, lon } => Ok(Self { lat, lon }),
            RawGeoPoint::GeoJson { coordinates: [lon, lat] } | RawGeoPoint::Array([lon, lat]) => {
                Ok(Self { lat, lon })
            }
            RawGeoPoint::Text(text) => {
                let (lat, lon) = text
                    .split_once(',')
                    .ok_or_else(|| format!("unsupported geo_point string: {text}"))?;
                let lat = lat.trim().parse::<f64>().map_err(|e| e.to_string())?;
                let lon = lon.trim().parse::<f64>().map_err(|e| e.to_string())?;
                Ok(Self { lat, lon })
            }
        }
    }
}

/// Rectangular filter area in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    /// Inclusive on every edge
    pub fn contains(&self, point: &GeoPoint) -> bool {
        point.lat >= self.min_lat
            && point.lat <= self.max_lat
            && point.lon >= self.min_lon
            && point.lon <= self.max_lon
    }

    pub fn top_left(&self) -> GeoPoint {
        GeoPoint::new(self.max_lat, self.min_lon)
    }

    pub fn bottom_right(&self) -> GeoPoint {
        GeoPoint::new(self.min_lat, self.max_lon)
    }
}
