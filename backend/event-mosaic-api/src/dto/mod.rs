//! Request and response shapes of the public API

mod details;
mod geojson;
mod query;

pub use details::{EventDetailsResponse, MentionSummary};
pub use geojson::{GeoJsonFeature, GeoJsonFeatureCollection, GeoJsonGeometry, GeoJsonProperties};
pub use query::EventMapQuery;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serializer;

/// `yyyy-MM-ddTHH:mm:ssXXX`, with `Z` for UTC
pub(crate) fn serialize_timestamp<S>(
    value: &Option<DateTime<Utc>>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(ts) => serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Secs, true)),
        None => serializer.serialize_none(),
    }
}
