use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{lenient, lenient_timestamp, GeoPoint};

/// GDELT 2.0 event as indexed in `gdelt-events-*`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDocument {
    pub global_event_id: i64,

    /// Stored as epoch millis
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub event_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub actor1_code: Option<String>,
    #[serde(default)]
    pub actor1_name: Option<String>,
    #[serde(default)]
    pub actor1_country_code: Option<String>,
    #[serde(default)]
    pub actor1_known_group_code: Option<String>,
    #[serde(default)]
    pub actor1_ethnic_code: Option<String>,
    #[serde(default)]
    pub actor1_religion1_code: Option<String>,
    #[serde(default)]
    pub actor1_religion2_code: Option<String>,
    #[serde(default)]
    pub actor1_type1_code: Option<String>,
    #[serde(default)]
    pub actor1_type2_code: Option<String>,
    #[serde(default)]
    pub actor1_type3_code: Option<String>,

    #[serde(default)]
    pub actor2_code: Option<String>,
    #[serde(default)]
    pub actor2_name: Option<String>,
    #[serde(default)]
    pub actor2_country_code: Option<String>,
    #[serde(default)]
    pub actor2_known_group_code: Option<String>,
    #[serde(default)]
    pub actor2_ethnic_code: Option<String>,
    #[serde(default)]
    pub actor2_religion1_code: Option<String>,
    #[serde(default)]
    pub actor2_religion2_code: Option<String>,
    #[serde(default)]
    pub actor2_type1_code: Option<String>,
    #[serde(default)]
    pub actor2_type2_code: Option<String>,
    #[serde(default)]
    pub actor2_type3_code: Option<String>,

    #[serde(default)]
    pub is_root_event: Option<i8>,
    /// CAMEO code
    #[serde(default)]
    pub event_code: Option<String>,
    #[serde(default)]
    pub event_base_code: Option<String>,
    #[serde(default)]
    pub event_root_code: Option<String>,
    #[serde(default)]
    pub quad_class: Option<i32>,
    #[serde(default)]
    pub goldstein_scale: Option<f64>,
    #[serde(default)]
    pub num_mentions: Option<i32>,
    #[serde(default)]
    pub num_sources: Option<i32>,
    #[serde(default)]
    pub num_articles: Option<i32>,
    #[serde(default)]
    pub avg_tone: Option<f64>,

    /// 1 = country, higher values are more precise
    #[serde(default)]
    pub actor1_geo_type: Option<i32>,
    #[serde(default)]
    pub actor1_geo_full_name: Option<String>,
    #[serde(default)]
    pub actor1_geo_country_code: Option<String>,
    #[serde(default)]
    pub actor1_geo_adm1_code: Option<String>,
    #[serde(default)]
    pub actor1_geo_adm2_code: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub actor1_location: Option<GeoPoint>,
    #[serde(default)]
    pub actor1_geo_feature_id: Option<String>,

    #[serde(default)]
    pub actor2_geo_type: Option<i32>,
    #[serde(default)]
    pub actor2_geo_full_name: Option<String>,
    #[serde(default)]
    pub actor2_geo_country_code: Option<String>,
    #[serde(default)]
    pub actor2_geo_adm1_code: Option<String>,
    #[serde(default)]
    pub actor2_geo_adm2_code: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub actor2_location: Option<GeoPoint>,
    #[serde(default)]
    pub actor2_geo_feature_id: Option<String>,

    #[serde(default)]
    pub action_geo_type: Option<i32>,
    #[serde(default)]
    pub action_geo_full_name: Option<String>,
    #[serde(default)]
    pub action_geo_country_code: Option<String>,
    #[serde(default)]
    pub action_geo_adm1_code: Option<String>,
    #[serde(default)]
    pub action_geo_adm2_code: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub action_location: Option<GeoPoint>,
    #[serde(default)]
    pub action_geo_feature_id: Option<String>,

    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub date_added: Option<DateTime<Utc>>,
    #[serde(default)]
    pub source_url: Option<String>,
}
