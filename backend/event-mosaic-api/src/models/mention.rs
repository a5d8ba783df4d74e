use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::lenient_timestamp;

/// GDELT 2.0 mention (one article reporting an event), from `gdelt-mentions-*`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MentionDocument {
    /// Elasticsearch `_id`, filled in from the hit rather than `_source`
    #[serde(default, skip_serializing)]
    pub id: Option<String>,
    #[serde(default)]
    pub global_event_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub event_time_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub mention_time_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub mention_type: Option<i32>,
    #[serde(default)]
    pub mention_source_name: Option<String>,
    /// Usually the article URL
    #[serde(default)]
    pub mention_identifier: Option<String>,
    #[serde(default)]
    pub sentence_id: Option<i32>,
    #[serde(default)]
    pub actor1_char_offset: Option<i32>,
    #[serde(default)]
    pub actor2_char_offset: Option<i32>,
    #[serde(default)]
    pub action_char_offset: Option<i32>,
    #[serde(default)]
    pub in_raw_text: Option<i32>,
    #[serde(default)]
    pub confidence: Option<i32>,
    #[serde(default)]
    pub mention_doc_len: Option<i32>,
    #[serde(default)]
    pub mention_doc_tone: Option<f64>,
    #[serde(default)]
    pub mention_doc_translation_info: Option<String>,
}
