use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::serialize_timestamp;

/// Body of `GET /api/v1/events/{eventId}`
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventDetailsResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = 1234567890)]
    pub event_id: Option<i64>,

    /// Built from the CAMEO code
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "CAMEO event: 042")]
    pub title: Option<String>,

    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_timestamp"
    )]
    #[schema(value_type = Option<String>, example = "2025-06-20T00:00:00Z")]
    pub event_date: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "Paris, France")]
    pub location: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub actors: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_tone: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mentions_count: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mentions: Option<Vec<MentionSummary>>,
}

/// One article that reported the event
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MentionSummary {
    #[schema(example = "bbc.co.uk")]
    pub source: Option<String>,
    pub url: Option<String>,
    #[serde(serialize_with = "serialize_timestamp")]
    #[schema(value_type = Option<String>, example = "2025-06-20T08:15:00Z")]
    pub mention_time: Option<DateTime<Utc>>,
    pub mention_doc_tone: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};
    use serde_json::json;

    #[test]
    fn test_details_omit_missing_fields_and_format_dates() {
        let response = EventDetailsResponse {
            event_id: Some(1),
            title: Some("CAMEO event: 010".into()),
            event_date: Some(
                FixedOffset::east_opt(3 * 3600)
                    .unwrap()
                    .with_ymd_and_hms(2025, 6, 20, 3, 0, 0)
                    .unwrap()
                    .with_timezone(&Utc),
            ),
            location: None,
            actors: Some(vec!["N/A".into()]),
            avg_tone: None,
            mentions_count: None,
            mentions: Some(vec![MentionSummary {
                source: Some("bbc.co.uk".into()),
                url: None,
                mention_time: Some(Utc.with_ymd_and_hms(2025, 6, 20, 8, 15, 30).unwrap()),
                mention_doc_tone: Some(0.5),
            }]),
        };

        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "eventId": 1,
                "title": "CAMEO event: 010",
                "eventDate": "2025-06-20T00:00:00Z",
                "actors": ["N/A"],
                "mentions": [{
                    "source": "bbc.co.uk",
                    "url": null,
                    "mentionTime": "2025-06-20T08:15:30Z",
                    "mentionDocTone": 0.5
                }]
            })
        );
    }
}
