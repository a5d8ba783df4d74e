//! Document to DTO mapping

use crate::dto::{EventDetailsResponse, GeoJsonProperties, MentionSummary};
use crate::models::{EventDocument, MentionDocument};

pub const NOT_AVAILABLE: &str = "N/A";

/// Details of an event without its mentions; the caller attaches those
pub fn to_details_response(event: &EventDocument) -> EventDetailsResponse {
    EventDetailsResponse {
        event_id: Some(event.global_event_id),
        title: Some(title(event)),
        event_date: event.event_date,
        location: Some(location(event)),
        actors: Some(actors(event)),
        avg_tone: event.avg_tone,
        mentions_count: event.num_mentions,
        mentions: None,
    }
}

pub fn to_mention_summary(mention: &MentionDocument) -> MentionSummary {
    MentionSummary {
        source: mention.mention_source_name.clone(),
        url: mention.mention_identifier.clone(),
        mention_time: mention.mention_time_date,
        mention_doc_tone: mention.mention_doc_tone,
    }
}

pub fn event_properties(event: &EventDocument) -> GeoJsonProperties {
    GeoJsonProperties {
        event_id: Some(event.global_event_id),
        avg_tone: event.avg_tone,
        cluster_count: 1,
    }
}

/// Properties of a geotile bucket; the event id is kept only when the bucket
/// holds exactly one event
pub fn cluster_properties(
    doc_count: i64,
    avg_tone: Option<f64>,
    event_id: Option<i64>,
) -> GeoJsonProperties {
    GeoJsonProperties {
        event_id: event_id.filter(|_| doc_count == 1),
        avg_tone,
        cluster_count: doc_count,
    }
}

fn title(event: &EventDocument) -> String {
    match non_blank(event.event_code.as_deref()) {
        Some(code) => format!("CAMEO event: {code}"),
        None => NOT_AVAILABLE.to_string(),
    }
}

fn location(event: &EventDocument) -> String {
    non_blank(event.action_geo_full_name.as_deref())
        .unwrap_or(NOT_AVAILABLE)
        .to_string()
}

fn actors(event: &EventDocument) -> Vec<String> {
    let actors: Vec<String> = [event.actor1_name.as_deref(), event.actor2_name.as_deref()]
        .into_iter()
        .filter_map(non_blank)
        .map(str::to_string)
        .collect();

    if actors.is_empty() {
        vec![NOT_AVAILABLE.to_string()]
    } else {
        actors
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}
