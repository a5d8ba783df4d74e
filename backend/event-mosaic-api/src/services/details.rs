use tracing::debug;

use crate::dto::EventDetailsResponse;
use crate::mapper;
use crate::models::{EventDocument, MentionDocument};

/// Details response with the mention list always present (possibly empty)
pub fn build_event_details_response(
    event: &EventDocument,
    mentions: &[MentionDocument],
) -> EventDetailsResponse {
    let mut response = mapper::to_details_response(event);
    let summaries: Vec<_> = mentions.iter().map(mapper::to_mention_summary).collect();
    debug!(
        event_id = event.global_event_id,
        mentions = summaries.len(),
        "built event details"
    );
    response.mentions = Some(summaries);
    response
}
