use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::geolocation::select_best_coordinates;
use super::params;
use crate::config::ApiConfig;
use crate::dto::EventMapQuery;
use crate::error::Result;
use crate::models::{BoundingBox, EventDocument};
use crate::repository::EventRepository;

/// Individual events for the map: date window, bounding box, result cap
pub struct EventQueryService {
    repository: Arc<dyn EventRepository>,
    config: ApiConfig,
}

impl EventQueryService {
    pub fn new(repository: Arc<dyn EventRepository>, config: ApiConfig) -> Self {
        Self { repository, config }
    }

    pub async fn find_events(
        &self,
        query: &EventMapQuery,
        now: DateTime<Utc>,
    ) -> Result<Vec<EventDocument>> {
        let (start, end) =
            params::date_range_for_query(query, self.config.default_event_window_hours, now)?;

        // over-fetch so the in-memory bbox filter still leaves a full page
        let fetch_limit = self.config.max_individual_events_per_request * 2;
        let events = self
            .repository
            .find_by_event_date_between(start, end, fetch_limit)
            .await?;
        debug!(found = events.len(), %start, %end, "events in date range");

        let filtered = apply_bounding_box(events, query.bbox.as_deref());
        Ok(self.limit_results(filtered))
    }

    fn limit_results(&self, mut events: Vec<EventDocument>) -> Vec<EventDocument> {
        let max = self.config.max_individual_events_per_request;
        if events.len() > max {
            info!(limit = max, total = events.len(), "truncating map events");
            events.truncate(max);
        }
        events
    }
}

/// Keep events whose best location is inside the box. An unparseable box is
/// logged and ignored.
fn apply_bounding_box(events: Vec<EventDocument>, raw_bbox: Option<&str>) -> Vec<EventDocument> {
    let bbox = match params::parse_bounding_box(raw_bbox) {
        Ok(Some(bbox)) => bbox,
        Ok(None) => return events,
        Err(e) => {
            warn!(bbox = ?raw_bbox, error = %e, "ignoring unparseable bounding box");
            return events;
        }
    };

    let filtered: Vec<EventDocument> = events
        .into_iter()
        .filter(|event| is_in_bounds(event, &bbox))
        .collect();
    debug!(remaining = filtered.len(), "applied bounding box filter");
    filtered
}

fn is_in_bounds(event: &EventDocument, bbox: &BoundingBox) -> bool {
    select_best_coordinates(event)
        .map(|point| bbox.contains(&point))
        .unwrap_or(false)
}
