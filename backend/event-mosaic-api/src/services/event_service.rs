use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::{debug, error, warn};

use super::clustering::ClusterService;
use super::details::build_event_details_response;
use super::event_query::EventQueryService;
use super::geojson;
use super::params;
use crate::config::ApiConfig;
use crate::dto::{EventDetailsResponse, EventMapQuery, GeoJsonFeatureCollection};
use crate::error::{AppError, Result};
use crate::metrics;
use crate::models::{EventDocument, MentionDocument};
use crate::repository::{EventRepository, MentionRepository};

const MODE_CLUSTERS: &str = "clusters";
const MODE_EVENTS: &str = "events";

/// Entry point of both event endpoints
pub struct EventService {
    events: Arc<dyn EventRepository>,
    mentions: Arc<dyn MentionRepository>,
    query: EventQueryService,
    clusters: ClusterService,
    config: ApiConfig,
}

impl EventService {
    pub fn new(
        events: Arc<dyn EventRepository>,
        mentions: Arc<dyn MentionRepository>,
        config: ApiConfig,
    ) -> Self {
        Self {
            query: EventQueryService::new(events.clone(), config.clone()),
            clusters: ClusterService::new(events.clone(), config.clone()),
            events,
            mentions,
            config,
        }
    }

    /// GeoJSON for the map. A date window that cannot be resolved is a request
    /// error; backend failures are logged and answered with an empty collection.
    pub async fn events_for_map(&self, query: &EventMapQuery) -> Result<GeoJsonFeatureCollection> {
        debug!(?query, "map request");
        let now = Utc::now();
        params::date_range_for_query(query, self.config.default_event_window_hours, now)?;

        let (mode, result) = match query.zoom {
            Some(zoom) if self.clusters.should_cluster(Some(zoom)) => (
                MODE_CLUSTERS,
                self.clusters
                    .find_clusters(query, zoom, now)
                    .await
                    .map(|buckets| geojson::convert_clusters(&buckets)),
            ),
            _ => (
                MODE_EVENTS,
                self.query
                    .find_events(query, now)
                    .await
                    .map(|events| geojson::convert_to_geojson(&events)),
            ),
        };

        match result {
            Ok(collection) => {
                metrics::observe_map_features(mode, collection.features.len());
                Ok(collection)
            }
            Err(e) => {
                error!(mode, error = %e, "failed to load events for map");
                metrics::record_map_backend_failure(mode);
                Ok(GeoJsonFeatureCollection::empty())
            }
        }
    }

    pub async fn event_details(&self, event_id: i64) -> Result<EventDetailsResponse> {
        debug!(event_id, "details request");

        let event = self.events.find_by_id(event_id).await?.ok_or_else(|| {
            warn!(event_id, "event not found");
            AppError::NotFound(format!("Event with ID {event_id} not found"))
        })?;

        let mentions = self.find_mentions(&event).await?;
        debug!(event_id, mentions = mentions.len(), "mentions loaded");

        Ok(build_event_details_response(&event, &mentions))
    }

    /// Mentions within `mention_search_days_range` days after the event date
    async fn find_mentions(&self, event: &EventDocument) -> Result<Vec<MentionDocument>> {
        let Some(start) = event.event_date else {
            debug!(event_id = event.global_event_id, "event has no date, skipping mentions");
            return Ok(Vec::new());
        };
        let end = start
            .checked_add_signed(Duration::days(self.config.mention_search_days_range))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        self.mentions
            .find_by_global_event_id_and_mention_time_between(event.global_event_id, start, end)
            .await
    }
}
