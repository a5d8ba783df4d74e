use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, warn};

use super::params;
use crate::config::ApiConfig;
use crate::dto::EventMapQuery;
use crate::error::Result;
use crate::repository::{ClusterBucket, ClusterRequest, EventRepository};

/// Server-side clustering of events into map tiles for low zoom levels
pub struct ClusterService {
    repository: Arc<dyn EventRepository>,
    config: ApiConfig,
}

impl ClusterService {
    pub fn new(repository: Arc<dyn EventRepository>, config: ApiConfig) -> Self {
        Self { repository, config }
    }

    /// Clusters replace individual events below the zoom threshold
    pub fn should_cluster(&self, zoom: Option<i32>) -> bool {
        matches!(zoom, Some(z) if z < self.config.individual_events_zoom_threshold)
    }

    pub fn precision_for_zoom(&self, zoom: i32) -> u32 {
        if zoom < 1 {
            self.config.default_geotile_precision
        } else {
            (zoom as u32).min(self.config.max_geotile_precision)
        }
    }

    pub async fn find_clusters(
        &self,
        query: &EventMapQuery,
        zoom: i32,
        now: DateTime<Utc>,
    ) -> Result<Vec<ClusterBucket>> {
        let (start, end) =
            params::date_range_for_query(query, self.config.default_event_window_hours, now)?;

        let bbox = params::parse_bounding_box(query.bbox.as_deref()).unwrap_or_else(|e| {
            warn!(bbox = ?query.bbox, error = %e, "ignoring unparseable bounding box");
            None
        });

        let request = ClusterRequest {
            start,
            end,
            bbox,
            precision: self.precision_for_zoom(zoom),
            max_clusters: self.config.max_clusters_per_request,
        };
        debug!(zoom, precision = request.precision, %start, %end, "requesting geotile clusters");

        self.repository.cluster_by_geotile(request).await
    }
}
