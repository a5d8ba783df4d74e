//! Read access to the GDELT indices
//!
//! Services depend on these traits only; `ElasticsearchStore` is the
//! production implementation of all three.

mod elastic;

pub use elastic::ElasticsearchStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::{BoundingBox, EventDocument, GeoPoint, MentionDocument};

/// Upper bound of `from + size` in a default Elasticsearch index
pub const MAX_RESULT_WINDOW: usize = 10_000;

/// Mentions returned for a single event
pub const MENTIONS_PAGE_SIZE: usize = 1_000;

/// Parameters of a `geotile_grid` aggregation over `actionLocation`
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterRequest {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub bbox: Option<BoundingBox>,
    pub precision: u32,
    pub max_clusters: usize,
}

/// One non-empty map tile
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterBucket {
    /// `"{zoom}/{x}/{y}"`
    pub key: String,
    pub doc_count: i64,
    pub centre: GeoPoint,
    pub avg_tone: Option<f64>,
    /// Id of an event in the bucket, meaningful when `doc_count == 1`
    pub sample_event_id: Option<i64>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Events with `start <= eventDate <= end`, newest first
    async fn find_by_event_date_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<EventDocument>>;

    async fn find_by_id(&self, global_event_id: i64) -> Result<Option<EventDocument>>;

    async fn cluster_by_geotile(&self, request: ClusterRequest) -> Result<Vec<ClusterBucket>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MentionRepository: Send + Sync {
    /// Mentions of one event with `start <= mentionTimeDate <= end`, oldest first
    async fn find_by_global_event_id_and_mention_time_between(
        &self,
        global_event_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<MentionDocument>>;
}

/// Reachability check used by the readiness endpoint
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BackendProbe: Send + Sync {
    async fn ping(&self) -> Result<()>;
}
