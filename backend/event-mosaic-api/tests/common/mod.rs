#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};

use event_mosaic_api::config::ApiConfig;
use event_mosaic_api::models::{EventDocument, MentionDocument};
use event_mosaic_api::repository::{
    BackendProbe, ClusterBucket, ClusterRequest, EventRepository, MentionRepository,
};
use event_mosaic_api::services::EventService;
use event_mosaic_api::{AppError, AppState, Result};

/// In-memory stand-in for Elasticsearch
#[derive(Default)]
pub struct FakeStore {
    pub events: Vec<EventDocument>,
    pub mentions: Vec<MentionDocument>,
    pub clusters: Vec<ClusterBucket>,
    pub failing: bool,
    pub cluster_requests: Mutex<Vec<ClusterRequest>>,
}

impl FakeStore {
    fn check(&self) -> Result<()> {
        if self.failing {
            Err(AppError::SearchBackend("connection refused".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl EventRepository for FakeStore {
    async fn find_by_event_date_between(
        &self,
        _start: DateTime<Utc>,
        _end: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<EventDocument>> {
        self.check()?;
        Ok(self.events.iter().take(limit).cloned().collect())
    }

    async fn find_by_id(&self, global_event_id: i64) -> Result<Option<EventDocument>> {
        self.check()?;
        Ok(self
            .events
            .iter()
            .find(|e| e.global_event_id == global_event_id)
            .cloned())
    }

    async fn cluster_by_geotile(&self, request: ClusterRequest) -> Result<Vec<ClusterBucket>> {
        self.check()?;
        self.cluster_requests
            .lock()
            .expect("cluster request log")
            .push(request);
        Ok(self.clusters.clone())
    }
}

#[async_trait]
impl MentionRepository for FakeStore {
    async fn find_by_global_event_id_and_mention_time_between(
        &self,
        global_event_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<MentionDocument>> {
        self.check()?;
        Ok(self
            .mentions
            .iter()
            .filter(|m| m.global_event_id == Some(global_event_id))
            .filter(|m| {
                m.mention_time_date
                    .map(|t| t >= start && t <= end)
                    .unwrap_or(false)
            })
            .cloned()
            .collect())
    }
}

#[async_trait]
impl BackendProbe for FakeStore {
    async fn ping(&self) -> Result<()> {
        self.check()
    }
}

pub fn app_state(store: Arc<FakeStore>) -> AppState {
    AppState {
        event_service: Arc::new(EventService::new(
            store.clone(),
            store.clone(),
            ApiConfig::default(),
        )),
        probe: store,
    }
}
