use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use elasticsearch::{
    auth::Credentials,
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    Elasticsearch, SearchParts,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use url::Url;

use super::{
    BackendProbe, ClusterBucket, ClusterRequest, EventRepository, MentionRepository,
    MAX_RESULT_WINDOW, MENTIONS_PAGE_SIZE,
};
use crate::config::ElasticsearchConfig;
use crate::error::{AppError, Result};
use crate::metrics;
use crate::models::{BoundingBox, EventDocument, GeoPoint, MentionDocument};

const CLUSTERS_AGG: &str = "clusters";

/// Read-only client over the event and mention indices
#[derive(Clone)]
pub struct ElasticsearchStore {
    client: Elasticsearch,
    event_index: String,
    mention_index: String,
}

impl ElasticsearchStore {
    pub fn new(config: &ElasticsearchConfig) -> Result<Self> {
        let url = Url::parse(&config.url)?;
        let pool = SingleNodeConnectionPool::new(url);
        let mut builder =
            TransportBuilder::new(pool).timeout(Duration::from_secs(config.timeout_secs));
        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.auth(Credentials::Basic(username.clone(), password.clone()));
        }
        let transport = builder.build()?;

        Ok(Self {
            client: Elasticsearch::new(transport),
            event_index: config.event_index.clone(),
            mention_index: config.mention_index.clone(),
        })
    }

    async fn search(&self, operation: &str, index: &str, body: Value) -> Result<SearchResponse> {
        let started = Instant::now();
        let result = self.send_search(operation, index, body).await;
        metrics::observe_es_query(operation, started, result.is_ok());
        result
    }

    async fn send_search(&self, operation: &str, index: &str, body: Value) -> Result<SearchResponse> {
        debug!(operation, index, "executing search");

        let response = self
            .client
            .search(SearchParts::Index(&[index]))
            .ignore_unavailable(true)
            .allow_no_indices(true)
            .body(body)
            .send()
            .await?;

        let status = response.status_code();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::SearchBackend(format!(
                "{operation} on {index} returned {status}: {text}"
            )));
        }

        Ok(response.json::<SearchResponse>().await?)
    }
}

#[async_trait]
impl EventRepository for ElasticsearchStore {
    async fn find_by_event_date_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<EventDocument>> {
        let body = json!({
            "size": limit.min(MAX_RESULT_WINDOW),
            "query": {
                "bool": { "filter": [event_date_range(start, end)] }
            },
            "sort": [{ "eventDate": { "order": "desc" } }]
        });

        let response = self
            .search("events_by_date", &self.event_index, body)
            .await?;
        Ok(decode_hits::<EventDocument>(response.hits.hits)
            .into_iter()
            .map(|(_, doc)| doc)
            .collect())
    }

    async fn find_by_id(&self, global_event_id: i64) -> Result<Option<EventDocument>> {
        let body = json!({
            "size": 1,
            "query": { "term": { "globalEventId": global_event_id } }
        });

        let response = self.search("event_by_id", &self.event_index, body).await?;
        Ok(decode_hits::<EventDocument>(response.hits.hits)
            .into_iter()
            .map(|(_, doc)| doc)
            .next())
    }

    async fn cluster_by_geotile(&self, request: ClusterRequest) -> Result<Vec<ClusterBucket>> {
        let mut filters = vec![event_date_range(request.start, request.end)];
        if let Some(bbox) = &request.bbox {
            filters.push(bounding_box_filter(bbox));
        }

        let body = json!({
            "size": 0,
            "query": { "bool": { "filter": filters } },
            "aggs": {
                CLUSTERS_AGG: {
                    "geotile_grid": {
                        "field": "actionLocation",
                        "precision": request.precision,
                        "size": request.max_clusters
                    },
                    "aggs": {
                        "avg_tone": { "avg": { "field": "avgTone" } },
                        "sample": {
                            "top_hits": {
                                "size": 1,
                                "_source": { "includes": ["globalEventId"] }
                            }
                        }
                    }
                }
            }
        });

        let response = self
            .search("events_geotile", &self.event_index, body)
            .await?;
        let Some(aggregations) = response.aggregations else {
            return Ok(Vec::new());
        };
        let grid: GeotileAggregation = aggregations
            .get(CLUSTERS_AGG)
            .cloned()
            .map(serde_json::from_value)
            .transpose()?
            .unwrap_or_default();

        Ok(grid
            .buckets
            .into_iter()
            .filter_map(|bucket| {
                let Some(centre) = GeoPoint::from_geotile_key(&bucket.key) else {
                    warn!(key = %bucket.key, "skipping bucket with malformed geotile key");
                    return None;
                };
                let sample_event_id = bucket
                    .sample
                    .hits
                    .hits
                    .into_iter()
                    .find_map(|hit| hit.source)
                    .and_then(|source| source.get("globalEventId").and_then(Value::as_i64));
                Some(ClusterBucket {
                    key: bucket.key,
                    doc_count: bucket.doc_count,
                    centre,
                    avg_tone: bucket.avg_tone.value,
                    sample_event_id,
                })
            })
            .collect())
    }
}

#[async_trait]
impl MentionRepository for ElasticsearchStore {
    async fn find_by_global_event_id_and_mention_time_between(
        &self,
        global_event_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<MentionDocument>> {
        let body = json!({
            "size": MENTIONS_PAGE_SIZE,
            "query": {
                "bool": {
                    "filter": [
                        { "term": { "globalEventId": global_event_id } },
                        {
                            "range": {
                                "mentionTimeDate": {
                                    "gte": start.to_rfc3339_opts(SecondsFormat::Millis, true),
                                    "lte": end.to_rfc3339_opts(SecondsFormat::Millis, true),
                                    "format": "strict_date_optional_time"
                                }
                            }
                        }
                    ]
                }
            },
            "sort": [{ "mentionTimeDate": { "order": "asc" } }]
        });

        let response = self
            .search("mentions_by_event", &self.mention_index, body)
            .await?;
        Ok(decode_hits::<MentionDocument>(response.hits.hits)
            .into_iter()
            .map(|(id, mut doc)| {
                doc.id = id;
                doc
            })
            .collect())
    }
}

#[async_trait]
impl BackendProbe for ElasticsearchStore {
    async fn ping(&self) -> Result<()> {
        let started = Instant::now();
        let response = self.client.ping().send().await;
        let ok = matches!(&response, Ok(r) if r.status_code().is_success());
        metrics::observe_es_query("ping", started, ok);

        let response = response?;
        if ok {
            Ok(())
        } else {
            Err(AppError::SearchBackend(format!(
                "ping returned {}",
                response.status_code()
            )))
        }
    }
}

fn event_date_range(start: DateTime<Utc>, end: DateTime<Utc>) -> Value {
    json!({
        "range": {
            "eventDate": {
                "gte": start.timestamp_millis(),
                "lte": end.timestamp_millis(),
                "format": "epoch_millis"
            }
        }
    })
}

fn bounding_box_filter(bbox: &BoundingBox) -> Value {
    let top_left = bbox.top_left();
    let bottom_right = bbox.bottom_right();
    json!({
        "geo_bounding_box": {
            "actionLocation": {
                "top_left": { "lat": top_left.lat, "lon": top_left.lon },
                "bottom_right": { "lat": bottom_right.lat, "lon": bottom_right.lon }
            }
        }
    })
}

/// Hits whose `_source` does not match the document shape are logged and skipped
fn decode_hits<T: DeserializeOwned>(hits: Vec<RawHit>) -> Vec<(Option<String>, T)> {
    hits.into_iter()
        .filter_map(|hit| {
            let source = hit.source?;
            match serde_json::from_value::<T>(source) {
                Ok(doc) => Some((hit.id, doc)),
                Err(e) => {
                    warn!(id = ?hit.id, error = %e, "skipping undecodable hit");
                    None
                }
            }
        })
        .collect()
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    hits: Hits,
    #[serde(default)]
    aggregations: Option<serde_json::Map<String, Value>>,
}

#[derive(Debug, Default, Deserialize)]
struct Hits {
    #[serde(default)]
    hits: Vec<RawHit>,
}

#[derive(Debug, Deserialize)]
struct RawHit {
    #[serde(rename = "_id", default)]
    id: Option<String>,
    #[serde(rename = "_source", default)]
    source: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct GeotileAggregation {
    #[serde(default)]
    buckets: Vec<GeotileBucket>,
}

#[derive(Debug, Deserialize)]
struct GeotileBucket {
    key: String,
    doc_count: i64,
    #[serde(default)]
    avg_tone: AvgValue,
    #[serde(default)]
    sample: TopHits,
}

#[derive(Debug, Default, Deserialize)]
struct AvgValue {
    value: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct TopHits {
    #[serde(default)]
    hits: Hits,
}
