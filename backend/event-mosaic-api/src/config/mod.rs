use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::error::AppError;

/// Full service configuration, read from the environment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub elasticsearch: ElasticsearchConfig,
    pub api: ApiConfig,
    pub eureka: EurekaConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_env")]
    pub env: String,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Actix worker count; actix picks the number of cores when unset
    #[serde(default)]
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElasticsearchConfig {
    #[serde(default = "default_es_url")]
    pub url: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    /// Index pattern written by the ingestion pipeline
    #[serde(default = "default_event_index")]
    pub event_index: String,
    #[serde(default = "default_mention_index")]
    pub mention_index: String,
    #[serde(default = "default_es_timeout_secs")]
    pub timeout_secs: u64,
}

/// Tunables of the map and details endpoints (`API_CONFIG_*`)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_geotile_precisions"))]
pub struct ApiConfig {
    /// Zoom level from which individual events are shown instead of clusters
    #[serde(default = "default_individual_events_zoom_threshold")]
    #[validate(range(min = 1, max = 25))]
    pub individual_events_zoom_threshold: i32,

    /// Days after the event date in which mentions are searched
    #[serde(default = "default_mention_search_days_range")]
    #[validate(range(min = 0, max = 30))]
    pub mention_search_days_range: i64,

    /// Window used when the request gives no usable date bounds
    #[serde(default = "default_event_window_hours")]
    #[validate(range(min = 1, max = 8760))]
    pub default_event_window_hours: i64,

    #[serde(default = "default_max_clusters_per_request")]
    #[validate(range(min = 10, max = 10000))]
    pub max_clusters_per_request: usize,

    #[serde(default = "default_max_individual_events_per_request")]
    #[validate(range(min = 10, max = 10000))]
    pub max_individual_events_per_request: usize,

    /// geotile_grid precision used when the zoom level is below 1
    #[serde(default = "default_geotile_precision")]
    #[validate(range(min = 1, max = 15))]
    pub default_geotile_precision: u32,

    #[serde(default = "default_max_geotile_precision")]
    #[validate(range(min = 5, max = 29))]
    pub max_geotile_precision: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            individual_events_zoom_threshold: default_individual_events_zoom_threshold(),
            mention_search_days_range: default_mention_search_days_range(),
            default_event_window_hours: default_event_window_hours(),
            max_clusters_per_request: default_max_clusters_per_request(),
            max_individual_events_per_request: default_max_individual_events_per_request(),
            default_geotile_precision: default_geotile_precision(),
            max_geotile_precision: default_max_geotile_precision(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EurekaConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Base URL of the registry REST API, including the `/eureka` suffix
    #[serde(default = "default_eureka_server_url")]
    pub server_url: String,
    #[serde(default = "default_eureka_app_name")]
    pub app_name: String,
    #[serde(default)]
    pub instance_host: Option<String>,
    #[serde(default)]
    pub instance_ip: Option<String>,
    #[serde(default = "default_renewal_interval_secs")]
    #[validate(range(min = 1))]
    pub renewal_interval_secs: u64,
    #[serde(default = "default_lease_duration_secs")]
    #[validate(range(min = 1))]
    pub lease_duration_secs: u64,
}

impl Default for EurekaConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            server_url: default_eureka_server_url(),
            app_name: default_eureka_app_name(),
            instance_host: None,
            instance_ip: None,
            renewal_interval_secs: default_renewal_interval_secs(),
            lease_duration_secs: default_lease_duration_secs(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_vars(std::env::vars())
    }

    /// Build the configuration from an explicit variable list
    pub fn from_vars<I>(vars: I) -> Result<Self, AppError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let vars: Vec<(String, String)> = vars.into_iter().collect();

        let app: AppConfig = envy::prefixed("APP_").from_iter(vars.clone())?;
        let elasticsearch: ElasticsearchConfig =
            envy::prefixed("ELASTICSEARCH_").from_iter(vars.clone())?;
        let api: ApiConfig = envy::prefixed("API_CONFIG_").from_iter(vars.clone())?;
        let eureka: EurekaConfig = envy::prefixed("EUREKA_").from_iter(vars)?;

        api.validate()
            .map_err(|e| AppError::Config(crate::validation::describe(&e)))?;
        eureka
            .validate()
            .map_err(|e| AppError::Config(crate::validation::describe(&e)))?;

        if elasticsearch.username.is_some() != elasticsearch.password.is_some() {
            return Err(AppError::Config(
                "ELASTICSEARCH_USERNAME and ELASTICSEARCH_PASSWORD must be set together".into(),
            ));
        }
        if eureka.enabled && eureka.renewal_interval_secs >= eureka.lease_duration_secs {
            return Err(AppError::Config(
                "EUREKA_RENEWAL_INTERVAL_SECS must be shorter than EUREKA_LEASE_DURATION_SECS"
                    .into(),
            ));
        }

        Ok(Self {
            app,
            elasticsearch,
            api,
            eureka,
        })
    }
}

fn validate_geotile_precisions(config: &ApiConfig) -> Result<(), ValidationError> {
    if config.default_geotile_precision > config.max_geotile_precision {
        let mut err = ValidationError::new("geotile_precision");
        err.message = Some("default_geotile_precision must not exceed max_geotile_precision".into());
        return Err(err);
    }
    Ok(())
}

fn default_env() -> String {
    "development".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_es_url() -> String {
    "http://localhost:9200".to_string()
}

fn default_event_index() -> String {
    "gdelt-events-*".to_string()
}

fn default_mention_index() -> String {
    "gdelt-mentions-*".to_string()
}

fn default_es_timeout_secs() -> u64 {
    10
}

fn default_individual_events_zoom_threshold() -> i32 {
    10
}

fn default_mention_search_days_range() -> i64 {
    2
}

fn default_event_window_hours() -> i64 {
    24
}

fn default_max_clusters_per_request() -> usize {
    1000
}

fn default_max_individual_events_per_request() -> usize {
    500
}

fn default_geotile_precision() -> u32 {
    5
}

fn default_max_geotile_precision() -> u32 {
    18
}

fn default_eureka_server_url() -> String {
    "http://localhost:8761/eureka".to_string()
}

fn default_eureka_app_name() -> String {
    "EM-API".to_string()
}

fn default_renewal_interval_secs() -> u64 {
    30
}

fn default_lease_duration_secs() -> u64 {
    90
}
