//! Eureka registry client
//!
//! Speaks the plain REST protocol of the Netflix registry:
//! `POST /apps/{APP}` to register, `PUT /apps/{APP}/{id}` to renew the lease,
//! `DELETE /apps/{APP}/{id}` to leave.
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::config::EurekaConfig;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_HOST: &str = "localhost";
const DEFAULT_IP: &str = "127.0.0.1";
const DATA_CENTER_CLASS: &str = "com.netflix.appinfo.InstanceInfo$DefaultDataCenterInfo";

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("registry request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("registry answered {status} to {operation}")]
    UnexpectedStatus {
        operation: &'static str,
        status: StatusCode,
    },
    /// The registry forgot the instance (lease expired or registry restarted)
    #[error("instance is not registered")]
    NotRegistered,
}

/// Body of a registration request (`{"instance": {...}}`)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstanceRegistration {
    pub instance: InstanceInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceInfo {
    pub instance_id: String,
    pub host_name: String,
    pub app: String,
    pub ip_addr: String,
    pub status: String,
    pub port: PortInfo,
    pub secure_port: PortInfo,
    pub vip_address: String,
    pub secure_vip_address: String,
    pub home_page_url: String,
    pub status_page_url: String,
    pub health_check_url: String,
    pub data_center_info: DataCenterInfo,
    pub lease_info: LeaseInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortInfo {
    #[serde(rename = "$")]
    pub port: u16,
    #[serde(rename = "@enabled")]
    pub enabled: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataCenterInfo {
    #[serde(rename = "@class")]
    pub class: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaseInfo {
    pub renewal_interval_in_secs: u64,
    pub duration_in_secs: u64,
}

impl InstanceInfo {
    pub fn from_config(config: &EurekaConfig, port: u16) -> Self {
        let host_name = config
            .instance_host
            .clone()
            .or_else(|| std::env::var("HOSTNAME").ok())
            .filter(|h| !h.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        let ip_addr = config
            .instance_ip
            .clone()
            .unwrap_or_else(|| DEFAULT_IP.to_string());
        let app = config.app_name.to_uppercase();
        let vip = config.app_name.to_lowercase();
        let base_url = format!("http://{host_name}:{port}");

        Self {
            instance_id: format!("{host_name}:{vip}:{port}"),
            host_name,
            app,
            ip_addr,
            status: "UP".to_string(),
            port: PortInfo {
                port,
                enabled: "true".to_string(),
            },
            secure_port: PortInfo {
                port: 443,
                enabled: "false".to_string(),
            },
            vip_address: vip.clone(),
            secure_vip_address: vip,
            home_page_url: format!("{base_url}/"),
            status_page_url: format!("{base_url}/health"),
            health_check_url: format!("{base_url}/health"),
            data_center_info: DataCenterInfo {
                class: DATA_CENTER_CLASS.to_string(),
                name: "MyOwn".to_string(),
            },
            lease_info: LeaseInfo {
                renewal_interval_in_secs: config.renewal_interval_secs,
                duration_in_secs: config.lease_duration_secs,
            },
        }
    }
}

pub struct EurekaClient {
    http: Client,
    server_url: String,
    instance: InstanceInfo,
}

impl EurekaClient {
    pub fn new(server_url: &str, instance: InstanceInfo) -> Result<Self, DiscoveryError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            server_url: server_url.trim_end_matches('/').to_string(),
            instance,
        })
    }

    pub fn instance(&self) -> &InstanceInfo {
        &self.instance
    }

    fn app_url(&self) -> String {
        format!("{}/apps/{}", self.server_url, self.instance.app)
    }

    fn instance_url(&self) -> String {
        format!("{}/{}", self.app_url(), self.instance.instance_id)
    }

    pub async fn register(&self) -> Result<(), DiscoveryError> {
        let body = InstanceRegistration {
            instance: self.instance.clone(),
        };
        let response = self.http.post(self.app_url()).json(&body).send().await?;
        expect_success("register", response.status())?;
        info!(
            app = %self.instance.app,
            instance_id = %self.instance.instance_id,
            "registered with Eureka"
        );
        Ok(())
    }

    pub async fn heartbeat(&self) -> Result<(), DiscoveryError> {
        let response = self
            .http
            .put(self.instance_url())
            .query(&[("status", "UP")])
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(DiscoveryError::NotRegistered);
        }
        expect_success("heartbeat", response.status())?;
        debug!(instance_id = %self.instance.instance_id, "lease renewed");
        Ok(())
    }

    pub async fn deregister(&self) -> Result<(), DiscoveryError> {
        let response = self.http.delete(self.instance_url()).send().await?;
        expect_success("deregister", response.status())?;
        info!(instance_id = %self.instance.instance_id, "deregistered from Eureka");
        Ok(())
    }
}

fn expect_success(operation: &'static str, status: StatusCode) -> Result<(), DiscoveryError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(DiscoveryError::UnexpectedStatus { operation, status })
    }
}

/// Backoff between failed registration attempts
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    pub backoff_multiplier: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(60),
            backoff_multiplier: 2,
        }
    }
}

impl RetryPolicy {
    fn next(&self, current: Duration) -> Duration {
        (current * self.backoff_multiplier).min(self.max_backoff)
    }
}

/// Running registration loop; `shutdown` stops it and leaves the registry
pub struct DiscoveryHandle {
    client: Arc<EurekaClient>,
    shutdown_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl DiscoveryHandle {
    pub fn spawn(client: Arc<EurekaClient>, renewal_interval: Duration, retry: RetryPolicy) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(registration_loop(
            client.clone(),
            renewal_interval,
            retry,
            shutdown_rx,
        ));
        Self {
            client,
            shutdown_tx,
            handle,
        }
    }

    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        if let Err(e) = self.handle.await {
            warn!(error = %e, "Eureka registration task ended abnormally");
        }
        if let Err(e) = self.client.deregister().await {
            warn!(error = %e, "Eureka deregistration failed");
        }
    }
}

async fn registration_loop(
    client: Arc<EurekaClient>,
    renewal_interval: Duration,
    retry: RetryPolicy,
    mut shutdown: watch::Receiver<bool>,
) {
    if !register_with_retry(&client, retry, &mut shutdown).await {
        return;
    }

    loop {
        tokio::select! {
            _ = shutdown.changed() => {
                debug!("Eureka heartbeat loop stopping");
                break;
            }
            _ = sleep(renewal_interval) => {
                match client.heartbeat().await {
                    Ok(()) => {}
                    Err(DiscoveryError::NotRegistered) => {
                        warn!("Eureka no longer knows this instance, registering again");
                        if !register_with_retry(&client, retry, &mut shutdown).await {
                            break;
                        }
                    }
                    Err(e) => warn!(error = %e, "Eureka heartbeat failed"),
                }
            }
        }
    }
}

/// Returns false when shutdown was requested before registration succeeded
async fn register_with_retry(
    client: &EurekaClient,
    retry: RetryPolicy,
    shutdown: &mut watch::Receiver<bool>,
) -> bool {
    let mut backoff = retry.initial_backoff;
    loop {
        if *shutdown.borrow() {
            return false;
        }
        match client.register().await {
            Ok(()) => return true,
            Err(e) => {
                error!(error = %e, retry_in_ms = backoff.as_millis() as u64, "Eureka registration failed");
            }
        }

        tokio::select! {
            _ = shutdown.changed() => return false,
            _ = sleep(backoff) => {}
        }
        backoff = retry.next(backoff);
    }
}
