//! HTTP handlers and route registration

pub mod events;
pub mod health;

use actix_web::{web, HttpRequest};
use std::sync::Arc;

use crate::error::{ApiError, AppError};
use crate::repository::BackendProbe;
use crate::services::EventService;

/// Shared, immutable state of every worker
#[derive(Clone)]
pub struct AppState {
    pub event_service: Arc<EventService>,
    pub probe: Arc<dyn BackendProbe>,
}

/// Register API, health and metrics routes together with the extractor error
/// handlers, so malformed input gets the same error body as everything else
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(query_config())
        .app_data(path_config())
        .service(events::get_events_for_map)
        .service(events::get_event_details)
        .service(health::health)
        .service(health::ready)
        .service(health::metrics);
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, req| {
        ApiError::new(
            AppError::BadRequest(format!("Invalid value for query parameters: {err}")),
            req,
        )
        .into()
    })
}

fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|_err, req| {
        ApiError::new(
            AppError::BadRequest(format!(
                "Invalid value '{}' for parameter 'eventId'",
                raw_event_id(req)
            )),
            req,
        )
        .into()
    })
}

fn raw_event_id(req: &HttpRequest) -> &str {
    req.match_info().get("eventId").unwrap_or_default()
}
