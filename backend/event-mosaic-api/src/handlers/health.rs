use actix_web::{get, web, HttpResponse};
use serde_json::json;
use tracing::warn;

use super::AppState;

/// Liveness
#[get("/health")]
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "UP" }))
}

/// Readiness: the service is only useful while Elasticsearch answers
#[get("/ready")]
pub async fn ready(state: web::Data<AppState>) -> HttpResponse {
    match state.probe.ping().await {
        Ok(()) => HttpResponse::Ok().json(json!({
            "status": "UP",
            "components": { "elasticsearch": "UP" }
        })),
        Err(e) => {
            warn!(error = %e, "readiness check failed");
            HttpResponse::ServiceUnavailable().json(json!({
                "status": "DOWN",
                "components": { "elasticsearch": "DOWN" }
            }))
        }
    }
}

#[get("/metrics")]
pub async fn metrics() -> HttpResponse {
    match actix_middleware::render_metrics() {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/plain; version=0.0.4")
            .body(body),
        Err(e) => {
            tracing::error!(error = %e, "failed to encode metrics");
            HttpResponse::InternalServerError().finish()
        }
    }
}
