//! # Actix Middleware Library
//!
//! Middleware shared by Event Mosaic Actix services
//!
//! ## Modules
//! - `correlation_id`: request correlation id propagation
//! - `metrics`: Prometheus request metrics and text exposition

pub mod correlation_id;
pub mod metrics;

pub use correlation_id::{get_correlation_id, CorrelationId, CorrelationIdMiddleware};
pub use metrics::{render_metrics, MetricsMiddleware};
