//! Event Mosaic API
//!
//! Read-only HTTP service that turns GDELT events indexed in Elasticsearch
//! into GeoJSON for the map front-end and serves per-event details with the
//! articles that mentioned them.

pub mod config;
pub mod discovery;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod mapper;
pub mod metrics;
pub mod models;
pub mod openapi;
pub mod repository;
pub mod services;
pub mod telemetry;
pub mod validation;

pub use config::Config;
pub use error::{ApiError, AppError, Result};
pub use handlers::AppState;
