pub mod clustering;
pub mod details;
pub mod event_query;
pub mod event_service;
pub mod geojson;
pub mod geolocation;
pub mod params;

pub use clustering::ClusterService;
pub use event_query::EventQueryService;
pub use event_service::EventService;
