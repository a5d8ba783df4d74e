mod common;

use actix_middleware::{CorrelationIdMiddleware, MetricsMiddleware};
use actix_web::{http::StatusCode, test, web, App};
use chrono::{TimeZone, Utc};
use serde_json::Value;
use std::sync::Arc;

use common::{app_state, FakeStore};
use event_mosaic_api::handlers;
use event_mosaic_api::models::{EventDocument, GeoPoint, MentionDocument};
use event_mosaic_api::repository::ClusterBucket;

fn sample_store() -> FakeStore {
    let event_date = Utc.with_ymd_and_hms(2025, 6, 20, 0, 0, 0).unwrap();
    FakeStore {
        events: vec![
            EventDocument {
                global_event_id: 1001,
                event_date: Some(event_date),
                event_code: Some("042".into()),
                actor1_name: Some("GOVERNMENT".into()),
                action_geo_type: Some(4),
                action_geo_full_name: Some("Moscow, Russia".into()),
                action_location: Some(GeoPoint::new(55.75, 37.62)),
                avg_tone: Some(-1.5),
                num_mentions: Some(2),
                ..Default::default()
            },
            EventDocument {
                global_event_id: 1002,
                event_date: Some(event_date),
                action_geo_type: Some(4),
                action_location: Some(GeoPoint::new(48.85, 2.35)),
                ..Default::default()
            },
        ],
        mentions: vec![
            MentionDocument {
                global_event_id: Some(1001),
                mention_time_date: Some(Utc.with_ymd_and_hms(2025, 6, 20, 9, 0, 0).unwrap()),
                mention_source_name: Some("bbc.co.uk".into()),
                mention_identifier: Some("https://bbc.co.uk/news/1".into()),
                mention_doc_tone: Some(-2.0),
                ..Default::default()
            },
            MentionDocument {
                global_event_id: Some(1001),
                mention_time_date: Some(Utc.with_ymd_and_hms(2025, 6, 25, 9, 0, 0).unwrap()),
                mention_source_name: Some("too-late.example".into()),
                ..Default::default()
            },
        ],
        clusters: vec![ClusterBucket {
            key: "3/4/2".into(),
            doc_count: 40,
            centre: GeoPoint::new(55.0, 37.0),
            avg_tone: Some(0.25),
            sample_event_id: Some(1001),
        }],
        ..Default::default()
    }
}

macro_rules! init_app {
    ($store:expr) => {
        test::init_service(
            App::new()
                .wrap(MetricsMiddleware)
                .wrap(CorrelationIdMiddleware)
                .app_data(web::Data::new(app_state($store)))
                .configure(handlers::configure),
        )
        .await
    };
}

#[actix_web::test]
async fn map_returns_individual_events_as_geojson() {
    let app = init_app!(Arc::new(sample_store()));

    let req = test::TestRequest::get()
        .uri("/api/v1/events?since=2025-06-20&until=2025-06-20")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["type"], "FeatureCollection");
    assert_eq!(body["features"].as_array().unwrap().len(), 2);
    assert_eq!(body["features"][0]["geometry"]["coordinates"][0], 37.62);
    assert_eq!(body["features"][0]["geometry"]["coordinates"][1], 55.75);
    assert_eq!(body["features"][0]["properties"]["eventId"], 1001);
    assert_eq!(body["features"][0]["properties"]["clusterCount"], 1);
    assert!(body["features"][1]["properties"].get("avgTone").is_none());
}

#[actix_web::test]
async fn map_filters_by_bounding_box() {
    let app = init_app!(Arc::new(sample_store()));

    let req = test::TestRequest::get()
        .uri("/api/v1/events?bbox=55.6,37.5,55.8,37.7")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let features = body["features"].as_array().unwrap();
    assert_eq!(features.len(), 1);
    assert_eq!(features[0]["properties"]["eventId"], 1001);
}

#[actix_web::test]
async fn map_low_zoom_returns_clusters() {
    let store = Arc::new(sample_store());
    let app = init_app!(store.clone());

    let req = test::TestRequest::get()
        .uri("/api/v1/events?zoom=3&date=2025-06-20")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["features"][0]["properties"]["clusterCount"], 40);
    assert!(body["features"][0]["properties"].get("eventId").is_none());

    let requests = store.cluster_requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].precision, 3);
    assert_eq!(
        requests[0].start,
        Utc.with_ymd_and_hms(2025, 6, 20, 0, 0, 0).unwrap()
    );
}

#[actix_web::test]
async fn map_backend_failure_returns_empty_collection() {
    let app = init_app!(Arc::new(FakeStore {
        failing: true,
        ..Default::default()
    }));

    let req = test::TestRequest::get().uri("/api/v1/events").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, serde_json::json!({ "type": "FeatureCollection", "features": [] }));
}

#[actix_web::test]
async fn map_rejects_invalid_bbox() {
    let app = init_app!(Arc::new(sample_store()));

    let req = test::TestRequest::get()
        .uri("/api/v1/events?bbox=1,2,3")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], 400);
    assert_eq!(body["error"], "Bad Request");
    assert_eq!(
        body["message"],
        "Validation error: bbox: Invalid number of components. Expected 4, got 3"
    );
    assert_eq!(body["path"], "/api/v1/events");
    assert!(body["timestamp"].is_string());
}

#[actix_web::test]
async fn map_rejects_malformed_query_values() {
    let app = init_app!(Arc::new(sample_store()));

    for uri in ["/api/v1/events?zoom=high", "/api/v1/events?since=2025-13-45"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{uri}");

        let body: Value = test::read_body_json(resp).await;
        assert!(body["message"]
            .as_str()
            .unwrap()
            .starts_with("Invalid value for query parameters:"));
    }
}

#[actix_web::test]
async fn map_far_future_since_is_rejected() {
    let store = Arc::new(sample_store());
    let app = init_app!(store.clone());

    let req = test::TestRequest::get()
        .uri("/api/v1/events?since=%2B262142-12-31")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("'since'"), "{message}");
    assert_eq!(body["path"], "/api/v1/events");
}

#[actix_web::test]
async fn map_far_future_until_is_rejected() {
    let store = Arc::new(sample_store());
    let app = init_app!(store.clone());

    for uri in [
        "/api/v1/events?until=%2B262142-12-31",
        "/api/v1/events?until=%2B262142-12-31&zoom=2",
    ] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{uri}");

        let body: Value = test::read_body_json(resp).await;
        assert!(body["message"].as_str().unwrap().contains("'until'"));
    }
    assert!(store.cluster_requests.lock().unwrap().is_empty());
}

#[actix_web::test]
async fn details_include_mentions_in_window() {
    let app = init_app!(Arc::new(sample_store()));

    let req = test::TestRequest::get()
        .uri("/api/v1/events/1001")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["eventId"], 1001);
    assert_eq!(body["title"], "CAMEO event: 042");
    assert_eq!(body["eventDate"], "2025-06-20T00:00:00Z");
    assert_eq!(body["location"], "Moscow, Russia");
    assert_eq!(body["actors"], serde_json::json!(["GOVERNMENT"]));
    assert_eq!(body["mentionsCount"], 2);

    let mentions = body["mentions"].as_array().unwrap();
    assert_eq!(mentions.len(), 1);
    assert_eq!(mentions[0]["source"], "bbc.co.uk");
    assert_eq!(mentions[0]["url"], "https://bbc.co.uk/news/1");
    assert_eq!(mentions[0]["mentionTime"], "2025-06-20T09:00:00Z");
}

#[actix_web::test]
async fn details_unknown_event_is_404() {
    let app = init_app!(Arc::new(sample_store()));

    let req = test::TestRequest::get().uri("/api/v1/events/42").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Event with ID 42 not found");
    assert_eq!(body["path"], "/api/v1/events/42");
}

#[actix_web::test]
async fn details_non_numeric_id_is_400() {
    let app = init_app!(Arc::new(sample_store()));

    let req = test::TestRequest::get()
        .uri("/api/v1/events/abc")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Invalid value 'abc' for parameter 'eventId'");
}

#[actix_web::test]
async fn details_backend_failure_hides_cause() {
    let app = init_app!(Arc::new(FakeStore {
        failing: true,
        ..Default::default()
    }));

    let req = test::TestRequest::get().uri("/api/v1/events/1").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "An internal server error occurred.");
}

#[actix_web::test]
async fn health_and_readiness() {
    let app = init_app!(Arc::new(sample_store()));
    let req = test::TestRequest::get().uri("/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "UP");

    let req = test::TestRequest::get().uri("/ready").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let down = init_app!(Arc::new(FakeStore {
        failing: true,
        ..Default::default()
    }));
    let req = test::TestRequest::get().uri("/ready").to_request();
    let resp = test::call_service(&down, req).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "DOWN");
}

#[actix_web::test]
async fn metrics_expose_route_patterns() {
    let app = init_app!(Arc::new(sample_store()));

    let req = test::TestRequest::get()
        .uri("/api/v1/events/1001")
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::get().uri("/metrics").to_request();
    let body = test::call_and_read_body(&app, req).await;
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("http_requests_total"));
    assert!(text.contains("/api/v1/events/{eventId}"));
}

#[actix_web::test]
async fn correlation_id_is_echoed() {
    let app = init_app!(Arc::new(sample_store()));

    let req = test::TestRequest::get()
        .uri("/health")
        .insert_header(("x-correlation-id", "req-123"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(
        resp.headers().get("x-correlation-id").unwrap(),
        "req-123"
    );
}
