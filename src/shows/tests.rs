use crate::config::test_helpers::setup_test_app;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use chrono::{Duration, Utc};
use serde_json::{Value, json};
use tower::ServiceExt;

async fn extract_response_body(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    let body: Value = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| json!({"error": "Invalid JSON response"}));
    (status, body)
}

async fn post_json(app: &axum::Router, uri: &str, payload: &Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    extract_response_body(response).await
}

async fn get_json(app: &axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    extract_response_body(response).await
}

async fn create_test_venue(app: &axum::Router, name: &str) -> String {
    let venue_data = json!({
        "name": name,
        "city": "San Francisco",
        "state": "CA",
        "address": "1015 Folsom Street",
        "phone": "123-123-1234",
        "genres": ["Jazz"],
        "image_link": "https://example.com/venue.png",
        "seeking_talent": false
    });
    let (status, body) = post_json(app, "/api/venues", &venue_data).await;
    assert_eq!(status, StatusCode::CREATED, "Failed to create venue: {body:?}");
    body["id"].as_str().unwrap().to_string()
}

async fn create_test_artist(app: &axum::Router, name: &str) -> String {
    let artist_data = json!({
        "name": name,
        "city": "San Francisco",
        "state": "CA",
        "phone": "326-123-5000",
        "genres": ["Rock n Roll"],
        "image_link": "https://example.com/artist.png",
        "seeking_venue": false
    });
    let (status, body) = post_json(app, "/api/artists", &artist_data).await;
    assert_eq!(status, StatusCode::CREATED, "Failed to create artist: {body:?}");
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn show_create_and_get() {
    let app = setup_test_app().await;

    let venue_id = create_test_venue(&app, "The Musical Hop").await;
    let artist_id = create_test_artist(&app, "Guns N Petals").await;

    let start_time = Utc::now() + Duration::days(14);
    let show_data = json!({
        "start_time": start_time.to_rfc3339(),
        "venue_id": venue_id,
        "artist_id": artist_id
    });
    let (status, body) = post_json(&app, "/api/shows", &show_data).await;
    assert_eq!(status, StatusCode::CREATED, "Failed to create show: {body:?}");
    assert_eq!(body["venue_id"], venue_id.as_str());
    assert_eq!(body["artist_id"], artist_id.as_str());

    // The creation response already carries the display fields
    assert_eq!(body["venue_name"], "The Musical Hop");
    assert_eq!(body["artist_name"], "Guns N Petals");

    let show_id = body["id"].as_str().unwrap();
    let (get_status, show) = get_json(&app, &format!("/api/shows/{show_id}")).await;
    assert_eq!(get_status, StatusCode::OK);
    assert_eq!(show["venue_name"], "The Musical Hop");
    assert_eq!(show["artist_name"], "Guns N Petals");
    assert_eq!(show["artist_image_link"], "https://example.com/artist.png");
}

#[tokio::test]
async fn show_list_is_ordered_by_start_time() {
    let app = setup_test_app().await;

    let venue_id = create_test_venue(&app, "The Musical Hop").await;
    let artist_id = create_test_artist(&app, "Guns N Petals").await;

    // Create out of order to prove the listing sorts chronologically
    for days_offset in [21i64, 7, 14] {
        let show_data = json!({
            "start_time": (Utc::now() + Duration::days(days_offset)).to_rfc3339(),
            "venue_id": venue_id,
            "artist_id": artist_id
        });
        let (status, body) = post_json(&app, "/api/shows", &show_data).await;
        assert_eq!(status, StatusCode::CREATED, "Failed to create show: {body:?}");
    }

    let (status, body) = get_json(&app, "/api/shows").await;
    assert_eq!(status, StatusCode::OK);

    let shows = body.as_array().unwrap();
    assert_eq!(shows.len(), 3);

    let times: Vec<&str> = shows
        .iter()
        .map(|s| s["start_time"].as_str().unwrap())
        .collect();
    let mut sorted = times.clone();
    sorted.sort_unstable();
    assert_eq!(times, sorted, "Shows should be listed in chronological order");

    for show in shows {
        assert_eq!(show["venue_name"], "The Musical Hop");
        assert_eq!(show["artist_name"], "Guns N Petals");
    }
}

#[tokio::test]
async fn show_create_rejects_unknown_venue() {
    let app = setup_test_app().await;

    let artist_id = create_test_artist(&app, "Guns N Petals").await;
    let show_data = json!({
        "start_time": Utc::now().to_rfc3339(),
        "venue_id": uuid::Uuid::new_v4(),
        "artist_id": artist_id
    });
    let (status, _body) = post_json(&app, "/api/shows", &show_data).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn show_create_rejects_unknown_artist() {
    let app = setup_test_app().await;

    let venue_id = create_test_venue(&app, "The Musical Hop").await;
    let show_data = json!({
        "start_time": Utc::now().to_rfc3339(),
        "venue_id": venue_id,
        "artist_id": uuid::Uuid::new_v4()
    });
    let (status, _body) = post_json(&app, "/api/shows", &show_data).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn show_validation_rejects_missing_start_time() {
    let app = setup_test_app().await;

    let venue_id = create_test_venue(&app, "The Musical Hop").await;
    let artist_id = create_test_artist(&app, "Guns N Petals").await;

    let incomplete = json!({
        "venue_id": venue_id,
        "artist_id": artist_id
    });
    let (status, _body) = post_json(&app, "/api/shows", &incomplete).await;
    assert!(status.is_client_error(), "Should reject show without a start time");
}
