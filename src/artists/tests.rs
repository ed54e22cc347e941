use crate::config::test_helpers::setup_test_app;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use chrono::{Duration, Utc};
use rstest::rstest;
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

fn artist_payload(name: &str) -> Value {
    json!({
        "name": name,
        "city": "San Francisco",
        "state": "CA",
        "phone": "326-123-5000",
        "genres": ["Rock n Roll"],
        "image_link": "https://example.com/artist.png",
        "website": "https://example.com/band",
        "facebook_link": "https://facebook.com/band",
        "seeking_venue": true,
        "seeking_description": "Looking for shows to play"
    })
}

async fn create_test_artist(app: &axum::Router, name: &str) -> String {
    let (status, body) = post_json(app, "/api/artists", &artist_payload(name)).await;
    assert_eq!(status, StatusCode::CREATED, "Failed to create artist: {body:?}");
    body["id"].as_str().unwrap().to_string()
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

#[tokio::test]
async fn artist_create_persists_all_fields() {
    let app = setup_test_app().await;

    let (status, body) = post_json(&app, "/api/artists", &artist_payload("Guns N Petals")).await;
    assert_eq!(status, StatusCode::CREATED, "Failed to create artist: {body:?}");

    let artist_id = body["id"].as_str().unwrap();
    let (get_status, artist) = get_json(&app, &format!("/api/artists/{artist_id}")).await;
    assert_eq!(get_status, StatusCode::OK);
    assert_eq!(artist["name"], "Guns N Petals");
    assert_eq!(artist["city"], "San Francisco");
    assert_eq!(artist["state"], "CA");
    assert_eq!(artist["phone"], "326-123-5000");
    assert_eq!(artist["genres"], json!(["Rock n Roll"]));
    assert_eq!(artist["seeking_venue"], true);
    assert_eq!(artist["seeking_description"], "Looking for shows to play");
}

#[tokio::test]
async fn artist_crud_operations() {
    let app = setup_test_app().await;

    let artist_id = create_test_artist(&app, "Matt Quevado").await;

    // Update: the artist stops seeking venues
    let mut updated = artist_payload("Matt Quevado");
    updated["seeking_venue"] = json!(false);
    updated["seeking_description"] = json!(null);
    let update_response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/api/artists/{artist_id}"))
                .header("content-type", "application/json")
                .body(Body::from(updated.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let (update_status, update_body) = extract_response_body(update_response).await;
    assert_eq!(update_status, StatusCode::OK, "Failed to update artist: {update_body:?}");
    assert_eq!(update_body["seeking_venue"], false);

    // List
    let (list_status, list_body) = get_json(&app, "/api/artists").await;
    assert_eq!(list_status, StatusCode::OK);
    assert_eq!(list_body.as_array().unwrap().len(), 1);

    // Delete
    let delete_response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/artists/{artist_id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(delete_response.status(), StatusCode::NO_CONTENT);

    let (after_status, _) = get_json(&app, &format!("/api/artists/{artist_id}")).await;
    assert_eq!(after_status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn artist_validation_rejects_missing_name() {
    let app = setup_test_app().await;

    let incomplete = json!({
        "city": "San Francisco",
        "state": "CA",
        "phone": "326-123-5000",
        "genres": [],
        "seeking_venue": false
    });
    let (status, _body) = post_json(&app, "/api/artists", &incomplete).await;
    assert!(status.is_client_error(), "Should reject artist without a name");
}

#[tokio::test]
async fn artist_names_are_unique() {
    let app = setup_test_app().await;

    create_test_artist(&app, "The Wild Sax Band").await;
    let (status, _body) = post_json(&app, "/api/artists", &artist_payload("The Wild Sax Band")).await;
    assert!(!status.is_success(), "Duplicate artist name must be rejected");
}

#[rstest]
#[case("a", &["Guns N Petals", "Matt Quevado", "The Wild Sax Band"])]
#[case("BAND", &["The Wild Sax Band"])]
#[case("quevado", &["Matt Quevado"])]
#[tokio::test]
async fn artist_search_is_case_insensitive(#[case] term: &str, #[case] expected: &[&str]) {
    let app = setup_test_app().await;

    create_test_artist(&app, "Guns N Petals").await;
    create_test_artist(&app, "Matt Quevado").await;
    create_test_artist(&app, "The Wild Sax Band").await;

    let (status, body) = get_json(&app, &format!("/api/artists/search?q={term}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], expected.len());

    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, expected);
}

#[tokio::test]
async fn artist_detail_splits_past_and_upcoming_shows() {
    let app = setup_test_app().await;

    let artist_id = create_test_artist(&app, "The Wild Sax Band").await;
    let venue_id = create_test_venue(&app, "Park Square Live Music & Coffee").await;

    for days_offset in [-10i64, 5, 15] {
        let show_data = json!({
            "start_time": (Utc::now() + Duration::days(days_offset)).to_rfc3339(),
            "venue_id": venue_id,
            "artist_id": artist_id
        });
        let (status, body) = post_json(&app, "/api/shows", &show_data).await;
        assert_eq!(status, StatusCode::CREATED, "Failed to create show: {body:?}");
    }

    let (status, artist) = get_json(&app, &format!("/api/artists/{artist_id}")).await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(artist["past_shows_count"], 1);
    assert_eq!(artist["upcoming_shows_count"], 2);

    let upcoming = artist["upcoming_shows"].as_array().unwrap();
    assert_eq!(upcoming.len(), 2);
    for entry in upcoming {
        assert_eq!(entry["venue_name"], "Park Square Live Music & Coffee");
        assert!(entry["venue_image_link"].is_string());
    }

    // Chronological order within each bucket
    let first = upcoming[0]["start_time"].as_str().unwrap();
    let second = upcoming[1]["start_time"].as_str().unwrap();
    assert!(first < second);
}

#[tokio::test]
async fn deleting_artist_cascades_to_shows() {
    let app = setup_test_app().await;

    let artist_id = create_test_artist(&app, "Guns N Petals").await;
    let venue_id = create_test_venue(&app, "The Musical Hop").await;

    let show_data = json!({
        "start_time": (Utc::now() + Duration::days(3)).to_rfc3339(),
        "venue_id": venue_id,
        "artist_id": artist_id
    });
    let (show_status, _) = post_json(&app, "/api/shows", &show_data).await;
    assert_eq!(show_status, StatusCode::CREATED);

    let delete_response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/artists/{artist_id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(delete_response.status(), StatusCode::NO_CONTENT);

    let (_, shows_after) = get_json(&app, "/api/shows").await;
    assert_eq!(shows_after.as_array().unwrap().len(), 0);

    // The venue survives the cascade
    let (venue_status, _) = get_json(&app, &format!("/api/venues/{venue_id}")).await;
    assert_eq!(venue_status, StatusCode::OK);
}
