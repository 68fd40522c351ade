mod common;

use axum::http::{Method, StatusCode};
use chrono::{Duration, Utc};
use serde_json::json;
use uuid::Uuid;

use noter_api::config::AppConfig;

use common::TestApp;

fn roomy_app() -> TestApp {
    let mut config = AppConfig::development();
    config.rate_limit.free.capacity = 100;
    config.rate_limit.basic.capacity = 100;
    TestApp::with_config(config)
}

async fn create(app: &TestApp, token: &str, title: &str) -> i64 {
    let response = app
        .send(Method::POST, "/api/v1/notes", Some(token), Some(json!({ "title": title, "content": "body" })))
        .await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.body);
    response.body["id"].as_i64().expect("id")
}

#[tokio::test]
async fn note_lifecycle() {
    let app = roomy_app();
    let token = app.token();

    let id = create(&app, &token, "Groceries").await;
    let path = format!("/api/v1/notes/{}", id);

    let fetched = app.get(&path, Some(&token)).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body["title"], "Groceries");
    assert_eq!(fetched.body["content"], "body");
    assert!(fetched.body.get("createdOn").is_some());

    let updated = app
        .send(Method::PUT, &path, Some(&token), Some(json!({ "title": "Errands" })))
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["title"], "Errands");
    assert_eq!(updated.body["content"], json!(null));

    let deleted = app.send(Method::DELETE, &path, Some(&token), None).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let gone = app.get(&path, Some(&token)).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
    assert_eq!(gone.body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn notes_are_private_to_their_owner() {
    let app = roomy_app();
    let owner = Uuid::new_v4();
    let intruder = Uuid::new_v4();

    let id = create(&app, &app.token_for(owner), "Secret").await;
    let response = app
        .get(&format!("/api/v1/notes/{}", id), Some(&app.token_for(intruder)))
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(
        response.body["message"],
        format!("Note not found for id {} and user {}", id, intruder)
    );
}

#[tokio::test]
async fn blank_title_fails_validation() {
    let app = roomy_app();
    let response = app
        .send(Method::POST, "/api/v1/notes", Some(&app.token()), Some(json!({ "title": "  " })))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "Validation failed");
    assert_eq!(response.body["details"]["title"], "Title must not be blank");
}

#[tokio::test]
async fn updating_a_missing_note_is_a_bad_request() {
    let app = roomy_app();
    let response = app
        .send(Method::PUT, "/api/v1/notes/999", Some(&app.token()), Some(json!({ "title": "x" })))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn deleting_a_missing_note_is_not_found() {
    let app = roomy_app();
    let response = app
        .send(Method::DELETE, "/api/v1/notes/999", Some(&app.token()), None)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn non_numeric_id_is_a_bad_request() {
    let app = roomy_app();
    let response = app.get("/api/v1/notes/abc", Some(&app.token())).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn listing_pages_and_hides_expired_notes() {
    let app = roomy_app();
    let token = app.token();

    for title in ["one", "two", "three"] {
        create(&app, &token, title).await;
    }
    let expired = app
        .send(
            Method::POST,
            "/api/v1/notes",
            Some(&token),
            Some(json!({
                "title": "old",
                "expiresAt": (Utc::now() - Duration::minutes(1)).to_rfc3339(),
            })),
        )
        .await;
    assert_eq!(expired.status, StatusCode::OK);

    let first = app
        .get("/api/v1/notes?page=0&size=2&sortBy=createdOn&direction=asc", Some(&token))
        .await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.body["hasPrevious"], false);
    assert_eq!(first.body["hasNext"], true);
    let titles: Vec<_> = first.body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["title"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(titles, vec!["one", "two"]);
    assert!(first.body["data"][0].get("content").is_none());

    let second = app
        .get("/api/v1/notes?page=1&size=2&sortBy=createdOn&direction=asc", Some(&token))
        .await;
    assert_eq!(second.body["hasPrevious"], true);
    assert_eq!(second.body["hasNext"], false);
    assert_eq!(second.body["data"].as_array().unwrap().len(), 1);
    assert_eq!(second.body["data"][0]["title"], "three");
}

#[tokio::test]
async fn latest_lists_recent_notes() {
    let app = roomy_app();
    let token = app.token();

    create(&app, &token, "first").await;
    create(&app, &token, "second").await;

    let response = app.get("/api/v1/notes/latest", Some(&token)).await;
    assert_eq!(response.status, StatusCode::OK);
    let notes = response.body.as_array().expect("array");
    assert_eq!(notes.len(), 2);
}

#[tokio::test]
async fn handler_without_identity_answers_unauthorized() {
    let mut config = AppConfig::development();
    config.security.public_paths.push("/api/v1/notes".to_string());
    let app = TestApp::with_config(config);

    let response = app.get("/api/v1/notes", None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["code"], "UNAUTHORIZED");
    assert_eq!(response.body["message"], "Invalid Authentication!");
    // The rate gate lets unauthenticated requests through untouched
    assert!(response.remaining().is_none());
}
