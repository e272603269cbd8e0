//! E2E tests for the review feed and likes

mod common;

use common::TestServer;
use serde_json::{Value, json};

fn tracks(feed: &Value) -> Vec<String> {
    feed["entries"]
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["track"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_feed_hides_own_reviews_newest_first() {
    let server = TestServer::new().await;
    let ada = server.sign_up("ada").await;
    let bob = server.sign_up("bob").await;

    server.publish_review(&bob, 0, 4.0, "classic").await;
    server.publish_review(&ada, 0, 3.0, "mine").await;
    server.publish_review(&bob, 1, 5.0, "even better").await;

    let feed: Value = server.get("/api/v1/feed", &ada).await.json().await.unwrap();
    assert_eq!(feed["mode"], "everyone");
    assert_eq!(tracks(&feed), vec!["Around the World", "One More Time"]);
    assert!(
        feed["entries"]
            .as_array()
            .unwrap()
            .iter()
            .all(|entry| entry["username"] == "bob")
    );
}

#[tokio::test]
async fn test_following_mode_filters_by_subscription() {
    let server = TestServer::new().await;
    let ada = server.sign_up("ada").await;
    let bob = server.sign_up("bob").await;
    let cy = server.sign_up("cy").await;

    server.publish_review(&bob, 0, 4.0, "").await;
    server.publish_review(&cy, 1, 2.0, "").await;

    let feed: Value = server
        .get("/api/v1/feed?mode=following", &ada)
        .await
        .json()
        .await
        .unwrap();
    assert!(feed["entries"].as_array().unwrap().is_empty());

    let response = server
        .post("/api/v1/profiles/bob/subscribe", &ada, Value::Null)
        .await;
    assert_eq!(response.status(), 200);

    let feed: Value = server
        .get("/api/v1/feed?mode=following", &ada)
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(feed["mode"], "following");
    assert_eq!(tracks(&feed), vec!["One More Time"]);
}

#[tokio::test]
async fn test_like_toggles_and_persists() {
    let server = TestServer::new().await;
    let ada = server.sign_up("ada").await;
    let bob = server.sign_up("bob").await;

    let review = server.publish_review(&ada, 0, 4.5, "great").await;
    let id = review["id"].as_str().unwrap();
    assert_eq!(review["likes"], 0);

    let liked: Value = server
        .post(&format!("/api/v1/reviews/{id}/like"), &bob, Value::Null)
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(liked["likes"], 1);
    assert_eq!(liked["liked"], true);
    assert_eq!(liked["liked_by"], json!(["bob"]));

    let feed: Value = server.get("/api/v1/feed", &bob).await.json().await.unwrap();
    assert_eq!(feed["entries"][0]["likes"], 1);
    assert_eq!(feed["entries"][0]["liked"], true);

    let unliked: Value = server
        .post(&format!("/api/v1/reviews/{id}/like"), &bob, Value::Null)
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(unliked["likes"], 0);
    assert_eq!(unliked["liked"], false);
    assert_eq!(unliked["liked_by"], json!([]));
}

#[tokio::test]
async fn test_like_unknown_review_is_not_found() {
    let server = TestServer::new().await;
    let ada = server.sign_up("ada").await;

    let response = server
        .post("/api/v1/reviews/01J00000000000000000000000/like", &ada, Value::Null)
        .await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_feed_page_renders_for_logged_in_user() {
    let server = TestServer::new().await;
    let ada = server.sign_up("ada").await;
    let bob = server.sign_up("bob").await;
    server.publish_review(&bob, 0, 4.0, "<b>loud</b>").await;

    let response = server
        .client
        .get(server.url("/"))
        .bearer_auth(&ada)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body = response.text().await.unwrap();
    assert!(body.contains("Feed: everyone"));
    assert!(body.contains("One More Time"));
    assert!(body.contains("&lt;b&gt;loud&lt;/b&gt;"));
}
