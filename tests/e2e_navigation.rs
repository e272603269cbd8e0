//! E2E tests for view navigation

mod common;

use common::TestServer;
use serde_json::{Value, json};

#[tokio::test]
async fn test_default_view_is_everyone_feed() {
    let server = TestServer::new().await;
    let ada = server.sign_up("ada").await;

    let view: Value = server.get("/api/v1/view", &ada).await.json().await.unwrap();
    assert_eq!(view["view"], "feed");
    assert_eq!(view["mode"], "everyone");
    assert!(view["entries"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_navigate_between_views() {
    let server = TestServer::new().await;
    let ada = server.sign_up("ada").await;
    server.sign_up("bob").await;

    let view: Value = server
        .post("/api/v1/navigate", &ada, json!({"view": "profile", "username": "bob"}))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(view["view"], "profile");
    assert_eq!(view["username"], "bob");
    assert_eq!(view["is_subscribed"], false);

    let view: Value = server
        .post("/api/v1/navigate", &ada, json!({"view": "listen_list"}))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(view["view"], "listen_list");

    let view: Value = server
        .post("/api/v1/navigate", &ada, json!({"view": "feed", "mode": "following"}))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(view["view"], "feed");
    assert_eq!(view["mode"], "following");

    // The active view sticks until the next navigation.
    let view: Value = server.get("/api/v1/view", &ada).await.json().await.unwrap();
    assert_eq!(view["mode"], "following");
}

#[tokio::test]
async fn test_navigate_to_unknown_profile_keeps_view() {
    let server = TestServer::new().await;
    let ada = server.sign_up("ada").await;

    let response = server
        .post("/api/v1/navigate", &ada, json!({"view": "profile", "username": "ghost"}))
        .await;
    assert_eq!(response.status(), 404);

    let session: Value = server.get("/api/v1/session", &ada).await.json().await.unwrap();
    assert_eq!(session["active_view"]["view"], "feed");
}

#[tokio::test]
async fn test_rate_view_keeps_search_results() {
    let server = TestServer::new().await;
    let ada = server.sign_up("ada").await;

    server
        .post("/api/v1/rate/search", &ada, json!({"query": "daft"}))
        .await;
    let view: Value = server
        .post("/api/v1/navigate", &ada, json!({"view": "rate_track"}))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(view["view"], "rate_track");
    assert_eq!(view["results"].as_array().unwrap().len(), 2);

    let session: Value = server.get("/api/v1/session", &ada).await.json().await.unwrap();
    assert_eq!(session["pending_review_results"], 2);
    assert_eq!(session["pending_listen_results"], 0);
}

#[tokio::test]
async fn test_navigate_form_redirects_home() {
    let server = TestServer::new().await;
    let ada = server.sign_up("ada").await;

    let response = server
        .client
        .post(server.url("/navigate"))
        .bearer_auth(&ada)
        .form(&[("view", "listen_list")])
        .send()
        .await
        .unwrap();
    assert!(response.status().is_redirection());

    let body = server
        .client
        .get(server.url("/"))
        .bearer_auth(&ada)
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.contains("To listen"));
    assert!(body.contains("Your list is empty."));
}
