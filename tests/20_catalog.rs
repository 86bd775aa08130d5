mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

async fn get_json(server: &common::TestServer, path: &str) -> Result<Value> {
    let res = reqwest::Client::new()
        .get(format!("{}{}", server.base_url, path))
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::OK, "GET {path}: {}", res.status());
    Ok(res.json().await?)
}

#[tokio::test]
async fn psychologist_list_is_seeded_card_projection() -> Result<()> {
    let server = common::ensure_server().await?;
    let body = get_json(server, "/api/psychologists").await?;

    let rows = body.as_array().expect("bare array");
    assert_eq!(rows.len(), 3);
    for row in rows {
        assert!(row["id"].is_string());
        assert!(row["name"].is_string());
        assert!(row["price_cents"].is_number());
        // Full bio stays on the detail endpoint
        assert!(row.get("bio").is_none());
    }
    Ok(())
}

#[tokio::test]
async fn psychologist_detail_carries_full_record() -> Result<()> {
    let server = common::ensure_server().await?;
    let body = get_json(server, "/api/psychologists/psy-1").await?;
    assert_eq!(body["name"], json!("Dra. Elena Silva"));
    assert_eq!(
        body["bio"],
        json!("Especialista em ansiedade e adaptação cultural.")
    );
    assert_eq!(body["tags"], json!(["Ansiedade", "Adaptação"]));
    Ok(())
}

#[tokio::test]
async fn unknown_detail_ids_return_404() -> Result<()> {
    let server = common::ensure_server().await?;
    for path in [
        "/api/psychologists/psy-404",
        "/api/blog/blog-404",
        "/api/events/event-404",
        "/api/support-orgs/org-404",
    ] {
        let res = reqwest::Client::new()
            .get(format!("{}{}", server.base_url, path))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "{path}");
        let body: Value = res.json().await?;
        assert_eq!(body["message"], json!("Not found"), "{path}");
    }
    Ok(())
}

#[tokio::test]
async fn packages_are_ordered_by_session_count() -> Result<()> {
    let server = common::ensure_server().await?;
    let body = get_json(server, "/api/packages").await?;
    let sessions: Vec<i64> = body
        .as_array()
        .expect("bare array")
        .iter()
        .map(|p| p["sessions"].as_i64().unwrap())
        .collect();
    assert_eq!(sessions, vec![1, 2, 3, 4]);
    Ok(())
}

#[tokio::test]
async fn content_feeds_are_seeded() -> Result<()> {
    let server = common::ensure_server().await?;

    let blog = get_json(server, "/api/blog").await?;
    assert_eq!(blog.as_array().map(Vec::len), Some(3));

    let news = get_json(server, "/api/news").await?;
    assert_eq!(news.as_array().map(Vec::len), Some(3));

    let videos = get_json(server, "/api/videos").await?;
    assert_eq!(videos.as_array().map(Vec::len), Some(3));

    let orgs = get_json(server, "/api/support-orgs").await?;
    assert_eq!(orgs.as_array().map(Vec::len), Some(4));
    Ok(())
}

#[tokio::test]
async fn events_list_newest_first_with_status() -> Result<()> {
    let server = common::ensure_server().await?;
    let body = get_json(server, "/api/events").await?;
    let rows = body.as_array().expect("bare array");
    assert_eq!(rows.len(), 3);
    // Ordered by date_time descending: event-2 (Nov) before event-1 (Oct)
    assert_eq!(rows[0]["id"], json!("event-2"));
    assert_eq!(rows[2]["id"], json!("event-3"));
    assert_eq!(rows[2]["status"], json!("past"));
    assert_eq!(rows[2]["is_recorded"], json!(true));
    Ok(())
}

#[tokio::test]
async fn event_signup_requires_auth_then_succeeds() -> Result<()> {
    let server = common::ensure_server().await?;

    let anonymous = reqwest::Client::new()
        .post(format!("{}/api/events/event-1/signup", server.base_url))
        .json(&json!({}))
        .send()
        .await?;
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let client = common::client();
    common::register_user(server, &client, "signup").await?;
    let res = client
        .post(format!("{}/api/events/event-1/signup", server.base_url))
        .json(&json!({}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["ok"], json!(true));
    Ok(())
}

#[tokio::test]
async fn signup_against_missing_event_is_rejected() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = common::client();
    common::register_user(server, &client, "ghost-signup").await?;

    let res = client
        .post(format!("{}/api/events/event-404/signup", server.base_url))
        .json(&json!({}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn test_catalog_and_result_submission() -> Result<()> {
    let server = common::ensure_server().await?;

    let tests = get_json(server, "/api/tests").await?;
    assert_eq!(tests.as_array().map(Vec::len), Some(4));

    let client = common::client();
    common::register_user(server, &client, "assess").await?;

    // Missing testId is a validation error
    let res = client
        .post(format!("{}/api/test-results", server.base_url))
        .json(&json!({"score": 12}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body["message"], json!("Teste inválido"));

    let res = client
        .post(format!("{}/api/test-results", server.base_url))
        .json(&json!({"testId": "test-bai", "score": 12, "result": "Leve"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["ok"], json!(true));
    assert!(body["id"].is_string());
    Ok(())
}
