//! # Webhook Endpoint Tests
//!
//! Integration tests for the LINE callback endpoint: signature checks,
//! reply dispatch on the happy path, the generator-failure fallback, and
//! the quick-reply menu.

mod common;

use anyhow::Result;
use common::{text_message_body, TestApp, GEMINI_PATH, LINE_REPLY_PATH};
use httpmock::Method::POST;
use serde_json::json;

#[tokio::test]
async fn test_root_and_health_check_endpoints() -> Result<()> {
    let app = TestApp::spawn(r#"{"q": "a"}"#).await?;

    let root_response = app
        .client
        .get(format!("{}/", app.address))
        .send()
        .await
        .expect("Failed to execute request to /");
    assert!(root_response.status().is_success());
    assert_eq!(
        "chillbot server is running.",
        root_response.text().await.unwrap()
    );

    let health_response = app
        .client
        .get(format!("{}/health", app.address))
        .send()
        .await
        .expect("Failed to execute request to /health");
    assert!(health_response.status().is_success());
    assert_eq!("OK", health_response.text().await.unwrap());

    Ok(())
}

#[tokio::test]
async fn test_callback_rejects_invalid_signature() -> Result<()> {
    let app = TestApp::spawn(r#"{"q": "a"}"#).await?;
    let line_mock = app.mock_server.mock(|when, then| {
        when.method(POST).path(LINE_REPLY_PATH);
        then.status(200).json_body(json!({}));
    });

    let body = text_message_body("發票遺失怎麼辦？", "token-1");
    let response = app.post_callback_signed(&body, "bm90IHRoZSBtYWM=").await;

    assert_eq!(400, response.status().as_u16());
    line_mock.assert_hits(0);
    Ok(())
}

#[tokio::test]
async fn test_callback_rejects_missing_signature_header() -> Result<()> {
    let app = TestApp::spawn(r#"{"q": "a"}"#).await?;

    let response = app
        .client
        .post(format!("{}/callback", app.address))
        .header("Content-Type", "application/json")
        .body(text_message_body("hi", "token-1"))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(400, response.status().as_u16());
    Ok(())
}

#[tokio::test]
async fn test_faq_question_is_answered_via_generator() -> Result<()> {
    let app = TestApp::spawn(r#"{"發票遺失怎麼辦？": "請申請補發證明"}"#).await?;

    let gemini_mock = app.mock_server.mock(|when, then| {
        when.method(POST)
            .path(GEMINI_PATH)
            // The composed prompt must carry the matched FAQ pair.
            .body_contains("請申請補發證明")
            .body_contains("發票遺失怎麼辦？");
        then.status(200).json_body(json!({
            "candidates": [{"content": {"parts": [{"text": "請至超商申請補開證明"}]}}]
        }));
    });
    let line_mock = app.mock_server.mock(|when, then| {
        when.method(POST)
            .path(LINE_REPLY_PATH)
            .body_contains("token-1")
            .body_contains("請至超商申請補開證明");
        then.status(200).json_body(json!({}));
    });

    let body = text_message_body("發票遺失怎麼辦？", "token-1");
    let response = app.post_callback(&body).await;

    assert!(response.status().is_success());
    assert_eq!("OK", response.text().await.unwrap());
    gemini_mock.assert();
    line_mock.assert();
    Ok(())
}

#[tokio::test]
async fn test_generator_failure_replies_with_fallback() -> Result<()> {
    let app = TestApp::spawn(r#"{"發票遺失怎麼辦？": "請申請補發證明"}"#).await?;

    let gemini_mock = app.mock_server.mock(|when, then| {
        when.method(POST).path(GEMINI_PATH);
        then.status(503).body("temporarily overloaded");
    });
    let line_mock = app.mock_server.mock(|when, then| {
        when.method(POST)
            .path(LINE_REPLY_PATH)
            .body_contains("很抱歉，我暫時無法回應。");
        then.status(200).json_body(json!({}));
    });

    let body = text_message_body("發票遺失怎麼辦？", "token-2");
    let response = app.post_callback(&body).await;

    // The reply path fails soft: the webhook is still acknowledged and the
    // user receives the fixed fallback message.
    assert!(response.status().is_success());
    gemini_mock.assert();
    line_mock.assert();
    Ok(())
}

#[tokio::test]
async fn test_menu_trigger_replies_with_flex_menu() -> Result<()> {
    let app = TestApp::spawn(r#"{"q": "a"}"#).await?;

    let gemini_mock = app.mock_server.mock(|when, then| {
        when.method(POST).path(GEMINI_PATH);
        then.status(200).json_body(json!({
            "candidates": [{"content": {"parts": [{"text": "unused"}]}}]
        }));
    });
    let line_mock = app.mock_server.mock(|when, then| {
        when.method(POST)
            .path(LINE_REPLY_PATH)
            .body_contains("flex")
            .body_contains("請選擇你想問的問題");
        then.status(200).json_body(json!({}));
    });

    let body = text_message_body("選單", "token-3");
    let response = app.post_callback(&body).await;

    assert!(response.status().is_success());
    line_mock.assert();
    gemini_mock.assert_hits(0);
    Ok(())
}

#[tokio::test]
async fn test_non_text_events_are_ignored() -> Result<()> {
    let app = TestApp::spawn(r#"{"q": "a"}"#).await?;
    let line_mock = app.mock_server.mock(|when, then| {
        when.method(POST).path(LINE_REPLY_PATH);
        then.status(200).json_body(json!({}));
    });

    let body = json!({
        "events": [
            {"type": "follow", "replyToken": "token-4"},
            {"type": "message", "replyToken": "token-5",
             "message": {"type": "sticker"}}
        ]
    })
    .to_string();
    let response = app.post_callback(&body).await;

    assert!(response.status().is_success());
    line_mock.assert_hits(0);
    Ok(())
}

#[tokio::test]
async fn test_malformed_payload_is_bad_request() -> Result<()> {
    let app = TestApp::spawn(r#"{"q": "a"}"#).await?;

    let body = r#"{"events": ["#;
    let response = app.post_callback(body).await;

    assert_eq!(400, response.status().as_u16());
    Ok(())
}
