#![allow(dead_code)]
//! # Common Test Utilities
//!
//! Spawns the full application on an ephemeral port with a mock HTTP
//! server standing in for both the Gemini API and the LINE reply API.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chillbot::providers::ai::gemini::GeminiProvider;
use chillbot::{BotClientBuilder, FaqIndex};
use chillbot_server::line::LineClient;
use chillbot_server::router::create_router;
use chillbot_server::state::AppState;
use hmac::{Hmac, Mac};
use httpmock::MockServer;
use sha2::Sha256;
use std::sync::Arc;
use tokio::net::TcpListener;

pub const CHANNEL_SECRET: &str = "test-channel-secret";
pub const GEMINI_PATH: &str = "/v1beta/models/gemini-2.0-flash:generateContent";
pub const LINE_REPLY_PATH: &str = "/v2/bot/message/reply";

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
    pub mock_server: MockServer,
}

impl TestApp {
    /// Spawns the router with the given FAQ source, the Gemini and LINE
    /// endpoints pointed at a fresh mock server.
    pub async fn spawn(faq_json: &str) -> anyhow::Result<Self> {
        let mock_server = MockServer::start();

        let faq = FaqIndex::from_json_str(faq_json)?;
        let ai_provider = GeminiProvider::new(
            format!("{}{}", mock_server.base_url(), GEMINI_PATH),
            "test-key".to_string(),
        )?;
        let bot = BotClientBuilder::new()
            .ai_provider(Box::new(ai_provider))
            .faq_index(faq)
            .build()
            .await?;
        let line = LineClient::with_reply_url(
            "test-access-token".to_string(),
            format!("{}{}", mock_server.base_url(), LINE_REPLY_PATH),
        )?;

        let app_state = AppState {
            bot: Arc::new(bot),
            line: Arc::new(line),
            channel_secret: Arc::new(CHANNEL_SECRET.to_string()),
        };

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let address = format!("http://{}", listener.local_addr()?);
        let app = create_router(app_state);
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("server crashed");
        });

        Ok(Self {
            address,
            client: reqwest::Client::new(),
            mock_server,
        })
    }

    /// Posts a webhook body to `/callback` with a valid signature.
    pub async fn post_callback(&self, body: &str) -> reqwest::Response {
        self.post_callback_signed(body, &sign(CHANNEL_SECRET, body))
            .await
    }

    pub async fn post_callback_signed(&self, body: &str, signature: &str) -> reqwest::Response {
        self.client
            .post(format!("{}/callback", self.address))
            .header("Content-Type", "application/json")
            .header("X-Line-Signature", signature)
            .body(body.to_string())
            .send()
            .await
            .expect("Failed to execute request.")
    }
}

/// Computes the `X-Line-Signature` value for a body.
pub fn sign(secret: &str, body: &str) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(body.as_bytes());
    BASE64.encode(mac.finalize().into_bytes())
}

/// A webhook payload with a single inbound text message.
pub fn text_message_body(text: &str, reply_token: &str) -> String {
    serde_json::json!({
        "events": [{
            "type": "message",
            "replyToken": reply_token,
            "message": { "type": "text", "text": text }
        }]
    })
    .to_string()
}
