//! # LINE Messaging Gateway
//!
//! The externally-provided framework glue: webhook signature verification,
//! webhook event payload types, reply dispatch through the LINE reply API,
//! and the quick-reply flex menu. No FAQ or prompt logic lives here.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use hmac::{Hmac, Mac};
use reqwest::Client as ReqwestClient;
use serde::Deserialize;
use serde_json::{json, Value};
use sha2::Sha256;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

const REPLY_ENDPOINT: &str = "https://api.line.me/v2/bot/message/reply";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors dispatching a reply through the LINE API. Logged at the handler;
/// a reply token cannot be retried, so these never reach the user.
#[derive(Error, Debug)]
pub enum ReplyError {
    #[error("Failed to build Reqwest client: {0}")]
    ClientBuild(reqwest::Error),
    #[error("Failed to send reply to LINE: {0}")]
    Request(reqwest::Error),
    #[error("LINE reply API returned an error: {0}")]
    Api(String),
}

/// Verifies the `X-Line-Signature` header: base64(HMAC-SHA256(secret, body)).
pub fn verify_signature(channel_secret: &str, body: &[u8], signature: &str) -> bool {
    let Ok(expected) = BASE64.decode(signature) else {
        return false;
    };
    let mut mac = Hmac::<Sha256>::new_from_slice(channel_secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(body);
    mac.verify_slice(&expected).is_ok()
}

// --- Webhook payload types ---

#[derive(Deserialize, Debug)]
pub struct WebhookPayload {
    #[serde(default)]
    pub events: Vec<WebhookEvent>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub reply_token: Option<String>,
    #[serde(default)]
    pub message: Option<EventMessage>,
}

#[derive(Deserialize, Debug)]
pub struct EventMessage {
    #[serde(rename = "type")]
    pub message_type: String,
    #[serde(default)]
    pub text: Option<String>,
}

impl WebhookEvent {
    /// Returns the trimmed message text for inbound text-message events.
    pub fn text(&self) -> Option<&str> {
        if self.event_type != "message" {
            return None;
        }
        let message = self.message.as_ref()?;
        if message.message_type != "text" {
            return None;
        }
        message.text.as_deref().map(str::trim)
    }
}

/// Whether the message asks for the quick-reply menu instead of an answer.
///
/// ASCII triggers are case-insensitive, matching the original gateway.
pub fn is_menu_trigger(text: &str) -> bool {
    matches!(
        text.to_lowercase().as_str(),
        "menu" | "hi" | "hello" | "選單" | "我要問問題"
    )
}

// --- Reply dispatch ---

/// A client for the LINE reply API.
#[derive(Clone, Debug)]
pub struct LineClient {
    client: ReqwestClient,
    reply_url: String,
    access_token: String,
}

impl LineClient {
    pub fn new(access_token: String) -> Result<Self, ReplyError> {
        Self::with_reply_url(access_token, REPLY_ENDPOINT.to_string())
    }

    /// Points the client at a non-default reply endpoint (tests).
    pub fn with_reply_url(access_token: String, reply_url: String) -> Result<Self, ReplyError> {
        let client = ReqwestClient::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(ReplyError::ClientBuild)?;
        Ok(Self {
            client,
            reply_url,
            access_token,
        })
    }

    /// Replies with a single plain-text message.
    pub async fn reply_text(&self, reply_token: &str, text: &str) -> Result<(), ReplyError> {
        let messages = json!([{ "type": "text", "text": text }]);
        self.reply(reply_token, messages).await
    }

    /// Replies with the quick-reply flex menu.
    pub async fn reply_menu(&self, reply_token: &str) -> Result<(), ReplyError> {
        info!("Dispatching quick-reply menu");
        let messages = json!([{
            "type": "flex",
            "altText": "請選擇你想問的問題",
            "contents": flex_menu(),
        }]);
        self.reply(reply_token, messages).await
    }

    async fn reply(&self, reply_token: &str, messages: Value) -> Result<(), ReplyError> {
        let body = json!({
            "replyToken": reply_token,
            "messages": messages,
        });

        let response = self
            .client
            .post(&self.reply_url)
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await
            .map_err(ReplyError::Request)?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ReplyError::Api(error_text));
        }
        Ok(())
    }
}

/// The flex bubble with the four canned questions.
pub fn flex_menu() -> Value {
    let button = |label: &str, text: &str| {
        json!({
            "type": "button",
            "action": { "type": "message", "label": label, "text": text },
            "style": "secondary",
        })
    };
    json!({
        "type": "bubble",
        "body": {
            "type": "box",
            "layout": "vertical",
            "contents": [
                { "type": "text", "text": "💬 想問什麼呢？", "weight": "bold", "size": "md" },
                { "type": "text", "text": "點選以下問題快速詢問", "size": "sm", "color": "#555555", "margin": "md" }
            ]
        },
        "footer": {
            "type": "box",
            "layout": "vertical",
            "spacing": "sm",
            "contents": [
                button("✔ 哪些可以報帳？", "哪些可以報帳？"),
                button("✖ 哪些不能報？", "哪些不能報帳？"),
                button("🧾 發票遺失怎麼辦？", "發票遺失怎麼辦？"),
                button("📸 一定要附活動照片嗎？", "一定要附活動照片嗎？")
            ]
        }
    })
}
