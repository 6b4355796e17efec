//! # Router and Handlers
//!
//! The webhook surface: `POST /callback` receives LINE events, verifies
//! the signature over the raw body, and answers each text message either
//! with the quick-reply menu or with a generated reply. The handler always
//! acknowledges with `OK` once the signature and payload check out; reply
//! dispatch failures are logged, not returned, since a reply token cannot
//! be retried.

use crate::{
    errors::AppError,
    line::{is_menu_trigger, verify_signature, WebhookPayload},
    state::AppState,
};
use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// Creates the Axum router with all the application routes.
pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/callback", post(callback_handler))
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
}

/// The root handler.
async fn root() -> &'static str {
    "chillbot server is running."
}

/// The health check handler.
async fn health_check() -> &'static str {
    "OK"
}

/// The LINE webhook handler.
async fn callback_handler(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<&'static str, AppError> {
    let signature = headers
        .get("x-line-signature")
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::InvalidSignature)?;

    if !verify_signature(&app_state.channel_secret, &body, signature) {
        warn!("Rejected webhook with invalid signature");
        return Err(AppError::InvalidSignature);
    }

    let payload: WebhookPayload = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("Malformed webhook payload: {e}")))?;

    for event in &payload.events {
        let (Some(text), Some(reply_token)) = (event.text(), event.reply_token.as_deref()) else {
            continue;
        };
        info!(text = %text, "Inbound user message");

        let dispatch = if is_menu_trigger(text) {
            app_state.line.reply_menu(reply_token).await
        } else {
            let reply = app_state.bot.answer(text).await;
            info!(reply = %reply, "Generated reply");
            app_state.line.reply_text(reply_token, &reply).await
        };

        if let Err(e) = dispatch {
            error!("Failed to dispatch reply: {e}");
        }
    }

    Ok("OK")
}
