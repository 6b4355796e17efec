//! # Application State
//!
//! Builds the shared application state once at startup: the FAQ knowledge
//! base, the bot client (with its AI and embedding providers), and the
//! LINE reply client. Everything is immutable after this point and shared
//! by reference across in-flight requests.

use crate::config::AppConfig;
use crate::line::LineClient;
use chillbot::providers::ai::{embedding::ApiEmbedder, gemini::GeminiProvider};
use chillbot::{BotClient, BotClientBuilder, FaqIndex};
use std::sync::Arc;
use tracing::info;

/// The shared application state, accessible from all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub bot: Arc<BotClient>,
    pub line: Arc<LineClient>,
    /// Channel secret for webhook signature verification.
    pub channel_secret: Arc<String>,
}

/// Builds the shared application state from the configuration.
///
/// A malformed or missing FAQ resource, a missing credential, or a failed
/// startup embedding pass aborts here; the process must not start with a
/// partial knowledge base.
pub async fn build_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    let faq = FaqIndex::load_json_file(&config.faq_path)?;
    info!(path = %config.faq_path, entries = faq.len(), "FAQ knowledge base loaded");

    let ai_provider = GeminiProvider::new(config.ai_api_url.clone(), config.ai_api_key.clone())?;

    let mut builder = BotClientBuilder::new()
        .ai_provider(Box::new(ai_provider))
        .faq_index(faq);

    if let Some(embeddings_api_url) = &config.embeddings_api_url {
        info!(url = %embeddings_api_url, model = %config.embeddings_model, "Semantic matching enabled");
        let embedder = ApiEmbedder::new(
            embeddings_api_url.clone(),
            config.embeddings_model.clone(),
            config.embeddings_api_key.clone(),
        )?;
        builder = builder.embedder(Box::new(embedder));
    } else {
        info!("No embeddings endpoint configured, using substring matching");
    }

    let bot = builder.build().await?;
    let line = LineClient::new(config.line_channel_access_token.clone())?;

    Ok(AppState {
        bot: Arc::new(bot),
        line: Arc::new(line),
        channel_secret: Arc::new(config.line_channel_secret),
    })
}
