//! # Embeddings Provider
//!
//! Generates vector embeddings by calling an external embeddings API. The
//! payload is chosen from the endpoint URL: Gemini `embedContent` for
//! `generativelanguage.googleapis.com`, otherwise the OpenAI-compatible
//! `/embeddings` shape.

use crate::{errors::GeneratorError, providers::ai::EmbeddingProvider};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// --- OpenAI-compatible request and response structures ---

#[derive(Serialize, Debug)]
struct OpenAiEmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Deserialize, Debug)]
struct OpenAiEmbeddingResponse {
    data: Vec<OpenAiEmbeddingData>,
}

#[derive(Deserialize, Debug)]
struct OpenAiEmbeddingData {
    embedding: Vec<f32>,
}

// --- Gemini-specific request and response structures ---

#[derive(Serialize, Debug)]
struct GeminiEmbeddingRequest<'a> {
    model: String,
    content: GeminiEmbeddingContent<'a>,
}

#[derive(Serialize, Debug)]
struct GeminiEmbeddingContent<'a> {
    parts: Vec<GeminiEmbeddingPart<'a>>,
}

#[derive(Serialize, Debug)]
struct GeminiEmbeddingPart<'a> {
    text: &'a str,
}

#[derive(Deserialize, Debug)]
struct GeminiEmbeddingResponse {
    embedding: GeminiEmbeddingValue,
}

#[derive(Deserialize, Debug)]
struct GeminiEmbeddingValue {
    values: Vec<f32>,
}

/// An `EmbeddingProvider` backed by an external HTTP embeddings endpoint.
#[derive(Clone, Debug)]
pub struct ApiEmbedder {
    client: ReqwestClient,
    api_url: String,
    model: String,
    api_key: Option<String>,
}

impl ApiEmbedder {
    pub fn new(
        api_url: String,
        model: String,
        api_key: Option<String>,
    ) -> Result<Self, GeneratorError> {
        let client = ReqwestClient::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(GeneratorError::ReqwestClientBuild)?;
        Ok(Self {
            client,
            api_url,
            model,
            api_key,
        })
    }

    fn is_gemini(&self) -> bool {
        self.api_url.contains("generativelanguage.googleapis.com")
    }
}

#[async_trait]
impl EmbeddingProvider for ApiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, GeneratorError> {
        let mut request_builder = self.client.post(&self.api_url);

        if self.is_gemini() {
            // Gemini wants the model name prefixed with "models/" in the
            // payload and the key in an `x-goog-api-key` header.
            let gemini_model_name = if self.model.starts_with("models/") {
                self.model.clone()
            } else {
                format!("models/{}", self.model)
            };
            let request_body = GeminiEmbeddingRequest {
                model: gemini_model_name,
                content: GeminiEmbeddingContent {
                    parts: vec![GeminiEmbeddingPart { text }],
                },
            };
            debug!(payload = ?request_body, "--> Sending request to Gemini Embeddings API");
            request_builder = request_builder.json(&request_body);
            if let Some(key) = &self.api_key {
                request_builder = request_builder.header("x-goog-api-key", key);
            }
        } else {
            let request_body = OpenAiEmbeddingRequest {
                model: &self.model,
                input: text,
            };
            debug!(payload = ?request_body, "--> Sending request to OpenAI-compatible Embeddings API");
            request_builder = request_builder.json(&request_body);
            if let Some(key) = &self.api_key {
                request_builder = request_builder.bearer_auth(key);
            }
        }

        let response = request_builder
            .send()
            .await
            .map_err(GeneratorError::AiRequest)?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(GeneratorError::AiApi(error_text));
        }

        if self.is_gemini() {
            let gemini_response: GeminiEmbeddingResponse = response
                .json()
                .await
                .map_err(GeneratorError::AiDeserialization)?;
            Ok(gemini_response.embedding.values)
        } else {
            let openai_response: OpenAiEmbeddingResponse = response
                .json()
                .await
                .map_err(GeneratorError::AiDeserialization)?;
            openai_response
                .data
                .into_iter()
                .next()
                .map(|d| d.embedding)
                .ok_or_else(|| {
                    GeneratorError::AiApi(
                        "OpenAI-compatible API returned no embeddings".to_string(),
                    )
                })
        }
    }
}
