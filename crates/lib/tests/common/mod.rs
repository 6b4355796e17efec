#![allow(dead_code)]
//! # Common Test Utilities
//!
//! Shared mock providers for testing the reply pipeline without any
//! network access.

use async_trait::async_trait;
use chillbot::providers::ai::{AiProvider, EmbeddingProvider};
use chillbot::GeneratorError;
use std::collections::HashMap;
use std::sync::{Arc, Once, RwLock};

static INIT: Once = Once::new();

/// Initializes the tracing subscriber for tests.
pub fn setup_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt::init();
    });
}

// --- Mock AI Provider for Logic Testing ---

#[derive(Clone, Debug)]
pub struct MockAiProvider {
    pub call_history: Arc<RwLock<Vec<String>>>,
    pub responses: Arc<RwLock<Vec<Result<String, String>>>>,
}

impl MockAiProvider {
    /// Queues responses in call order. `Err` entries simulate a generator
    /// failure with that message.
    pub fn new(responses: Vec<Result<String, String>>) -> Self {
        Self {
            call_history: Arc::new(RwLock::new(Vec::new())),
            responses: Arc::new(RwLock::new(responses.into_iter().rev().collect())),
        }
    }
}

#[async_trait]
impl AiProvider for MockAiProvider {
    async fn generate(&self, prompt: &str) -> Result<String, GeneratorError> {
        self.call_history.write().unwrap().push(prompt.to_string());
        match self.responses.write().unwrap().pop() {
            Some(Ok(response)) => Ok(response),
            Some(Err(msg)) => Err(GeneratorError::AiApi(msg)),
            None => Ok("Default mock response".to_string()),
        }
    }
}

// --- Mock Embedding Provider ---

/// A deterministic embedder: known texts map to fixed vectors, anything
/// else gets the configured default.
#[derive(Clone, Debug)]
pub struct MockEmbedder {
    vectors: HashMap<String, Vec<f32>>,
    default: Vec<f32>,
}

impl MockEmbedder {
    pub fn new(vectors: HashMap<String, Vec<f32>>, default: Vec<f32>) -> Self {
        Self { vectors, default }
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, GeneratorError> {
        Ok(self
            .vectors
            .get(text)
            .cloned()
            .unwrap_or_else(|| self.default.clone()))
    }
}

/// An embedder that always fails, for exercising the fail-soft path.
#[derive(Clone, Debug)]
pub struct FailingEmbedder;

#[async_trait]
impl EmbeddingProvider for FailingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, GeneratorError> {
        Err(GeneratorError::AiApi("embedding endpoint is down".to_string()))
    }
}

/// Succeeds for texts it knows (the startup pass over the FAQ questions)
/// and fails for everything else (the query-time call).
#[derive(Clone, Debug)]
pub struct HalfFailingEmbedder {
    known: HashMap<String, Vec<f32>>,
}

impl HalfFailingEmbedder {
    pub fn new(known: HashMap<String, Vec<f32>>) -> Self {
        Self { known }
    }
}

#[async_trait]
impl EmbeddingProvider for HalfFailingEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, GeneratorError> {
        self.known
            .get(text)
            .cloned()
            .ok_or_else(|| GeneratorError::AiApi("embedding endpoint is down".to_string()))
    }
}
