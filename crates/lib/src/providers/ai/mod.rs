pub mod embedding;
pub mod gemini;

use crate::errors::GeneratorError;
use async_trait::async_trait;
use dyn_clone::DynClone;
use std::fmt::Debug;

/// A trait for the external generative-model endpoint.
///
/// The core depends on the answer generator only through this contract:
/// one composed prompt in, one free-text answer out, with any transport or
/// payload failure surfaced as a `GeneratorError` for the caller to map to
/// the fallback message.
#[async_trait]
pub trait AiProvider: Send + Sync + Debug + DynClone {
    /// Generates a response for the composed prompt.
    async fn generate(&self, prompt: &str) -> Result<String, GeneratorError>;
}

dyn_clone::clone_trait_object!(AiProvider);

/// A trait for the sentence-embedding endpoint used by the semantic matcher.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync + Debug + DynClone {
    /// Returns a fixed-length embedding vector for `text`.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, GeneratorError>;
}

dyn_clone::clone_trait_object!(EmbeddingProvider);
