//! # Semantic Matcher
//!
//! The second-generation matching strategy: dense-vector nearest-neighbor
//! retrieval. Every FAQ question is embedded once at startup through a
//! multilingual sentence-embedding endpoint and the vectors (with their
//! pre-computed norms) are cached in index order for the process lifetime.
//! A query embeds the user text with the same model and takes the argmax
//! of cosine similarity over a linear scan.
//!
//! Unlike the substring matcher this always returns exactly one candidate.
//! There is deliberately no minimum-similarity floor; the raw score is
//! surfaced so callers can log it and a threshold can be introduced later
//! as an explicit behavior change.

use crate::errors::GeneratorError;
use crate::faq::{FaqEntry, FaqIndex};
use crate::providers::ai::EmbeddingProvider;
use tracing::{debug, info};

struct CachedVector {
    embedding: Vec<f32>,
    norm: f32,
}

/// Pre-computed question embeddings, 1:1 with the FAQ entries in index order.
pub struct SemanticIndex {
    entries: Vec<FaqEntry>,
    vectors: Vec<CachedVector>,
}

/// The nearest FAQ entry and its cosine similarity to the query.
#[derive(Debug, Clone, PartialEq)]
pub struct SemanticMatch {
    pub entry: FaqEntry,
    pub score: f32,
}

impl SemanticIndex {
    /// Embeds every FAQ question and caches the vectors. Called once at
    /// startup; an embedding failure here is fatal, not a reply-path error.
    pub async fn build(
        index: &FaqIndex,
        embedder: &dyn EmbeddingProvider,
    ) -> Result<Self, GeneratorError> {
        let mut vectors = Vec::with_capacity(index.len());
        for entry in index.entries() {
            let embedding = embedder.embed(&entry.question).await?;
            let norm = vector_norm(&embedding);
            vectors.push(CachedVector { embedding, norm });
        }
        info!(questions = vectors.len(), "Embedded FAQ questions");
        Ok(Self {
            entries: index.entries().to_vec(),
            vectors,
        })
    }

    /// Returns the FAQ entry whose question embedding is most similar to
    /// `user_text`, with argmax semantics: ties and an empty index aside,
    /// exactly one candidate, regardless of how low the best score is.
    pub async fn best_match(
        &self,
        embedder: &dyn EmbeddingProvider,
        user_text: &str,
    ) -> Result<Option<SemanticMatch>, GeneratorError> {
        if self.entries.is_empty() {
            return Ok(None);
        }
        let query = embedder.embed(user_text).await?;
        let query_norm = vector_norm(&query);

        let mut best_idx = 0;
        let mut best_score = f32::MIN;
        for (i, cached) in self.vectors.iter().enumerate() {
            let score = cosine_similarity(&query, query_norm, cached);
            // Strict comparison keeps the first occurrence on ties.
            if score > best_score {
                best_score = score;
                best_idx = i;
            }
        }

        let entry = self.entries[best_idx].clone();
        debug!(question = %entry.question, score = best_score, "Semantic best match");
        Ok(Some(SemanticMatch {
            entry,
            score: best_score,
        }))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn vector_norm(vec: &[f32]) -> f32 {
    vec.iter().map(|v| v * v).sum::<f32>().sqrt()
}

fn cosine_similarity(query: &[f32], query_norm: f32, cached: &CachedVector) -> f32 {
    if query_norm == 0.0 || cached.norm == 0.0 {
        return 0.0;
    }
    let dot = query
        .iter()
        .zip(cached.embedding.iter())
        .map(|(a, b)| a * b)
        .sum::<f32>();
    dot / (query_norm * cached.norm)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity_of_identical_vectors_is_one() {
        let v = vec![0.6f32, 0.8];
        let cached = CachedVector {
            norm: vector_norm(&v),
            embedding: v.clone(),
        };
        let score = cosine_similarity(&v, vector_norm(&v), &cached);
        assert!((score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_of_orthogonal_vectors_is_zero() {
        let a = vec![1.0f32, 0.0];
        let b = vec![0.0f32, 1.0];
        let cached = CachedVector {
            norm: vector_norm(&b),
            embedding: b,
        };
        let score = cosine_similarity(&a, vector_norm(&a), &cached);
        assert!(score.abs() < 1e-6);
    }

    #[test]
    fn test_zero_norm_query_scores_zero_instead_of_nan() {
        let zero = vec![0.0f32, 0.0];
        let cached = CachedVector {
            embedding: vec![1.0, 0.0],
            norm: 1.0,
        };
        assert_eq!(cosine_similarity(&zero, vector_norm(&zero), &cached), 0.0);
    }
}
