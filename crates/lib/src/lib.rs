//! # Seasonal-Subsidy Support Bot Core
//!
//! This crate implements the reply pipeline of a customer-support chat bot
//! for a transit company's seasonal subsidy program: match the incoming
//! message against a small FAQ knowledge base (substring containment or
//! embedding-based nearest neighbor), compose a prompt from the policy
//! brief, the retrieved FAQ pair, and the user question, and delegate the
//! answer to an external generative model.
//!
//! The messaging gateway (webhook, signature verification, reply dispatch)
//! lives in the `chillbot-server` crate; this crate only sees plain user
//! text and returns plain reply text.

pub mod errors;
pub mod faq;
pub mod prompts;
pub mod providers;

pub use errors::{FaqLoadError, GeneratorError};
pub use faq::{semantic::SemanticIndex, FaqEntry, FaqIndex};
pub use prompts::{compose_prompt, PromptReference, ACTIVITY_POLICY, FALLBACK_MESSAGE};

use faq::substring::match_substring;
use providers::ai::{AiProvider, EmbeddingProvider};
use tracing::{debug, error, info};

/// The immutable bot context, built once at startup and shared read-only
/// across all in-flight requests.
///
/// When an embedding provider is configured, FAQ questions are embedded at
/// build time and matching is semantic; otherwise the substring matcher
/// runs over the source tree.
pub struct BotClient {
    ai_provider: Box<dyn AiProvider>,
    embedder: Option<Box<dyn EmbeddingProvider>>,
    faq: FaqIndex,
    semantic: Option<SemanticIndex>,
    policy: String,
    fallback: String,
}

impl std::fmt::Debug for BotClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotClient")
            .field("faq_entries", &self.faq.len())
            .field("semantic", &self.semantic.is_some())
            .finish_non_exhaustive()
    }
}

impl BotClient {
    /// Answers a single inbound message.
    ///
    /// This is the fail-soft reply path: any failure calling the external
    /// model (embedding or generation) is logged and degraded to the fixed
    /// fallback message. It never returns an error to the gateway.
    pub async fn answer(&self, user_text: &str) -> String {
        match self.try_answer(user_text).await {
            Ok(reply) => reply,
            Err(e) => {
                error!("Generator failure, degrading to fallback: {e}");
                self.fallback.clone()
            }
        }
    }

    async fn try_answer(&self, user_text: &str) -> Result<String, GeneratorError> {
        let reference = self.find_reference(user_text).await?;
        match &reference {
            Some(r) => info!(question = %r.question, "FAQ reference attached"),
            None => info!("No FAQ reference for message"),
        }

        let prompt = compose_prompt(&self.policy, reference.as_ref(), user_text);
        debug!(prompt = %prompt, "--> Sending prompt to AI provider");

        self.ai_provider.generate(&prompt).await
    }

    /// Selects the FAQ reference for the prompt.
    ///
    /// Semantic mode always yields a best match (no similarity floor; the
    /// score is logged so a threshold can be introduced later). Substring
    /// mode may legitimately yield nothing.
    async fn find_reference(
        &self,
        user_text: &str,
    ) -> Result<Option<PromptReference>, GeneratorError> {
        if let (Some(semantic), Some(embedder)) = (&self.semantic, &self.embedder) {
            let hit = semantic.best_match(embedder.as_ref(), user_text).await?;
            return Ok(hit.map(|m| {
                info!(question = %m.entry.question, score = m.score, "Semantic match");
                PromptReference {
                    question: m.entry.question,
                    answer: m.entry.answer,
                }
            }));
        }

        Ok(match_substring(self.faq.tree(), user_text).map(|m| PromptReference {
            question: m.question,
            answer: m.answer,
        }))
    }

    pub fn faq(&self) -> &FaqIndex {
        &self.faq
    }

    pub fn fallback_message(&self) -> &str {
        &self.fallback
    }
}

/// A builder for `BotClient` instances.
#[derive(Default)]
pub struct BotClientBuilder {
    ai_provider: Option<Box<dyn AiProvider>>,
    embedder: Option<Box<dyn EmbeddingProvider>>,
    faq: Option<FaqIndex>,
    policy: Option<String>,
    fallback: Option<String>,
}

impl BotClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the answer generator. Required.
    pub fn ai_provider(mut self, provider: Box<dyn AiProvider>) -> Self {
        self.ai_provider = Some(provider);
        self
    }

    /// Enables semantic matching with the given embedding provider.
    pub fn embedder(mut self, embedder: Box<dyn EmbeddingProvider>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Sets the FAQ knowledge base. Defaults to an empty index.
    pub fn faq_index(mut self, faq: FaqIndex) -> Self {
        self.faq = Some(faq);
        self
    }

    /// Overrides the policy preamble. Defaults to `ACTIVITY_POLICY`.
    pub fn policy(mut self, policy: impl Into<String>) -> Self {
        self.policy = Some(policy.into());
        self
    }

    /// Overrides the fallback reply. Defaults to `FALLBACK_MESSAGE`.
    pub fn fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = Some(fallback.into());
        self
    }

    /// Builds the `BotClient`, embedding all FAQ questions up front when an
    /// embedding provider is configured. An embedding failure here is fatal
    /// (startup), not a reply-path error.
    pub async fn build(self) -> Result<BotClient, GeneratorError> {
        let ai_provider = self.ai_provider.ok_or(GeneratorError::MissingAiProvider)?;
        let faq = self.faq.unwrap_or_default();

        let semantic = match &self.embedder {
            Some(embedder) => Some(SemanticIndex::build(&faq, embedder.as_ref()).await?),
            None => None,
        };

        Ok(BotClient {
            ai_provider,
            embedder: self.embedder,
            faq,
            semantic,
            policy: self.policy.unwrap_or_else(|| ACTIVITY_POLICY.to_string()),
            fallback: self
                .fallback
                .unwrap_or_else(|| FALLBACK_MESSAGE.to_string()),
        })
    }
}
