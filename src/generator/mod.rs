//! Auto-replies from an external text-generation provider.
//!
//! [`ResponseGenerator::generate`] makes exactly one provider call and folds
//! every failure into `None`.

pub mod deepai;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::utils::error::GenerationError;

pub use deepai::DeepAiClient;

/// A text-generation provider.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, GenerationError>;
}

pub struct ResponseGenerator {
    provider: Arc<dyn TextGenerator>,
}

impl ResponseGenerator {
    pub fn new(provider: impl TextGenerator + 'static) -> Self {
        Self {
            provider: Arc::new(provider),
        }
    }

    /// Ask the provider for a reply. Blank output counts as no reply.
    pub async fn generate(&self, prompt: &str) -> Option<String> {
        match self.provider.complete(prompt).await {
            Ok(text) if text.trim().is_empty() => {
                debug!(target: "generator", "provider returned empty output");
                None
            }
            Ok(text) => Some(text),
            Err(e) => {
                warn!(target: "generator", error = %e, "generation failed");
                None
            }
        }
    }
}

impl std::fmt::Debug for ResponseGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseGenerator").finish_non_exhaustive()
    }
}
